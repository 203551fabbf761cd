//! Presentation surface seam.
//!
//! The display surface belongs to the host windowing system; the
//! session only needs to know whether it is valid before binding the
//! preview stream to it. Hosts forward their surface lifecycle
//! notifications to [`crate::pipeline::PreviewPipeline`] as plain
//! function calls.

use super::frame::PreviewSize;

/// A presentation surface the preview stream can be bound to.
pub trait PreviewSurface {
    /// True once the host has made the surface valid for rendering.
    fn is_ready(&self) -> bool;

    /// Current surface dimensions, if known.
    fn size(&self) -> Option<PreviewSize>;
}

/// In-memory surface for tests and headless operation.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    ready: bool,
    size: Option<PreviewSize>,
}

impl HeadlessSurface {
    /// Creates a surface that reports ready.
    pub fn new() -> Self {
        Self {
            ready: true,
            size: None,
        }
    }

    /// Creates a surface that is not yet valid.
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            size: None,
        }
    }

    /// Sets the reported dimensions.
    pub fn with_size(mut self, size: PreviewSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Marks the surface valid or invalid.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSurface for HeadlessSurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn size(&self) -> Option<PreviewSize> {
        self.size
    }
}
