//! YUV to RGBA frame conversion.
//!
//! The converter is the one computational stage of the pipeline: a
//! pure, deterministic, pixel-local transform from a planar
//! luma/chroma payload to one opaque RGBA pixel per luma sample. The
//! heavy lifting is delegated to the SIMD kernels of the `yuv` crate.
//!
//! Geometry and pixel format are fixed at construction, taken from the
//! session's negotiated parameters rather than from the frame itself,
//! and every payload length is validated before any plane is sliced.

mod handoff;
mod image;
mod rgba;

pub use handoff::FrameSlot;
pub use image::ConvertedImage;

use crate::session::{Orientation, PixelFormat, PreviewSize, RawFrame};
use thiserror::Error;

/// Errors that can occur during frame conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The payload length does not match the declared geometry.
    #[error(
        "malformed frame: expected {expected} bytes for {width}x{height} {format:?}, got {actual}"
    )]
    MalformedFrame {
        /// Bytes required by the declared geometry.
        expected: usize,
        /// Bytes actually present in the frame.
        actual: usize,
        /// Declared frame width.
        width: u32,
        /// Declared frame height.
        height: u32,
        /// Declared pixel format.
        format: PixelFormat,
    },
    /// The declared dimensions cannot describe a subsampled frame.
    #[error("invalid preview dimensions {width}x{height}")]
    InvalidDimensions {
        /// Rejected width.
        width: u32,
        /// Rejected height.
        height: u32,
    },
    /// The color-space kernel rejected the input.
    #[error("color conversion failed: {0}")]
    Conversion(String),
}

/// Converts raw preview frames to packed RGBA images.
///
/// Holds the geometry, pixel format, and display orientation captured
/// when the session was configured. The orientation is stamped onto
/// every produced image until the converter is rebuilt by the next
/// configuration.
#[derive(Debug, Clone)]
pub struct FrameConverter {
    size: PreviewSize,
    format: PixelFormat,
    orientation: Orientation,
}

impl FrameConverter {
    /// Creates a converter for the given negotiated parameters.
    ///
    /// Dimensions must be nonzero and even, since chroma is subsampled
    /// 2x2 in both supported formats.
    pub fn new(
        size: PreviewSize,
        format: PixelFormat,
        orientation: Orientation,
    ) -> Result<Self, ConvertError> {
        if size.width == 0 || size.height == 0 || size.width % 2 != 0 || size.height % 2 != 0 {
            return Err(ConvertError::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            size,
            format,
            orientation,
        })
    }

    /// Converts one raw frame into a packed RGBA image.
    ///
    /// Fails with [`ConvertError::MalformedFrame`] if the payload
    /// length does not match `width * height * 3/2`; no plane is read
    /// in that case.
    pub fn convert(&self, frame: &RawFrame) -> Result<ConvertedImage, ConvertError> {
        let expected = self.format.frame_len(self.size.width, self.size.height);
        if frame.len() != expected {
            return Err(ConvertError::MalformedFrame {
                expected,
                actual: frame.len(),
                width: self.size.width,
                height: self.size.height,
                format: self.format,
            });
        }

        let rgba = match self.format {
            PixelFormat::Nv21 => rgba::nv21_to_rgba(frame.bytes(), self.size.width, self.size.height)?,
            PixelFormat::Yv12 => rgba::yv12_to_rgba(frame.bytes(), self.size.width, self.size.height)?,
        };

        Ok(ConvertedImage::new(
            rgba,
            self.size.width,
            self.size.height,
            self.orientation,
        ))
    }

    /// Returns the declared preview size.
    #[inline]
    pub fn size(&self) -> PreviewSize {
        self.size
    }

    /// Returns the declared pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the orientation stamped onto produced images.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}
