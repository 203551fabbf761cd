//! Camera session state machine.
//!
//! A session owns the sole handle to a camera device and tracks the
//! `Opened → Configured → Streaming → Closed` lifecycle explicitly.
//! `Closed` is terminal: reopening means constructing a new session.
//! Exclusive access is enforced by ownership: the factory consumes the
//! device handle, so a second open session over the same device cannot
//! be expressed.

use super::camera::{CameraDevice, CameraError, PreviewParameters};
use super::config::PreviewConfig;
use super::frame::{Orientation, PreviewSize, RawFrame};
use super::surface::PreviewSurface;
use thiserror::Error;

/// Lifecycle states of a camera session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Device acquired, parameters not yet negotiated.
    Opened,
    /// Preview parameters applied; orientation and size are known.
    Configured,
    /// Frames are being produced.
    Streaming,
    /// Device released. Terminal.
    Closed,
}

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The display surface is not yet valid; preview cannot start.
    /// Non-fatal: callers log it and the preview simply does not start.
    #[error("presentation surface not ready")]
    SurfaceNotReady,
    /// The operation is not valid in the session's current state.
    #[error("operation not valid in session state {state:?}")]
    InvalidState {
        /// State the session was in when the operation was attempted.
        state: SessionState,
    },
    /// The underlying device failed.
    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// An exclusive, stateful handle over one open camera device.
pub struct CameraSession {
    device: Box<dyn CameraDevice>,
    config: PreviewConfig,
    state: SessionState,
    size: Option<PreviewSize>,
    orientation: Orientation,
}

impl CameraSession {
    /// Acquires the camera device and returns an opened session.
    ///
    /// A device that is busy, absent, or access-denied yields `None`
    /// rather than an error; callers treat that as the preview feature
    /// being unavailable. The failure reason is logged at debug level.
    pub fn open(mut device: Box<dyn CameraDevice>, config: PreviewConfig) -> Option<Self> {
        match device.open() {
            Ok(()) => Some(Self {
                device,
                config,
                state: SessionState::Opened,
                size: None,
                orientation: Orientation::Deg0,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "camera open failed, preview unavailable");
                None
            }
        }
    }

    /// Negotiates and applies preview parameters.
    ///
    /// Reads the device descriptor, accepts the first supported size
    /// (the reported sizes and formats are otherwise informational),
    /// records the mounted orientation, and applies focus mode and
    /// rotation to match it in one call. Returns the negotiated size.
    pub fn configure(&mut self) -> Result<PreviewSize, SessionError> {
        if self.state != SessionState::Opened {
            return Err(SessionError::InvalidState { state: self.state });
        }

        let descriptor = self.device.descriptor()?;
        tracing::debug!(
            sizes = ?descriptor.supported_sizes,
            formats = ?descriptor.supported_formats,
            "supported preview modes"
        );

        let size = descriptor
            .supported_sizes
            .first()
            .copied()
            .ok_or_else(|| CameraError::ConfigFailed("device reports no preview sizes".into()))?;
        self.orientation = descriptor.mounted_orientation;

        let params = PreviewParameters {
            size,
            format: self.config.format,
            focus: self.config.focus,
            rotation: self.orientation,
        };
        self.device.apply_parameters(&params)?;

        self.size = Some(size);
        self.state = SessionState::Configured;
        tracing::info!(
            size = %size,
            orientation = self.orientation.degrees(),
            format = ?self.config.format,
            "camera configured"
        );
        Ok(size)
    }

    /// Binds the preview to a surface and starts streaming.
    ///
    /// Fails with [`SessionError::SurfaceNotReady`] if the surface is
    /// not yet valid; the session stays `Configured` and remains
    /// closable.
    pub fn start(&mut self, surface: &dyn PreviewSurface) -> Result<(), SessionError> {
        if self.state != SessionState::Configured {
            return Err(SessionError::InvalidState { state: self.state });
        }
        if !surface.is_ready() {
            return Err(SessionError::SurfaceNotReady);
        }
        self.device.start_preview()?;
        self.state = SessionState::Streaming;
        tracing::info!("preview streaming");
        Ok(())
    }

    /// Pulls the next raw frame from the streaming device.
    pub fn read_frame(&mut self) -> Result<RawFrame, SessionError> {
        if self.state != SessionState::Streaming {
            return Err(SessionError::InvalidState { state: self.state });
        }
        Ok(self.device.capture()?)
    }

    /// Stops streaming and releases the device.
    ///
    /// Idempotent and reachable from every state, including after a
    /// failed configure or start. The session is `Closed` afterwards.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.device.stop_preview();
        self.device.close();
        self.state = SessionState::Closed;
        tracing::info!("camera session closed");
    }

    /// Returns the current lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the negotiated preview size, once configured.
    #[inline]
    pub fn preview_size(&self) -> Option<PreviewSize> {
        self.size
    }

    /// Returns the orientation recorded at the most recent configure.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the session configuration.
    #[inline]
    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// True while frames are being produced.
    #[inline]
    pub fn is_streaming(&self) -> bool {
        self.state == SessionState::Streaming
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("state", &self.state)
            .field("size", &self.size)
            .field("orientation", &self.orientation)
            .finish()
    }
}
