//! Camera device abstraction.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for
//! testing. The device reports its capabilities through a descriptor and
//! accepts a negotiated parameter set in one call, mirroring the way a
//! platform camera stack exposes parameters.

use super::config::FocusMode;
use super::frame::{Orientation, PixelFormat, PreviewSize, RawFrame};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("failed to apply camera parameters: {0}")]
    ConfigFailed(String),
    #[error("failed to start preview stream: {0}")]
    StreamFailed(String),
    #[error("failed to read frame: {0}")]
    CaptureFailed(String),
    #[error("camera not open")]
    NotOpen,
}

/// Capabilities reported by an opened camera device.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    /// Supported preview sizes, preferred first.
    pub supported_sizes: Vec<PreviewSize>,
    /// Supported preview pixel formats.
    pub supported_formats: Vec<PixelFormat>,
    /// Mounting rotation of the sensor relative to the display.
    pub mounted_orientation: Orientation,
}

/// Negotiated preview parameters, applied to the device in one call.
#[derive(Debug, Clone, Copy)]
pub struct PreviewParameters {
    /// Preview resolution.
    pub size: PreviewSize,
    /// Raw frame pixel layout.
    pub format: PixelFormat,
    /// Focus behavior while streaming.
    pub focus: FocusMode,
    /// Rotation applied to outgoing frames and the display.
    pub rotation: Orientation,
}

/// Trait for camera device implementations.
///
/// This abstraction allows swapping between real camera hardware and
/// mock implementations for testing. A hardware backend plugs in here.
pub trait CameraDevice {
    /// Acquires the device. Fails if it is busy, absent, or access is
    /// denied.
    fn open(&mut self) -> Result<(), CameraError>;

    /// Reports the capabilities of the opened device.
    fn descriptor(&self) -> Result<DeviceDescriptor, CameraError>;

    /// Applies negotiated preview parameters, mutating device state.
    fn apply_parameters(&mut self, params: &PreviewParameters) -> Result<(), CameraError>;

    /// Begins producing preview frames.
    fn start_preview(&mut self) -> Result<(), CameraError>;

    /// Reads the next raw frame from the running stream.
    fn capture(&mut self) -> Result<RawFrame, CameraError>;

    /// Stops producing preview frames. No-op if not streaming.
    fn stop_preview(&mut self);

    /// Checks whether the device is currently held open.
    fn is_open(&self) -> bool;

    /// Releases the device handle. No-op if already closed.
    fn close(&mut self);
}

/// Mock camera that produces deterministic synthetic frames.
#[derive(Debug)]
pub struct MockCamera {
    descriptor: DeviceDescriptor,
    params: Option<PreviewParameters>,
    open: bool,
    streaming: bool,
    available: bool,
    sequence: u64,
}

impl MockCamera {
    /// Creates a mock device advertising 640x480 and 320x240 previews
    /// in both supported formats, mounted at 90 degrees.
    pub fn new() -> Self {
        Self::with_orientation(Orientation::Deg90)
    }

    /// Creates a mock device with a specific mounted orientation.
    pub fn with_orientation(mounted_orientation: Orientation) -> Self {
        Self {
            descriptor: DeviceDescriptor {
                supported_sizes: vec![PreviewSize::new(640, 480), PreviewSize::new(320, 240)],
                supported_formats: vec![PixelFormat::Nv21, PixelFormat::Yv12],
                mounted_orientation,
            },
            params: None,
            open: false,
            streaming: false,
            available: true,
            sequence: 0,
        }
    }

    /// Creates a mock device that refuses to open, simulating a busy or
    /// absent camera.
    pub fn unavailable() -> Self {
        let mut camera = Self::new();
        camera.available = false;
        camera
    }

    /// Returns the parameters most recently applied, if any.
    pub fn applied_parameters(&self) -> Option<&PreviewParameters> {
        self.params.as_ref()
    }

    fn synthesize_frame(&self, params: &PreviewParameters) -> Vec<u8> {
        let luma_len = params.size.pixel_count();
        let total = params.format.frame_len(params.size.width, params.size.height);
        let mut bytes = vec![0u8; total];

        // Deterministic luma pattern mixed with the sequence number,
        // neutral chroma. Only for exercising frame handling.
        for (i, byte) in bytes[..luma_len].iter_mut().enumerate() {
            *byte = ((i as u64 ^ self.sequence) % 256) as u8;
        }
        for byte in bytes[luma_len..].iter_mut() {
            *byte = 128;
        }
        bytes
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraDevice for MockCamera {
    fn open(&mut self) -> Result<(), CameraError> {
        if !self.available {
            return Err(CameraError::DeviceUnavailable("device busy".into()));
        }
        self.open = true;
        self.sequence = 0;
        tracing::info!("MockCamera opened");
        Ok(())
    }

    fn descriptor(&self) -> Result<DeviceDescriptor, CameraError> {
        if !self.open {
            return Err(CameraError::NotOpen);
        }
        Ok(self.descriptor.clone())
    }

    fn apply_parameters(&mut self, params: &PreviewParameters) -> Result<(), CameraError> {
        if !self.open {
            return Err(CameraError::NotOpen);
        }
        if !self.descriptor.supported_formats.contains(&params.format) {
            return Err(CameraError::ConfigFailed(format!(
                "unsupported pixel format {:?}",
                params.format
            )));
        }
        self.params = Some(*params);
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        if !self.open {
            return Err(CameraError::NotOpen);
        }
        if self.params.is_none() {
            return Err(CameraError::StreamFailed("parameters not applied".into()));
        }
        self.streaming = true;
        Ok(())
    }

    fn capture(&mut self) -> Result<RawFrame, CameraError> {
        if !self.open || !self.streaming {
            return Err(CameraError::NotOpen);
        }
        let params = *self.params.as_ref().ok_or(CameraError::NotOpen)?;
        let bytes = self.synthesize_frame(&params);
        self.sequence += 1;
        Ok(RawFrame::new(bytes, self.sequence))
    }

    fn stop_preview(&mut self) {
        self.streaming = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        if self.open {
            self.streaming = false;
            self.params = None;
            self.open = false;
            tracing::info!("MockCamera closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_params(camera: &MockCamera) -> PreviewParameters {
        PreviewParameters {
            size: camera.descriptor.supported_sizes[0],
            format: PixelFormat::Nv21,
            focus: FocusMode::ContinuousPicture,
            rotation: Orientation::Deg90,
        }
    }

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        assert!(!camera.is_open());

        camera.open().unwrap();
        assert!(camera.is_open());

        let params = default_params(&camera);
        camera.apply_parameters(&params).unwrap();
        camera.start_preview().unwrap();

        let frame = camera.capture().unwrap();
        assert_eq!(frame.sequence(), 1);
        assert_eq!(frame.len(), PixelFormat::Nv21.frame_len(640, 480));

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockCamera::new();
        assert!(matches!(camera.capture(), Err(CameraError::NotOpen)));
    }

    #[test]
    fn test_unavailable_device_refuses_open() {
        let mut camera = MockCamera::unavailable();
        assert!(matches!(
            camera.open(),
            Err(CameraError::DeviceUnavailable(_))
        ));
        assert!(!camera.is_open());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut camera = MockCamera::new();
        camera.close();
        camera.open().unwrap();
        camera.close();
        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_start_preview_requires_parameters() {
        let mut camera = MockCamera::new();
        camera.open().unwrap();
        assert!(matches!(
            camera.start_preview(),
            Err(CameraError::StreamFailed(_))
        ));
    }
}
