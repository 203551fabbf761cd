//! Camera session management.
//!
//! This module owns the camera side of the pipeline: the device
//! abstraction, preview configuration, the raw frame type, and the
//! explicit session lifecycle driven by host surface events.

mod camera;
mod config;
mod frame;
mod lifecycle;
mod surface;

pub use camera::{CameraDevice, CameraError, DeviceDescriptor, MockCamera, PreviewParameters};
pub use config::{ConfigError, DeliveryMode, FileConfig, FocusMode, OutputConfig, PreviewConfig};
pub use frame::{Orientation, PixelFormat, PreviewSize, RawFrame};
pub use lifecycle::{CameraSession, SessionError, SessionState};
pub use surface::{HeadlessSurface, PreviewSurface};
