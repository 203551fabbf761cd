//! Camera Preview Pipeline Library
//!
//! Session management and frame conversion for a live camera preview:
//! open a camera device, negotiate preview parameters, stream raw
//! planar-YUV frames, convert each one to packed RGBA, and hand the
//! result to a registered consumer.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! surface events → session (open → configure → stream)
//!                      ↓ raw frames
//!                  handoff slot → convert → deliver
//! ```
//!
//! # Design Principles
//!
//! - **Degrade, don't fail**: an unavailable device yields no session,
//!   an unready surface leaves the preview stopped; nothing here is
//!   fatal to the host
//! - **One owner per device**: the session consumes the device handle,
//!   so a second open session cannot be expressed
//! - **Deterministic shedding**: a single-slot handoff drops frames a
//!   slow consumer cannot keep up with, instead of queueing them
//! - **Teardown always works**: `close` is idempotent and reachable
//!   from every state, including mid-failure
//!
//! # Example
//!
//! ```
//! use camera_preview::{
//!     convert::ConvertedImage,
//!     pipeline::{FnSink, PreviewPipeline},
//!     session::{CameraSession, HeadlessSurface, MockCamera, Orientation, PreviewConfig},
//! };
//!
//! let session = CameraSession::open(
//!     Box::new(MockCamera::new()),
//!     PreviewConfig::default(),
//! )
//! .expect("camera unavailable");
//!
//! let sink = FnSink(|image: &ConvertedImage, _raw: &[u8], orientation: Orientation| {
//!     println!("{}x{} frame at {} degrees", image.width(), image.height(), orientation.degrees());
//! });
//! let mut pipeline = PreviewPipeline::new(session, sink);
//!
//! // Driven by the host's surface lifecycle
//! pipeline.surface_created(&HeadlessSurface::new());
//! pipeline.capture_and_deliver().unwrap();
//! pipeline.surface_destroyed();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod convert;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod status;

// Re-export commonly used types at crate root
pub use convert::{ConvertError, ConvertedImage, FrameConverter, FrameSlot};
pub use pipeline::{FnSink, PipelineError, PreviewPipeline, PreviewSink};
pub use session::{
    CameraDevice, CameraError, CameraSession, DeliveryMode, FocusMode, HeadlessSurface,
    MockCamera, Orientation, PixelFormat, PreviewConfig, PreviewSize, PreviewSurface, RawFrame,
    SessionError, SessionState,
};
pub use status::StatusReport;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
