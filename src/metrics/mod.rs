//! Prometheus metrics for preview monitoring.
//!
//! # Metrics Exposed
//!
//! - `camera_preview_streaming` - Streaming state (1=streaming, 0=stopped)
//! - `camera_preview_frames_delivered_total` - Converted frames delivered
//! - `camera_preview_frames_dropped_total` - Raw frames shed at the handoff slot
//! - `camera_preview_width_pixels` / `camera_preview_height_pixels` - Negotiated size
//! - `camera_preview_orientation_degrees` - Orientation recorded at configuration
//!
//! The HTTP exporter is behind the `metrics` cargo feature.
//!
//! # Example
//!
//! ```
//! use camera_preview::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("failed to create registry");
//! registry.update(&MetricsSnapshot {
//!     streaming: true,
//!     frames_delivered: 42,
//!     frames_dropped: 2,
//!     preview_size: None,
//!     orientation_degrees: Some(90),
//! });
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
