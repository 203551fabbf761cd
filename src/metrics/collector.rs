//! Metrics collection and registry.

use crate::session::PreviewSize;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pipeline state for a metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Whether the session is currently streaming.
    pub streaming: bool,
    /// Total frames delivered to the sink.
    pub frames_delivered: u64,
    /// Total frames shed at the handoff slot.
    pub frames_dropped: u64,
    /// Negotiated preview size, once configured.
    pub preview_size: Option<PreviewSize>,
    /// Display orientation in degrees, once configured.
    pub orientation_degrees: Option<u32>,
}

/// Prometheus metrics registry for preview monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    streaming: IntGauge,
    frames_delivered_total: IntCounter,
    frames_dropped_total: IntCounter,
    preview_width: IntGauge,
    preview_height: IntGauge,
    orientation_degrees: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all preview metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let streaming = IntGauge::new(
            "camera_preview_streaming",
            "Whether the preview is streaming (1=streaming, 0=stopped)",
        )?;
        let frames_delivered_total = IntCounter::new(
            "camera_preview_frames_delivered_total",
            "Total converted frames delivered to the consumer",
        )?;
        let frames_dropped_total = IntCounter::new(
            "camera_preview_frames_dropped_total",
            "Total raw frames shed because the handoff slot was occupied",
        )?;
        let preview_width = IntGauge::new(
            "camera_preview_width_pixels",
            "Negotiated preview width in pixels",
        )?;
        let preview_height = IntGauge::new(
            "camera_preview_height_pixels",
            "Negotiated preview height in pixels",
        )?;
        let orientation_degrees = IntGauge::new(
            "camera_preview_orientation_degrees",
            "Display orientation recorded at configuration",
        )?;

        registry.register(Box::new(streaming.clone()))?;
        registry.register(Box::new(frames_delivered_total.clone()))?;
        registry.register(Box::new(frames_dropped_total.clone()))?;
        registry.register(Box::new(preview_width.clone()))?;
        registry.register(Box::new(preview_height.clone()))?;
        registry.register(Box::new(orientation_degrees.clone()))?;

        Ok(Self {
            registry,
            streaming,
            frames_delivered_total,
            frames_dropped_total,
            preview_width,
            preview_height,
            orientation_degrees,
        })
    }

    /// Updates all metrics from a pipeline snapshot.
    ///
    /// Counters advance by the difference from the previous snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.streaming.set(if snapshot.streaming { 1 } else { 0 });

        let delivered = self.frames_delivered_total.get();
        if snapshot.frames_delivered > delivered {
            self.frames_delivered_total
                .inc_by(snapshot.frames_delivered - delivered);
        }

        let dropped = self.frames_dropped_total.get();
        if snapshot.frames_dropped > dropped {
            self.frames_dropped_total
                .inc_by(snapshot.frames_dropped - dropped);
        }

        if let Some(size) = snapshot.preview_size {
            self.preview_width.set(size.width as i64);
            self.preview_height.set(size.height as i64);
        }
        if let Some(degrees) = snapshot.orientation_degrees {
            self.orientation_degrees.set(degrees as i64);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
