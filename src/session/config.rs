//! Preview configuration.
//!
//! The preview resolution is not configured here: the session accepts
//! the device's preferred size during configuration. What the host does
//! choose is the pixel format, focus behavior, and delivery mode.

use super::frame::PixelFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Focus behavior requested while the preview streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusMode {
    /// Continuously refocus for still-capture sharpness.
    ContinuousPicture,
    /// Single autofocus sweep on demand.
    Auto,
    /// Focus locked at the hyperfocal distance.
    Fixed,
}

impl Default for FocusMode {
    fn default() -> Self {
        Self::ContinuousPicture
    }
}

/// How the frame listener behaves after a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMode {
    /// Every produced frame is converted and delivered.
    Continuous,
    /// The listener disarms after one delivery; the consumer re-arms
    /// explicitly when it wants the next frame.
    OneShot,
}

impl Default for DeliveryMode {
    fn default() -> Self {
        Self::Continuous
    }
}

/// Configuration for a preview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Raw frame pixel layout to request.
    pub format: PixelFormat,
    /// Focus behavior.
    pub focus: FocusMode,
    /// Frame delivery behavior.
    pub delivery: DeliveryMode,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            format: PixelFormat::Nv21,
            focus: FocusMode::ContinuousPicture,
            delivery: DeliveryMode::Continuous,
        }
    }
}

/// Configuration file errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config file: {0}")]
    Parse(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Run configuration for the demo binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run until interrupted (true) or process a fixed number of frames.
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 30,
            metrics_port: 9090,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreviewConfig::default();
        assert_eq!(config.format, PixelFormat::Nv21);
        assert_eq!(config.focus, FocusMode::ContinuousPicture);
        assert_eq!(config.delivery, DeliveryMode::Continuous);
    }

    #[test]
    fn test_parse_partial_file() {
        let parsed: FileConfig = toml::from_str(
            r#"
            [preview]
            format = "yv12"
            delivery = "one-shot"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.preview.format, PixelFormat::Yv12);
        assert_eq!(parsed.preview.delivery, DeliveryMode::OneShot);
        // Unset sections fall back to defaults
        assert_eq!(parsed.output.frame_count, 30);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = FileConfig::from_file("/nonexistent/preview.toml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
