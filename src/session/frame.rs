//! Raw preview frame type and capture vocabulary.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Pixel layout of raw preview frames.
///
/// Both supported layouts carry an 8-bit full-resolution luma plane
/// followed by chroma subsampled 2x2, for 12 bits per pixel total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Luma plane followed by one interleaved V/U plane at half
    /// resolution. The device default.
    Nv21,
    /// Luma plane followed by separate V and U planes, each at
    /// quarter size.
    Yv12,
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::Nv21
    }
}

impl PixelFormat {
    /// Number of bytes a frame of the given dimensions must contain.
    #[inline]
    pub fn frame_len(self, width: u32, height: u32) -> usize {
        let luma = (width as usize) * (height as usize);
        luma + luma / 2
    }
}

/// Rotation needed to align sensor-native frames with the display,
/// restricted to quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// No rotation.
    #[default]
    Deg0,
    /// Quarter turn clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three-quarter turn clockwise.
    Deg270,
}

impl Orientation {
    /// Parses a rotation in degrees. Only quarter turns are valid.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Returns the rotation in degrees.
    #[inline]
    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// A preview resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PreviewSize {
    /// Creates a size from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of luma samples (width * height).
    #[inline]
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl std::fmt::Display for PreviewSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One raw preview frame as produced by the device.
///
/// Carries only the byte payload and capture metadata. The geometry and
/// pixel format are declared by the session that produced the frame;
/// the converter validates the payload length against them.
#[derive(Clone)]
pub struct RawFrame {
    bytes: Vec<u8>,
    sequence: u64,
    timestamp: Instant,
}

impl RawFrame {
    /// Creates a frame from a raw byte payload.
    pub fn new(bytes: Vec<u8>, sequence: u64) -> Self {
        Self {
            bytes,
            sequence,
            timestamp: Instant::now(),
        }
    }

    /// Returns the raw planar bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the monotonic sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }
}

impl std::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFrame")
            .field("sequence", &self.sequence)
            .field("payload_bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_len_is_three_halves() {
        assert_eq!(PixelFormat::Nv21.frame_len(640, 480), 640 * 480 * 3 / 2);
        assert_eq!(PixelFormat::Yv12.frame_len(640, 480), 640 * 480 * 3 / 2);
    }

    #[test]
    fn test_orientation_round_trip() {
        for degrees in [0, 90, 180, 270] {
            let orientation = Orientation::from_degrees(degrees).unwrap();
            assert_eq!(orientation.degrees(), degrees);
        }
        assert!(Orientation::from_degrees(45).is_none());
        assert!(Orientation::from_degrees(360).is_none());
    }

    #[test]
    fn test_raw_frame_accessors() {
        let frame = RawFrame::new(vec![0u8; 16], 3);
        assert_eq!(frame.len(), 16);
        assert_eq!(frame.sequence(), 3);
        assert!(!frame.is_empty());
    }
}
