//! Operation status reporting.

use serde::{Deserialize, Serialize};

/// Outcome of a single operation: a numeric status code paired with an
/// optional byte payload. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    status: i32,
    data: Vec<u8>,
}

impl StatusReport {
    /// Creates a report from a status code and payload.
    pub fn new(status: i32, data: Vec<u8>) -> Self {
        Self { status, data }
    }

    /// Returns the numeric status code.
    #[inline]
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Returns the payload bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let report = StatusReport::new(3, b"decoded".to_vec());
        assert_eq!(report.status(), 3);
        assert_eq!(report.data(), b"decoded");
    }

    #[test]
    fn test_empty_payload() {
        let report = StatusReport::new(1, Vec::new());
        assert!(report.data().is_empty());
    }
}
