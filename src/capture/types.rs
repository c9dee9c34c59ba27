//! Capture types and errors.

use std::fmt;

/// Information about an available capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Backend that provides the device
    pub backend: String,
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.backend)
    }
}

/// Errors that can occur during capture operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("capture device {0} not found")]
    DeviceNotFound(u32),

    #[error("failed to open capture device: {0}")]
    OpenFailed(String),

    #[error("failed to start capture stream: {0}")]
    StreamFailed(String),

    #[error("failed to decode frame: {0}")]
    DecodeFailed(String),

    #[error("capture stream is not running")]
    NotRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_descriptor_display() {
        let device = DeviceDescriptor {
            index: 0,
            name: "Test Camera".to_string(),
            backend: "synthetic".to_string(),
        };
        assert_eq!(device.to_string(), "[0] Test Camera (synthetic)");
    }

    #[test]
    fn test_capture_error_display() {
        assert_eq!(
            CaptureError::DeviceNotFound(3).to_string(),
            "capture device 3 not found"
        );
        assert_eq!(
            CaptureError::StreamFailed("busy".to_string()).to_string(),
            "failed to start capture stream: busy"
        );
        assert_eq!(
            CaptureError::NotRunning.to_string(),
            "capture stream is not running"
        );
    }
}
