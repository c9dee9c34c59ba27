//! Capture service: device enumeration and frame acquisition.
//!
//! The capture loop depends only on the [`Capture`] and [`CaptureFactory`]
//! traits:
//! - Device enumeration via [`CaptureFactory::enumerate_devices`]
//! - Device creation via [`CaptureFactory::create_capture`]
//! - Frame acquisition via [`Capture::capture_frame`]
//!
//! [`SyntheticCaptureFactory`] provides virtual test-pattern devices.

mod synthetic;
mod types;

use crate::image::ImageBuffer;

pub use synthetic::{SyntheticCapture, SyntheticCaptureFactory, SyntheticSettings};
pub use types::{CaptureError, DeviceDescriptor};

/// A started or startable video source.
pub trait Capture {
    /// Start streaming frames.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop streaming. Calling it on a stopped source is a no-op.
    fn stop(&mut self);

    /// Acquire the next frame.
    ///
    /// `Ok(None)` means no frame was ready this time (late or dropped frame).
    fn capture_frame(&mut self) -> Result<Option<ImageBuffer>, CaptureError>;

    /// Open the device's settings dialog.
    ///
    /// Returns `false` if the device has no settings dialog.
    fn show_settings_dialog(&mut self) -> bool {
        false
    }
}

/// Enumerates devices and creates capture sources for them.
pub trait CaptureFactory {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, CaptureError>;

    /// Create a (not yet started) capture source for `device`.
    fn create_capture(&self, device: &DeviceDescriptor) -> Result<Box<dyn Capture>, CaptureError>;
}
