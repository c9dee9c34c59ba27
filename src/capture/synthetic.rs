//! Synthetic capture backend producing a moving test pattern.

use serde::Deserialize;

use super::types::{CaptureError, DeviceDescriptor};
use super::{Capture, CaptureFactory};
use crate::image::{Depth, ImageBuffer, ImageError, ImageSize};

const BACKEND_NAME: &str = "synthetic";

/// Settings shared by all synthetic devices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticSettings {
    /// Number of virtual devices to enumerate
    pub devices: u32,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Drop every Nth frame to simulate a late camera (0 = never)
    pub missed_every: u32,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            devices: 1,
            width: 640,
            height: 480,
            missed_every: 0,
        }
    }
}

/// Factory for virtual test-pattern devices.
#[derive(Debug, Clone, Default)]
pub struct SyntheticCaptureFactory {
    settings: SyntheticSettings,
}

impl SyntheticCaptureFactory {
    pub fn new(settings: SyntheticSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SyntheticSettings {
        &self.settings
    }
}

impl CaptureFactory for SyntheticCaptureFactory {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, CaptureError> {
        Ok((0..self.settings.devices)
            .map(|index| DeviceDescriptor {
                index,
                name: format!("Test pattern {}", index),
                backend: BACKEND_NAME.to_string(),
            })
            .collect())
    }

    fn create_capture(&self, device: &DeviceDescriptor) -> Result<Box<dyn Capture>, CaptureError> {
        if device.backend != BACKEND_NAME {
            return Err(CaptureError::OpenFailed(format!(
                "{} is not a {} device",
                device, BACKEND_NAME
            )));
        }
        if device.index >= self.settings.devices {
            return Err(CaptureError::DeviceNotFound(device.index));
        }
        Ok(Box::new(SyntheticCapture::new(
            device.index,
            self.settings.clone(),
        )))
    }
}

/// A virtual camera producing a diagonal RGB gradient that scrolls one
/// pixel per frame.
#[derive(Debug)]
pub struct SyntheticCapture {
    index: u32,
    settings: SyntheticSettings,
    running: bool,
    /// Number of capture_frame calls since start
    polls: u64,
}

impl SyntheticCapture {
    pub fn new(index: u32, settings: SyntheticSettings) -> Self {
        Self {
            index,
            settings,
            running: false,
            polls: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn size(&self) -> ImageSize {
        ImageSize::new(self.settings.width, self.settings.height)
    }

    fn render_pattern(&self) -> Result<ImageBuffer, ImageError> {
        let mut image = ImageBuffer::new(self.size(), Depth::U8, 3)?;
        let stride = image.stride();
        let shift = self.polls as u32;

        for (y, row) in image.data_mut().chunks_exact_mut(stride).enumerate() {
            let y = y as u32;
            for (x, pixel) in row.chunks_exact_mut(3).enumerate() {
                let x = x as u32;
                pixel[0] = (x.wrapping_add(shift) % 256) as u8;
                pixel[1] = (y.wrapping_add(shift) % 256) as u8;
                pixel[2] = (x.wrapping_add(y) % 256) as u8;
            }
        }

        Ok(image)
    }
}

impl Capture for SyntheticCapture {
    fn start(&mut self) -> Result<(), CaptureError> {
        ImageBuffer::byte_len(self.size(), Depth::U8, 3).map_err(|e| {
            CaptureError::StreamFailed(format!("unsupported resolution {}: {}", self.size(), e))
        })?;
        self.running = true;
        self.polls = 0;
        log::info!(
            "Synthetic device {} started at {}x{}",
            self.index,
            self.settings.width,
            self.settings.height
        );
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            log::info!(
                "Synthetic device {} stopped after {} poll(s)",
                self.index,
                self.polls
            );
        }
        self.running = false;
    }

    fn capture_frame(&mut self) -> Result<Option<ImageBuffer>, CaptureError> {
        if !self.running {
            return Err(CaptureError::NotRunning);
        }
        self.polls += 1;

        let missed_every = self.settings.missed_every as u64;
        if missed_every > 0 && self.polls % missed_every == 0 {
            return Ok(None);
        }

        self.render_pattern()
            .map(Some)
            .map_err(|e| CaptureError::DecodeFailed(e.to_string()))
    }

    fn show_settings_dialog(&mut self) -> bool {
        log::info!(
            "Synthetic device {}: {}x{}, missed_every={}",
            self.index,
            self.settings.width,
            self.settings.height,
            self.settings.missed_every
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SyntheticSettings {
        SyntheticSettings {
            devices: 2,
            width: 4,
            height: 2,
            missed_every: 0,
        }
    }

    #[test]
    fn test_enumerate_devices() {
        let factory = SyntheticCaptureFactory::new(small());
        let devices = factory.enumerate_devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1].index, 1);
        assert_eq!(devices[1].backend, "synthetic");
    }

    #[test]
    fn test_enumerate_no_devices() {
        let factory = SyntheticCaptureFactory::new(SyntheticSettings {
            devices: 0,
            ..small()
        });
        assert!(factory.enumerate_devices().unwrap().is_empty());
    }

    #[test]
    fn test_create_unknown_device() {
        let factory = SyntheticCaptureFactory::new(small());
        let device = DeviceDescriptor {
            index: 7,
            name: "ghost".to_string(),
            backend: BACKEND_NAME.to_string(),
        };
        assert_eq!(
            factory.create_capture(&device).err(),
            Some(CaptureError::DeviceNotFound(7))
        );
    }

    #[test]
    fn test_create_foreign_device() {
        let factory = SyntheticCaptureFactory::new(small());
        let device = DeviceDescriptor {
            index: 0,
            name: "webcam".to_string(),
            backend: "v4l2".to_string(),
        };
        let err = factory.create_capture(&device).err();
        assert!(matches!(err, Some(CaptureError::OpenFailed(_))));
    }

    #[test]
    fn test_capture_requires_start() {
        let mut capture = SyntheticCapture::new(0, small());
        assert_eq!(capture.capture_frame(), Err(CaptureError::NotRunning));

        capture.start().unwrap();
        let frame = capture.capture_frame().unwrap().unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);

        capture.stop();
        assert!(!capture.is_running());
    }

    #[test]
    fn test_pattern_scrolls() {
        let mut capture = SyntheticCapture::new(0, small());
        capture.start().unwrap();
        let first = capture.capture_frame().unwrap().unwrap();
        let second = capture.capture_frame().unwrap().unwrap();
        // Red channel of the top-left pixel advances by one per frame
        assert_eq!(second.data()[0], first.data()[0] + 1);
    }

    #[test]
    fn test_missed_every() {
        let mut capture = SyntheticCapture::new(
            0,
            SyntheticSettings {
                missed_every: 3,
                ..small()
            },
        );
        capture.start().unwrap();
        let results: Vec<bool> = (0..6)
            .map(|_| capture.capture_frame().unwrap().is_some())
            .collect();
        assert_eq!(results, vec![true, true, false, true, true, false]);
    }

    #[test]
    fn test_start_rejects_zero_resolution() {
        let mut capture = SyntheticCapture::new(
            0,
            SyntheticSettings {
                width: 0,
                ..small()
            },
        );
        assert!(matches!(capture.start(), Err(CaptureError::StreamFailed(_))));
    }

    #[test]
    fn test_start_rejects_oversized_resolution() {
        let mut capture = SyntheticCapture::new(
            0,
            SyntheticSettings {
                width: 100_000,
                height: 100_000,
                ..small()
            },
        );
        let err = capture.start().unwrap_err();
        assert!(matches!(err, CaptureError::StreamFailed(_)));
        assert!(err.to_string().contains("100000x100000"));
        assert!(!capture.is_running());
    }

    #[test]
    fn test_pattern_scroll_wraps() {
        let mut capture = SyntheticCapture::new(0, small());
        capture.start().unwrap();
        // Next poll makes the scroll offset u32::MAX
        capture.polls = u32::MAX as u64 - 1;

        let frame = capture.capture_frame().unwrap().unwrap();
        assert_eq!(frame.data()[0], 255);
        // Second pixel's red channel wrapped past u32::MAX
        assert_eq!(frame.data()[3], 0);
    }
}
