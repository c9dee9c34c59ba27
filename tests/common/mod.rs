//! Mock capture and display collaborators shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use vision_testbed::capture::{Capture, CaptureError, CaptureFactory, DeviceDescriptor};
use vision_testbed::display::{Display, DisplayError, WindowMode};
use vision_testbed::image::ImageBuffer;

/// Everything observable that happened during a test, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Create(String),
    Destroy(String),
    Show(String),
    /// Recorded by test video callbacks with the frame id
    Callback(u8),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// A 1x1 RGB frame whose pixel values all equal `id`.
pub fn frame(id: u8) -> ImageBuffer {
    ImageBuffer::from_rgb(1, 1, vec![id; 3]).unwrap()
}

/// Frame id of a frame built with [`frame`].
pub fn frame_id(image: &ImageBuffer) -> u8 {
    image.data()[0]
}

/// Counters shared between a mock capture and the test.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CaptureLog {
    pub starts: u32,
    pub stops: u32,
    pub settings_opened: u32,
    pub polls: u32,
    pub drops: u32,
}

pub type SharedCaptureLog = Rc<RefCell<CaptureLog>>;

/// Capture source replaying a fixed list of poll results.
///
/// Once the list is exhausted every poll returns `Ok(None)`.
pub struct MockCapture {
    polls: VecDeque<Result<Option<ImageBuffer>, CaptureError>>,
    log: SharedCaptureLog,
    fail_start: bool,
}

impl MockCapture {
    pub fn new(polls: Vec<Result<Option<ImageBuffer>, CaptureError>>) -> Self {
        Self {
            polls: polls.into(),
            log: Rc::new(RefCell::new(CaptureLog::default())),
            fail_start: false,
        }
    }

    /// Capture that yields the given frame ids, `None` meaning a missed frame.
    pub fn with_frames(ids: &[Option<u8>]) -> Self {
        Self::new(ids.iter().map(|id| Ok(id.map(frame))).collect())
    }

    pub fn log(&self) -> SharedCaptureLog {
        Rc::clone(&self.log)
    }
}

impl Capture for MockCapture {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.log.borrow_mut().starts += 1;
        if self.fail_start {
            Err(CaptureError::StreamFailed("device busy".to_string()))
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
    }

    fn capture_frame(&mut self) -> Result<Option<ImageBuffer>, CaptureError> {
        self.log.borrow_mut().polls += 1;
        self.polls.pop_front().unwrap_or(Ok(None))
    }

    fn show_settings_dialog(&mut self) -> bool {
        self.log.borrow_mut().settings_opened += 1;
        true
    }
}

impl Drop for MockCapture {
    fn drop(&mut self) {
        self.log.borrow_mut().drops += 1;
    }
}

/// Factory handing out one prepared [`MockCapture`] per enumerated device.
pub struct MockFactory {
    devices: u32,
    frames: Vec<Option<u8>>,
    fail_start: bool,
    pub log: SharedCaptureLog,
}

impl MockFactory {
    pub fn new(devices: u32, frames: &[Option<u8>]) -> Self {
        Self {
            devices,
            frames: frames.to_vec(),
            fail_start: false,
            log: Rc::new(RefCell::new(CaptureLog::default())),
        }
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }
}

impl CaptureFactory for MockFactory {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, CaptureError> {
        Ok((0..self.devices)
            .map(|index| DeviceDescriptor {
                index,
                name: format!("mock {}", index),
                backend: "mock".to_string(),
            })
            .collect())
    }

    fn create_capture(&self, _device: &DeviceDescriptor) -> Result<Box<dyn Capture>, CaptureError> {
        let mut capture = MockCapture::with_frames(&self.frames);
        capture.log = Rc::clone(&self.log);
        capture.fail_start = self.fail_start;
        Ok(Box::new(capture))
    }
}

/// Display that records every call and replays scripted keys.
///
/// When the script runs out it answers with ESC so a broken test stops
/// instead of spinning forever.
pub struct RecordingDisplay {
    events: EventLog,
    keys: VecDeque<Option<char>>,
    pub polls: u32,
}

impl RecordingDisplay {
    /// `keys` is one entry per poll; `.` means no key.
    pub fn new(events: &EventLog, keys: &str) -> Self {
        Self {
            events: Rc::clone(events),
            keys: keys
                .chars()
                .map(|c| if c == '.' { None } else { Some(c) })
                .collect(),
            polls: 0,
        }
    }

    pub fn creates(&self, title: &str) -> usize {
        self.count(|e| *e == Event::Create(title.to_string()))
    }

    pub fn destroys(&self, title: &str) -> usize {
        self.count(|e| *e == Event::Destroy(title.to_string()))
    }

    pub fn shows(&self, title: &str) -> usize {
        self.count(|e| *e == Event::Show(title.to_string()))
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl Display for RecordingDisplay {
    fn create_window(&mut self, title: &str, _mode: WindowMode) -> Result<(), DisplayError> {
        self.events.borrow_mut().push(Event::Create(title.to_string()));
        Ok(())
    }

    fn destroy_window(&mut self, title: &str) -> Result<(), DisplayError> {
        self.events.borrow_mut().push(Event::Destroy(title.to_string()));
        Ok(())
    }

    fn show(&mut self, title: &str, _image: &ImageBuffer) -> Result<(), DisplayError> {
        self.events.borrow_mut().push(Event::Show(title.to_string()));
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Option<char> {
        self.polls += 1;
        match self.keys.pop_front() {
            Some(key) => key,
            None => Some('\u{1b}'),
        }
    }
}
