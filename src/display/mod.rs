//! Display service: named windows, image output and keyboard polling.
//!
//! The testbed only talks to the window system through the [`Display`] trait.
//! [`HeadlessDisplay`] is a backend that keeps window state in memory and
//! serves key presses from a script, which is what the binary and the tests use.

mod headless;

use serde::Deserialize;
use std::time::Duration;

use crate::image::ImageBuffer;

pub use headless::HeadlessDisplay;

/// How a newly created window sizes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Window follows the size of the image shown in it
    #[default]
    AutoSize,
    /// Window can be resized by the user
    Normal,
}

impl WindowMode {
    pub fn name(&self) -> &'static str {
        match self {
            WindowMode::AutoSize => "autosize",
            WindowMode::Normal => "normal",
        }
    }
}

/// Errors reported by a display backend.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("no window named '{0}'")]
    UnknownWindow(String),
}

/// Window-system operations used by the registry and the capture loop.
///
/// Windows are identified by their title.
pub trait Display {
    /// Create (or re-create) a window with the given title.
    fn create_window(&mut self, title: &str, mode: WindowMode) -> Result<(), DisplayError>;

    /// Destroy the window with the given title.
    fn destroy_window(&mut self, title: &str) -> Result<(), DisplayError>;

    /// Push the image contents to the window with the given title.
    fn show(&mut self, title: &str, image: &ImageBuffer) -> Result<(), DisplayError>;

    /// Wait up to `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> Option<char>;
}
