//! In-memory display backend with scripted keyboard input.

use std::collections::{HashMap, VecDeque};
use std::thread;
use std::time::Duration;

use super::{Display, DisplayError, WindowMode};
use crate::image::{ImageBuffer, ImageSize};

/// Marker in a key script meaning "no key on this poll".
const IDLE_POLL: char = '.';

#[derive(Debug, Clone)]
struct WindowRecord {
    mode: WindowMode,
    frames_shown: u64,
    last_size: Option<ImageSize>,
}

/// Display backend that keeps windows in memory instead of on screen.
///
/// Key presses come from a script queued up front. When the queue is empty
/// (or the next entry is an idle poll), `poll_key` sleeps for the timeout so
/// the loop runs at roughly the same pace as with a real window system.
#[derive(Debug)]
pub struct HeadlessDisplay {
    windows: HashMap<String, WindowRecord>,
    keys: VecDeque<Option<char>>,
    /// Sleep for the poll timeout when no key is pending
    pace: bool,
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            keys: VecDeque::new(),
            pace: true,
        }
    }

    /// Create a display that replays `script`, one character per poll.
    ///
    /// A `.` in the script is an idle poll (no key pressed).
    pub fn with_script(script: &str) -> Self {
        let mut display = Self::new();
        display.push_script(script);
        display
    }

    /// Disable sleeping in `poll_key` (useful in tests).
    pub fn without_pacing(mut self) -> Self {
        self.pace = false;
        self
    }

    /// Append a key script to the pending input.
    pub fn push_script(&mut self, script: &str) {
        self.keys.extend(
            script
                .chars()
                .map(|c| if c == IDLE_POLL { None } else { Some(c) }),
        );
    }

    /// Queue a single key press.
    pub fn push_key(&mut self, key: char) {
        self.keys.push_back(Some(key));
    }

    /// Number of scripted polls not yet consumed.
    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn is_open(&self, title: &str) -> bool {
        self.windows.contains_key(title)
    }

    /// Titles of all open windows, sorted.
    pub fn open_windows(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.windows.keys().cloned().collect();
        titles.sort();
        titles
    }

    /// How many images were shown in the window (0 if it is not open).
    pub fn frames_shown(&self, title: &str) -> u64 {
        self.windows.get(title).map_or(0, |w| w.frames_shown)
    }

    /// Size of the last image shown in the window.
    pub fn last_size(&self, title: &str) -> Option<ImageSize> {
        self.windows.get(title).and_then(|w| w.last_size)
    }

    pub fn window_mode(&self, title: &str) -> Option<WindowMode> {
        self.windows.get(title).map(|w| w.mode)
    }
}

impl Display for HeadlessDisplay {
    fn create_window(&mut self, title: &str, mode: WindowMode) -> Result<(), DisplayError> {
        log::debug!("Window created: '{}' ({})", title, mode.name());
        self.windows.insert(
            title.to_string(),
            WindowRecord {
                mode,
                frames_shown: 0,
                last_size: None,
            },
        );
        Ok(())
    }

    fn destroy_window(&mut self, title: &str) -> Result<(), DisplayError> {
        match self.windows.remove(title) {
            Some(record) => {
                log::debug!(
                    "Window destroyed: '{}' after {} frame(s)",
                    title,
                    record.frames_shown
                );
                Ok(())
            }
            None => Err(DisplayError::UnknownWindow(title.to_string())),
        }
    }

    fn show(&mut self, title: &str, image: &ImageBuffer) -> Result<(), DisplayError> {
        let window = self
            .windows
            .get_mut(title)
            .ok_or_else(|| DisplayError::UnknownWindow(title.to_string()))?;
        window.frames_shown += 1;
        window.last_size = Some(image.size());
        log::trace!("Showing {} image in '{}'", image.size(), title);
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<char> {
        match self.keys.pop_front() {
            Some(Some(key)) => Some(key),
            _ => {
                if self.pace {
                    thread::sleep(timeout);
                }
                None
            }
        }
    }
}
