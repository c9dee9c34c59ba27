//! Loop state, settings and the external stop request.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::display::WindowMode;

/// Lifecycle of the capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not started yet
    Idle,
    /// Inside `start_video`
    Running,
    /// The loop has exited; terminal
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::Idle => "idle",
            LoopState::Running => "running",
            LoopState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Tunables for the capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// How long each keyboard poll waits for a key
    pub poll_interval: Duration,
    /// Mode for windows opened by toggling a registry slot
    pub window_mode: WindowMode,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            window_mode: WindowMode::AutoSize,
        }
    }
}

/// Counters collected while the loop runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Frames returned by the capture source
    pub frames_captured: u64,
    /// Polls that produced no frame (late, dropped or failed)
    pub frames_missed: u64,
    /// Frames passed to the video callback and rendered
    pub frames_processed: u64,
    /// Key presses received from the display
    pub keys_received: u64,
}

/// Cloneable request to stop a running loop.
///
/// The loop checks the flag at the top of every iteration, so a stop
/// requested from another thread (e.g. a Ctrl+C handler) takes effect after
/// the current frame and key poll.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
