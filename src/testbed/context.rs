//! Context handed to user callbacks.

use crate::display::{Display, WindowMode};
use crate::registry::ImageRegistry;

use super::state::StopHandle;

/// What a video or key callback can reach while the loop is running.
pub struct LoopContext<'a> {
    pub(super) registry: &'a mut ImageRegistry,
    pub(super) display: &'a mut dyn Display,
    pub(super) window_mode: WindowMode,
    pub(super) stop: &'a StopHandle,
    pub(super) paused: bool,
}

impl LoopContext<'_> {
    /// The registry to publish debug images into.
    pub fn registry(&mut self) -> &mut ImageRegistry {
        &mut *self.registry
    }

    /// Toggle visibility of a registry slot, opening or closing its window.
    pub fn toggle_visible(&mut self, index: usize) -> bool {
        self.registry
            .toggle_visible(index, self.window_mode, &mut *self.display)
    }

    /// Stop the loop at the top of its next iteration.
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
