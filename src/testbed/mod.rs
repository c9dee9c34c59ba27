//! Capture/display loop hosting the image registry.
//!
//! [`Testbed`] owns an [`ImageRegistry`](crate::registry::ImageRegistry) and a
//! display backend. [`Testbed::start_video`] runs the blocking loop:
//! capture a frame, hand it to the video callback, render the visible
//! registry slots, poll the keyboard, and dispatch the key to the key
//! callback and then to the built-in [`Binding`]s.

mod context;
mod keys;
mod runner;
mod state;

pub use context::LoopContext;
pub use keys::{Binding, KeyDisposition, PAUSE_KEY, SETTINGS_KEY};
pub use runner::{Testbed, VideoSource};
pub use state::{LoopSettings, LoopState, LoopStats, StopHandle};
