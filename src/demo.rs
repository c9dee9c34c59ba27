//! Demo pipeline wired up by the binary.
//!
//! Publishes two debug images per frame: `gray` (slot 0) and `threshold`
//! (slot 1). Press `0` or `1` to open their windows.

use std::cell::Cell;
use std::rc::Rc;

use crate::display::Display;
use crate::image::{threshold_into, to_grayscale_into, Depth, ImageBuffer};
use crate::registry::{ImageRegistry, SharedImage};
use crate::testbed::{KeyDisposition, LoopContext, Testbed};

pub const GRAY_TITLE: &str = "gray";
pub const THRESHOLD_TITLE: &str = "threshold";

/// Key that logs the key bindings instead of stopping the loop.
pub const HELP_KEY: char = 'h';

/// Options for the demo pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoOptions {
    /// Binary threshold level
    pub threshold: u8,
    /// Stop the loop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            threshold: 128,
            max_frames: None,
        }
    }
}

/// Install the demo video and key callbacks on `testbed`.
///
/// Returns a counter of frames seen by the pipeline.
pub fn install<D: Display>(testbed: &mut Testbed<D>, options: DemoOptions) -> Rc<Cell<u64>> {
    let frames = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&frames);

    testbed.set_video_callback(move |frame, ctx| {
        process_frame(frame, ctx, options.threshold);

        counter.set(counter.get() + 1);
        if options.max_frames.is_some_and(|max| counter.get() >= max) {
            log::info!("Processed {} frame(s), stopping", counter.get());
            ctx.request_stop();
        }
    });

    testbed.set_key_callback(|key, _ctx| {
        if key == HELP_KEY {
            log::info!("Keys: 0-9 toggle image windows, p pause, C device settings, any other key quits");
            KeyDisposition::Handled
        } else {
            KeyDisposition::Continue(key)
        }
    });

    frames
}

fn process_frame(frame: &ImageBuffer, ctx: &mut LoopContext<'_>, level: u8) {
    let registry = ctx.registry();

    let Some(gray) = buffer_like(registry, GRAY_TITLE, frame) else {
        return;
    };
    if !to_grayscale_into(frame, &mut gray.borrow_mut()) {
        log::debug!("Frame is not 8-bit RGB, skipping demo pipeline");
        return;
    }

    let Some(binary) = buffer_like(registry, THRESHOLD_TITLE, frame) else {
        return;
    };
    threshold_into(&gray.borrow(), &mut binary.borrow_mut(), level);
}

/// Reuse the single-channel buffer published under `title`, or allocate a
/// new one when it is missing or the frame size changed.
fn buffer_like(
    registry: &mut ImageRegistry,
    title: &str,
    frame: &ImageBuffer,
) -> Option<SharedImage> {
    if let Some(existing) = registry.get_by_title(title) {
        if existing.borrow().size() == frame.size() {
            return Some(existing);
        }
    }

    match registry.allocate_like(title, frame, Some(Depth::U8), Some(1)) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}
