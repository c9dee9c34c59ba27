//! The blocking capture/display loop.

use std::fmt;

use crate::capture::{Capture, CaptureFactory};
use crate::display::Display;
use crate::error::TestbedError;
use crate::image::ImageBuffer;
use crate::registry::ImageRegistry;

use super::context::LoopContext;
use super::keys::{Binding, KeyDisposition};
use super::state::{LoopSettings, LoopState, LoopStats, StopHandle};

type VideoCallback = Box<dyn FnMut(&ImageBuffer, &mut LoopContext<'_>)>;
type KeyCallback = Box<dyn FnMut(char, &mut LoopContext<'_>) -> KeyDisposition>;

/// Where the loop gets its frames from.
pub enum VideoSource<'a> {
    /// A capture source the caller created and started; the caller stops it
    Device(&'a mut dyn Capture),
    /// Open and start the first device the factory enumerates; the loop
    /// stops and drops it on exit
    FirstAvailable(&'a dyn CaptureFactory),
}

enum ActiveCapture<'a> {
    Borrowed(&'a mut dyn Capture),
    Owned(Box<dyn Capture>),
}

impl ActiveCapture<'_> {
    fn as_mut(&mut self) -> &mut dyn Capture {
        match self {
            ActiveCapture::Borrowed(capture) => &mut **capture,
            ActiveCapture::Owned(capture) => &mut **capture,
        }
    }
}

/// Debug harness that runs a capture loop and displays registry images.
///
/// Pipeline code publishes intermediate images into the registry from the
/// video callback; toggling a slot's visibility (digit keys or
/// [`LoopContext::toggle_visible`]) opens a window that is refreshed after
/// every processed frame.
pub struct Testbed<D: Display> {
    registry: ImageRegistry,
    display: D,
    settings: LoopSettings,
    video_callback: Option<VideoCallback>,
    key_callback: Option<KeyCallback>,
    state: LoopState,
    paused: bool,
    stop: StopHandle,
    stats: LoopStats,
}

impl<D: Display> fmt::Debug for Testbed<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Testbed")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("paused", &self.paused)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<D: Display> Testbed<D> {
    /// Create an idle testbed with default loop settings.
    pub fn new(display: D) -> Self {
        Self::with_settings(display, LoopSettings::default())
    }

    pub fn with_settings(display: D, settings: LoopSettings) -> Self {
        Self {
            registry: ImageRegistry::new(),
            display,
            settings,
            video_callback: None,
            key_callback: None,
            state: LoopState::Idle,
            paused: false,
            stop: StopHandle::new(),
            stats: LoopStats::default(),
        }
    }

    pub fn registry(&self) -> &ImageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ImageRegistry {
        &mut self.registry
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// A handle that stops the loop from outside (another thread or a signal handler).
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Set the callback invoked with every captured frame.
    ///
    /// The callback runs before the registry is rendered, so images it
    /// publishes or updates show up for the same frame.
    pub fn set_video_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&ImageBuffer, &mut LoopContext<'_>) + 'static,
    {
        self.video_callback = Some(Box::new(callback));
    }

    /// Set the callback that sees every key before the built-in bindings.
    pub fn set_key_callback<F>(&mut self, callback: F)
    where
        F: FnMut(char, &mut LoopContext<'_>) -> KeyDisposition + 'static,
    {
        self.key_callback = Some(Box::new(callback));
    }

    /// Toggle visibility of a registry slot outside the loop.
    pub fn toggle_visible(&mut self, index: usize) -> bool {
        self.registry
            .toggle_visible(index, self.settings.window_mode, &mut self.display)
    }

    /// Run the capture loop until a stop key or a stop request.
    ///
    /// Blocks the calling thread. When `preview_title` is given, the raw
    /// frames are also shown in a window with that title. Windows are keyed
    /// by title, so a preview title that already names a registry image is
    /// ignored.
    ///
    /// # Errors
    /// * `TestbedError::InvalidState` - the testbed already ran
    /// * `TestbedError::NoDevices` - the factory enumerated no devices
    /// * `TestbedError::DeviceStartFailed` - the selected device refused to start
    /// * `TestbedError::Capture` - enumerating or opening the device failed
    ///
    /// On error the testbed stays `Idle`.
    pub fn start_video(
        &mut self,
        source: VideoSource<'_>,
        preview_title: Option<&str>,
    ) -> Result<(), TestbedError> {
        if self.state != LoopState::Idle {
            return Err(TestbedError::InvalidState(self.state));
        }

        let mut capture = open_source(source)?;

        let preview = preview_title
            .filter(|title| !title.is_empty())
            .filter(|title| {
                let taken = self.registry.lookup(title).is_some();
                if taken {
                    log::warn!(
                        "Live preview disabled: '{}' is already a registry image title",
                        title
                    );
                }
                !taken
            });
        if let Some(title) = preview {
            if let Err(e) = self
                .display
                .create_window(title, self.settings.window_mode)
            {
                log::warn!("Live preview window '{}' not created: {}", title, e);
            }
        }

        self.state = LoopState::Running;
        log::info!("Capture loop running");

        self.run(capture.as_mut(), preview);

        self.state = LoopState::Stopped;

        // A slot published under the preview title during the run owns the window now
        let shared = preview
            .and_then(|title| self.registry.lookup(title))
            .is_some_and(|index| self.registry.is_visible(index));
        if let Some(title) = preview.filter(|_| !shared) {
            if let Err(e) = self.display.destroy_window(title) {
                log::debug!("Live preview window '{}' not destroyed: {}", title, e);
            }
        }
        if let ActiveCapture::Owned(mut owned) = capture {
            owned.stop();
        }

        log::info!(
            "Capture loop stopped: {} frame(s) processed, {} missed, {} key(s)",
            self.stats.frames_processed,
            self.stats.frames_missed,
            self.stats.keys_received
        );
        Ok(())
    }

    fn run(&mut self, capture: &mut dyn Capture, preview: Option<&str>) {
        while !self.stop.is_stop_requested() {
            self.process_frame(capture, preview);

            if let Some(key) = self.display.poll_key(self.settings.poll_interval) {
                self.handle_key(key, capture);
            }
        }
    }

    fn process_frame(&mut self, capture: &mut dyn Capture, preview: Option<&str>) {
        let frame = match capture.capture_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.stats.frames_missed += 1;
                return;
            }
            Err(e) => {
                log::debug!("No frame this cycle: {}", e);
                self.stats.frames_missed += 1;
                return;
            }
        };
        self.stats.frames_captured += 1;

        // Paused: keep draining the device but freeze everything on screen
        if self.paused {
            return;
        }

        if let Some(callback) = self.video_callback.as_mut() {
            let mut ctx = LoopContext {
                registry: &mut self.registry,
                display: &mut self.display,
                window_mode: self.settings.window_mode,
                stop: &self.stop,
                paused: self.paused,
            };
            callback(&frame, &mut ctx);
        }

        self.registry.render_visible(&mut self.display);

        if let Some(title) = preview {
            if let Err(e) = self.display.show(title, &frame) {
                log::debug!("Live preview not updated: {}", e);
            }
        }

        self.stats.frames_processed += 1;
    }

    fn handle_key(&mut self, key: char, capture: &mut dyn Capture) {
        self.stats.keys_received += 1;

        let key = match self.key_callback.as_mut() {
            Some(callback) => {
                let mut ctx = LoopContext {
                    registry: &mut self.registry,
                    display: &mut self.display,
                    window_mode: self.settings.window_mode,
                    stop: &self.stop,
                    paused: self.paused,
                };
                match callback(key, &mut ctx) {
                    KeyDisposition::Continue(key) => key,
                    KeyDisposition::Handled => return,
                }
            }
            None => key,
        };

        match Binding::for_key(key) {
            Binding::Settings => {
                if !capture.show_settings_dialog() {
                    log::info!("Capture device has no settings dialog");
                }
            }
            Binding::ToggleSlot(index) => {
                self.registry
                    .toggle_visible(index, self.settings.window_mode, &mut self.display);
            }
            Binding::Pause => {
                self.paused = !self.paused;
                log::info!("Capture loop {}", if self.paused { "paused" } else { "resumed" });
            }
            Binding::Ignore => {}
            Binding::Stop => {
                log::info!("Key {:?} pressed, stopping", key);
                self.stop.request_stop();
            }
        }
    }
}

fn open_source(source: VideoSource<'_>) -> Result<ActiveCapture<'_>, TestbedError> {
    match source {
        VideoSource::Device(capture) => Ok(ActiveCapture::Borrowed(capture)),
        VideoSource::FirstAvailable(factory) => {
            let devices = factory.enumerate_devices()?;
            let device = devices.first().ok_or(TestbedError::NoDevices)?;
            log::info!("Using capture device {}", device);

            let mut capture = factory.create_capture(device)?;
            capture
                .start()
                .map_err(|source| TestbedError::DeviceStartFailed {
                    device: device.to_string(),
                    source,
                })?;
            Ok(ActiveCapture::Owned(capture))
        }
    }
}
