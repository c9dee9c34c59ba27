//! Built-in key bindings of the capture loop.

/// Opens the capture device's settings dialog.
pub const SETTINGS_KEY: char = 'C';

/// Toggles the pause flag.
pub const PAUSE_KEY: char = 'p';

/// What a key callback wants done with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Continue with the built-in bindings using this key (possibly a different one)
    Continue(char),
    /// The callback consumed the key
    Handled,
}

/// Built-in action for a key, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Open the capture device's settings dialog
    Settings,
    /// Toggle visibility of the registry slot at this index
    ToggleSlot(usize),
    /// Flip the pause flag
    Pause,
    /// NUL key codes carry no key
    Ignore,
    /// Any other key stops the loop
    Stop,
}

impl Binding {
    pub fn for_key(key: char) -> Self {
        match key {
            SETTINGS_KEY => Binding::Settings,
            '0'..='9' => Binding::ToggleSlot(key as usize - '0' as usize),
            PAUSE_KEY => Binding::Pause,
            '\0' => Binding::Ignore,
            _ => Binding::Stop,
        }
    }
}
