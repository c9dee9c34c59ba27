//! CLI enum types.

use clap::ValueEnum;

use crate::display::WindowMode;

/// Mode for windows opened by toggling an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WindowModeArg {
    #[default]
    Autosize,
    Normal,
}

impl From<WindowModeArg> for WindowMode {
    fn from(mode: WindowModeArg) -> Self {
        match mode {
            WindowModeArg::Autosize => WindowMode::AutoSize,
            WindowModeArg::Normal => WindowMode::Normal,
        }
    }
}
