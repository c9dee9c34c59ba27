//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::WindowModeArg;

/// Debug viewer that runs a capture loop and shows intermediate pipeline images
#[derive(Parser, Debug)]
#[command(name = "vision-testbed")]
#[command(version, about = "Capture loop with toggleable debug image windows", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Show raw frames in a live preview window with this title
    #[arg(long)]
    pub preview: Option<String>,

    /// Scripted key presses, one per poll ('.' = no key)
    #[arg(long, short, default_value = "")]
    pub keys: String,

    /// Stop after this many processed frames
    #[arg(long, short)]
    pub frames: Option<u64>,

    /// Threshold level for the binary debug image
    #[arg(long, default_value = "128")]
    pub threshold: u8,

    /// Number of virtual capture devices (overrides config)
    #[arg(long)]
    pub devices: Option<u32>,

    /// Window mode for image windows (overrides config)
    #[arg(long)]
    pub window_mode: Option<WindowModeArg>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available capture devices
    ListDevices,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
