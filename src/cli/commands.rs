//! Subcommand handlers for list-devices and config actions.

use super::args::ConfigAction;
use crate::capture::{CaptureFactory, SyntheticCaptureFactory};
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG};

/// List available capture devices and print them to stdout.
pub fn list_devices(factory: &SyntheticCaptureFactory) {
    match factory.enumerate_devices() {
        Ok(devices) => {
            if devices.is_empty() {
                println!("No capture devices found.");
                println!();
                println!("Set [synthetic] devices in the config file to enable test-pattern devices.");
            } else {
                println!("Available capture devices:");
                for device in devices {
                    println!("  {}", device);
                }
                println!();
                println!("The capture loop uses the first device listed.");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config: &Config) {
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Poll interval: {} ms", config.testbed.poll_interval_ms);
            println!(
                "  Live preview: {}",
                config.testbed.preview_title.as_deref().unwrap_or("(none)")
            );
            println!("  Window mode: {}", config.testbed.window_mode.name());
            println!("  Synthetic devices: {}", config.synthetic.devices);
            println!(
                "  Frame size: {}x{}",
                config.synthetic.width, config.synthetic.height
            );
            println!("  Missed every: {}", config.synthetic.missed_every);
            println!();

            let config_path = get_config_path();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            let config_path = get_config_path();

            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'vision-testbed config show' to view current settings.");
                std::process::exit(1);
            }

            // Create parent directories if needed
            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            if let Err(e) = std::fs::write(&config_path, DEFAULT_CONFIG) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
