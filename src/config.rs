//! Configuration file handling for vision-testbed.
//!
//! Loads configuration from `<config dir>/vision-testbed/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capture::SyntheticSettings;
use crate::display::WindowMode;
use crate::testbed::LoopSettings;

/// Configuration file structure for vision-testbed.
/// Loaded from the user config dir (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub testbed: TestbedConfig,
    #[serde(default)]
    pub synthetic: SyntheticSettings,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestbedConfig {
    /// Keyboard poll wait per loop iteration, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Title of the live preview window (no preview when unset)
    #[serde(default)]
    pub preview_title: Option<String>,
    /// Mode for windows opened by toggling a registry slot
    #[serde(default)]
    pub window_mode: WindowMode,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            preview_title: None,
            window_mode: WindowMode::default(),
        }
    }
}

impl TestbedConfig {
    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            window_mode: self.window_mode,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    20
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# vision-testbed configuration

[testbed]
# How long each keyboard poll waits for a key (milliseconds)
poll_interval_ms = 20
# Show raw frames in a live preview window with this title
# preview_title = "Live"
# Mode for image windows: autosize, normal
window_mode = "autosize"

[synthetic]
# Number of virtual test-pattern devices
devices = 1
# Frame size
width = 640
height = 480
# Drop every Nth frame to simulate a late camera (0 = never)
missed_every = 0
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("vision-testbed").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/vision-testbed/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.testbed.poll_interval_ms, 20);
        assert_eq!(config.synthetic.devices, 1);
    }

    #[test]
    fn test_default_config_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[testbed]\npreview_title = \"Live\"\nwindow_mode = \"normal\"\n\n[synthetic]\nmissed_every = 4"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.testbed.preview_title.as_deref(), Some("Live"));
        assert_eq!(config.testbed.window_mode, WindowMode::Normal);
        assert_eq!(config.testbed.poll_interval_ms, 20);
        assert_eq!(config.synthetic.missed_every, 4);
        assert_eq!(config.synthetic.width, 640);
    }

    #[test]
    fn test_parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[testbed]\nwindow_mode = \"fullscreen\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_window_mode_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[testbed]\nwindow_mode = \"normal\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.testbed.window_mode, WindowMode::Normal);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[testbed]\nwindow_flags = \"normal\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("window_flags"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let config: Result<Config, _> = toml::from_str("[camera]\ndevice = 0");
        assert!(config.is_err());
    }

    #[test]
    fn test_loop_settings_from_config() {
        let config = TestbedConfig {
            poll_interval_ms: 5,
            preview_title: None,
            window_mode: WindowMode::Normal,
        };
        let settings = config.loop_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(5));
        assert_eq!(settings.window_mode, WindowMode::Normal);
    }

    #[test]
    fn test_default_path_file_name() {
        let path = default_path();
        assert!(path.ends_with("vision-testbed/config.toml"));
    }
}
