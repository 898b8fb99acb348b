//! Application configuration
//!
//! Loaded from `~/.activepad/config.toml` unless a path is given. A missing file
//! is not an error: every section falls back to its defaults so the picker can
//! always start.
//!
//! ```toml
//! preferred_key = "0:Xbox Wireless Controller"
//!
//! [poll]
//! interval_ms = 60
//!
//! [picker]
//! deadzone = 0.3
//! switch_debounce_frames = 8
//! ```

use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::controller::PollerSettings;
use crate::picker::{DeviceKey, PickerSettings};

const CONFIG_DIR: &str = ".activepad";
const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Polling cadence
    pub poll: PollerSettings,
    /// Picker tuning
    pub picker: PickerSettings,
    /// Device that always wins while connected, as `"{index}:{id}"`
    pub preferred_key: Option<String>,
}

impl AppConfig {
    /// Default config file location under the home directory
    pub fn default_path() -> PathBuf {
        let mut path = get_home_dir();
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "No config file at {}, using default settings",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parsed preferred key; a malformed value is ignored with a warning
    pub fn preferred(&self) -> Option<DeviceKey> {
        let raw = self.preferred_key.as_deref()?;
        match raw.parse() {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("Ignoring preferred key: {}", e);
                None
            }
        }
    }
}

fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        warn!("Could not determine home directory, using current directory");
        PathBuf::from(".")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_default_independently() {
        let config: AppConfig = toml::from_str(
            r#"
            preferred_key = "1:Pro Controller"

            [picker]
            min_score = 0.75
            "#,
        )
        .unwrap();

        assert_eq!(config.poll, PollerSettings::default());
        assert_eq!(config.picker.min_score, 0.75);
        assert_eq!(config.picker.deadzone, 0.25);
        assert_eq!(config.preferred(), Some(DeviceKey::new(1, "Pro Controller")));
    }

    #[test]
    fn malformed_preferred_key_is_ignored() {
        let config = AppConfig {
            preferred_key: Some("Pro Controller".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.preferred(), None);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("activepad-missing-config.toml");
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("activepad-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[picker\ndeadzone = ").unwrap();
        let result = AppConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn default_path_is_under_config_dir() {
        let path = AppConfig::default_path();
        assert!(path.ends_with(".activepad/config.toml"));
    }
}
