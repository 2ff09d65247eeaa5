// Copyright (C) 2025  Tom Waddington
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Settings persistence
//!
//! JSON settings file with defaults merged on load; a missing or invalid
//! file falls back to defaults rather than failing startup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::keys::parse_key;
use crate::types::{ConfigError, IntervalBounds, KeyConfig};

/// Most keys a user can configure.
pub const MAX_KEYS: usize = 3;

const SETTINGS_DIR: &str = "extended-afk";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: String,
    pub keys: Vec<KeyConfig>,
    pub min_interval_minutes: u64,
    pub max_interval_minutes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            keys: vec![
                KeyConfig::new("l", true),
                KeyConfig::new("t", true),
                KeyConfig::new("f1", true),
            ],
            min_interval_minutes: 10,
            max_interval_minutes: 14,
        }
    }
}

impl Settings {
    /// Per-user settings path, e.g. `~/.config/extended-afk/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from `path`. Missing fields merge with defaults; an
    /// unreadable or invalid file is logged and replaced by defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("settings file not found, using defaults");
            return Self::default();
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                error!("failed to read settings: {err}");
                warn!("using default settings");
                return Self::default();
            }
        };

        let settings: Settings = match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(err) => {
                error!("failed to parse settings: {err}");
                warn!("using default settings");
                return Self::default();
            }
        };

        if let Err(err) = settings.validate() {
            error!("invalid settings: {err}");
            warn!("using default settings");
            return Self::default();
        }

        info!("settings loaded from {}", path.display());
        settings
    }

    /// Write settings as pretty JSON, creating the directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        info!("settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds()?;
        if self.keys.len() > MAX_KEYS {
            return Err(ConfigError::TooManyKeys {
                max: MAX_KEYS,
                got: self.keys.len(),
            });
        }
        for config in &self.keys {
            if parse_key(&config.key).is_none() {
                return Err(ConfigError::UnknownKey(config.key.clone()));
            }
        }
        Ok(())
    }

    /// Interval bounds in seconds for the scheduler.
    pub fn bounds(&self) -> Result<IntervalBounds, ConfigError> {
        IntervalBounds::from_minutes(self.min_interval_minutes, self.max_interval_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_path(dir: &TempDir) -> PathBuf {
        dir.path().join("settings.json")
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&settings_path(&dir));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);

        let settings = Settings {
            keys: vec![KeyConfig::new("space", false)],
            min_interval_minutes: 1,
            max_interval_minutes: 2,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        fs::write(&path, "{not json").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_invalid_intervals_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        fs::write(
            &path,
            r#"{"min_interval_minutes": 14, "max_interval_minutes": 10}"#,
        )
        .unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_merges_defaults() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        fs::write(&path, r#"{"min_interval_minutes": 2}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.min_interval_minutes, 2);
        assert_eq!(settings.max_interval_minutes, 14);
        assert_eq!(settings.keys, Settings::default().keys);
    }

    #[test]
    fn test_validate_rejects_too_many_keys() {
        let settings = Settings {
            keys: vec![
                KeyConfig::new("a", false),
                KeyConfig::new("b", false),
                KeyConfig::new("c", false),
                KeyConfig::new("d", false),
            ],
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::TooManyKeys { max: 3, got: 4 })
        );
    }

    #[test]
    fn test_validate_rejects_unknown_key() {
        let settings = Settings {
            keys: vec![KeyConfig::new("f13", true)],
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::UnknownKey("f13".to_string()))
        );
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        Settings::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
