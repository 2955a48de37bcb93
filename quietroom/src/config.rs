//! Persisted preferences.
//!
//! Theme files stay in their INI format; the app's own preferences are
//! JSON in the config directory.

use roomcore::storage::{self, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_theme() -> String {
    "green".to_string()
}

fn default_true() -> bool {
    true
}

fn default_autosave_mins() -> u32 {
    2
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Name of the theme to load at startup.
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Draw the double border around the writing box.
    #[serde(default = "default_true")]
    pub show_border: bool,
    /// Snapshot modified buffers periodically.
    #[serde(default)]
    pub autosave: bool,
    /// Minutes between autosave snapshots.
    #[serde(default = "default_autosave_mins")]
    pub autosave_interval_mins: u32,
    /// Preferred locale, e.g. "fr". CLI `--lang` overrides this.
    #[serde(default)]
    pub language: Option<String>,
    /// The custom theme being edited in preferences, key/value pairs in
    /// theme-file form. Empty until the user customizes something.
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            show_border: true,
            autosave: false,
            autosave_interval_mins: default_autosave_mins(),
            language: None,
            custom: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        storage::config_dir().join("config.json")
    }

    /// Lenient load: a missing or corrupt file yields the defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme, "green");
        assert!(config.show_border);
        assert!(!config.autosave);
        assert_eq!(config.autosave_interval_mins, 2);
    }

    #[test]
    fn test_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.theme = "amber".to_string();
        config.autosave = true;
        config.custom.insert("foreground".to_string(), "#ffaa00".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.theme, "amber");
        assert!(loaded.autosave);
        assert_eq!(loaded.custom.get("foreground").map(|s| s.as_str()), Some("#ffaa00"));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let loaded = Config::load_from(&path);
        assert_eq!(loaded.theme, "green");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "theme": "paper" }"#).unwrap();
        let loaded = Config::load_from(&path);
        assert_eq!(loaded.theme, "paper");
        assert!(loaded.show_border);
        assert_eq!(loaded.autosave_interval_mins, 2);
    }
}
