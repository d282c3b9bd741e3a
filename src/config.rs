use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::bank::DEFAULT_BUNDLED_BANK;
use crate::engine::filter::ALL_TAG;

pub const APP_DIR: &str = "milestone-quiz";
pub const LOCAL_BANK_FILE: &str = "milestone_quiz_questions.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_filter")]
    pub default_filter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_path: Option<String>,
    #[serde(default = "default_bundled_bank")]
    pub bundled_bank: String,
    #[serde(default = "default_show_rationale")]
    pub show_rationale: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_filter() -> String {
    ALL_TAG.to_string()
}
fn default_bundled_bank() -> String {
    DEFAULT_BUNDLED_BANK.to_string()
}
fn default_show_rationale() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_filter: default_filter(),
            bank_path: None,
            bundled_bank: default_bundled_bank(),
            show_rationale: default_show_rationale(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Write the default config to `path`. An existing file that does not
    /// parse is left untouched and reported instead.
    pub fn write_default(path: &Path) -> Result<()> {
        Self::load_from(path).context("refusing to overwrite an unreadable config")?;
        Config::default().save_to(path)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    pub fn default_log_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("quiz.log")
    }

    /// Reset `default_filter` to `all` when the bank has no such tag.
    pub fn normalize_default_filter(&mut self, valid_tags: &[String]) {
        let filter = self.default_filter.trim();
        if filter.eq_ignore_ascii_case(ALL_TAG) || valid_tags.iter().any(|t| t == filter) {
            return;
        }
        warn!(
            "unknown filter '{}', falling back to '{ALL_TAG}'",
            self.default_filter
        );
        self.default_filter = default_filter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Vec<String> {
        vec!["recall".to_string(), "fine".to_string()]
    }

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.default_filter, "all");
        assert_eq!(config.bank_path, None);
        assert_eq!(config.bundled_bank, "milestones");
        assert!(config.show_rationale);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let toml_str = r#"
theme = "catppuccin-mocha"
bank_path = "/srv/quiz/bank.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.bank_path.as_deref(), Some("/srv/quiz/bank.json"));
        assert_eq!(config.default_filter, "all");
        assert!(config.show_rationale);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.default_filter = "fine".to_string();
        config.show_rationale = false;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.default_filter, "fine");
        assert!(!deserialized.show_rationale);
    }

    #[test]
    fn test_normalize_default_filter_valid_tag_unchanged() {
        let mut config = Config::default();
        config.default_filter = "fine".to_string();
        config.normalize_default_filter(&tags());
        assert_eq!(config.default_filter, "fine");
    }

    #[test]
    fn test_normalize_default_filter_all_unchanged() {
        let mut config = Config::default();
        config.default_filter = "ALL".to_string();
        config.normalize_default_filter(&tags());
        assert_eq!(config.default_filter, "ALL");
    }

    #[test]
    fn test_normalize_default_filter_unknown_resets() {
        let mut config = Config::default();
        config.default_filter = "haskell".to_string();
        config.normalize_default_filter(&tags());
        assert_eq!(config.default_filter, "all");
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.theme, "terminal-default");
    }

    #[test]
    fn test_load_from_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = \"solarized-light\"\nbank_path = 42\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn test_write_default_keeps_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("milestone-quiz").join("config.toml");
        let original = "theme = \"solarized-light\"\nbank_path = 42\n";
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, original).unwrap();

        assert!(Config::write_default(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_write_default_writes_defaults_not_current_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::write_default(&path).unwrap();
        let written = Config::load_from(&path).unwrap();
        assert_eq!(written.theme, "terminal-default");
        assert_eq!(written.default_filter, "all");

        // A valid file is replaced with defaults.
        fs::write(&path, "theme = \"catppuccin-mocha\"\n").unwrap();
        Config::write_default(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().theme, "terminal-default");
    }
}
