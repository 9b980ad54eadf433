//! User configuration, read from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_HISTORY_LIMIT, JsonFileStore};
use crate::session::InputMode;

/// Settings for the calculator front end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Whether key presses are validated before they are applied.
    pub input_mode: InputMode,
    /// Maximum number of history entries kept.
    pub history_limit: usize,
    /// History file; defaults to the user data directory.
    pub history_path: Option<PathBuf>,
    /// Accept `*` and `/` for `×` and `÷`.
    pub ascii_operators: bool,
    /// Print results with thousands separators.
    pub group_digits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_mode: InputMode::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_path: None,
            ascii_operators: true,
            group_digits: false,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/pocketcalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pocketcalc").join("config.toml"))
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file gives the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The history file to use, if any location is available.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_path
            .clone()
            .or_else(JsonFileStore::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input_mode, InputMode::Strict);
        assert_eq!(config.history_limit, 100);
        assert!(config.ascii_operators);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml(
            r#"
            input_mode = "advisory"
            history_limit = 25
            history_path = "/tmp/calc.json"
            group_digits = true
            "#,
        )
        .unwrap();
        assert_eq!(config.input_mode, InputMode::Advisory);
        assert_eq!(config.history_limit, 25);
        assert_eq!(config.history_path(), Some(PathBuf::from("/tmp/calc.json")));
        assert!(config.group_digits);
        assert!(config.ascii_operators);
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        assert!(Config::from_toml("theme = \"dark\"").is_err());
        assert!(Config::from_toml("input_mode = \"lenient\"").is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let path = std::env::temp_dir().join("pocketcalc-test-no-such-config.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
