//! Persistence for calculation history.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::HistoryEntry;

/// Where history entries are kept between runs.
pub trait HistoryStore {
    /// Load all stored entries, most recent first.
    fn load(&self) -> Result<Vec<HistoryEntry>>;

    /// Replace the stored entries.
    fn save(&self, entries: &[HistoryEntry]) -> Result<()>;

    /// Remove every stored entry.
    fn clear(&self) -> Result<()>;
}

/// History stored as a JSON array in a single file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/pocketcalc/history.json`, if a data directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("pocketcalc").join("history.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history from {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history in {}", self.path.display()))
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write history to {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
