#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! High-score persistence adapters.
//!
//! The leaderboard lives in a JSON settings document under the
//! [`HIGH_SCORE_KEY`] entry. Loading is lenient: a missing file, a missing
//! key or malformed content all yield an empty table so a damaged settings
//! file never prevents a game from starting.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use arena_survival_core::HighScoreTable;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Settings key under which the leaderboard is stored.
pub const HIGH_SCORE_KEY: &str = "highScoreTable";

/// Errors raised while persisting the leaderboard.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The settings document exists but could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Location of the settings document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The settings document could not be written.
    #[error("failed to write {path}")]
    Write {
        /// Location of the settings document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The leaderboard could not be encoded.
    #[error("failed to encode high-score table")]
    Encode(#[from] serde_json::Error),
}

/// Backing storage for the leaderboard.
pub trait ScoreStore {
    /// Loads the persisted leaderboard; absent or corrupt data yields an empty table.
    fn load(&mut self) -> Result<HighScoreTable, StoreError>;

    /// Persists the provided leaderboard.
    fn save(&mut self, table: &HighScoreTable) -> Result<(), StoreError>;
}

/// Leaderboard stored in a JSON settings file shared with other settings.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the settings document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(document)) => Ok(Some(document)),
            Ok(_) => {
                warn!(path = %self.path.display(), "settings document is not an object");
                Ok(None)
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "settings document is malformed");
                Ok(None)
            }
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<HighScoreTable, StoreError> {
        let Some(value) = self
            .read_document()?
            .and_then(|mut document| document.remove(HIGH_SCORE_KEY))
        else {
            return Ok(HighScoreTable::new());
        };

        // Older settings files hold the table as an embedded JSON string.
        let decoded = match value {
            Value::String(text) => serde_json::from_str::<HighScoreTable>(&text),
            other => serde_json::from_value::<HighScoreTable>(other),
        };
        match decoded {
            Ok(table) => Ok(HighScoreTable::from_entries(table.entries().to_vec())),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "ignoring malformed high-score table");
                Ok(HighScoreTable::new())
            }
        }
    }

    fn save(&mut self, table: &HighScoreTable) -> Result<(), StoreError> {
        let mut document = self.read_document()?.unwrap_or_default();
        let _ = document.insert(HIGH_SCORE_KEY.to_owned(), serde_json::to_value(table)?);
        let encoded = serde_json::to_vec_pretty(&Value::Object(document))?;
        fs::write(&self.path, encoded).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Leaderboard kept in memory, for tests and sessions without persistence.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    table: HighScoreTable,
    saves: u32,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that starts with `table`.
    #[must_use]
    pub fn with_table(table: HighScoreTable) -> Self {
        Self { table, saves: 0 }
    }

    /// Most recently saved table.
    #[must_use]
    pub fn table(&self) -> &HighScoreTable {
        &self.table
    }

    /// Number of completed saves.
    #[must_use]
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<HighScoreTable, StoreError> {
        Ok(self.table.clone())
    }

    fn save(&mut self, table: &HighScoreTable) -> Result<(), StoreError> {
        self.table = table.clone();
        self.saves = self.saves.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        let mut table = HighScoreTable::new();
        table.submit("ada", 12);
        store.save(&table).expect("memory save");
        assert_eq!(store.saves(), 1);
        assert_eq!(store.load().expect("memory load"), table);
    }

    #[test]
    fn store_errors_name_the_path() {
        let error = StoreError::Write {
            path: PathBuf::from("/tmp/settings.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "failed to write /tmp/settings.json");
    }
}
