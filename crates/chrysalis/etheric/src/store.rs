//! Record stores.
//!
//! Provides the `RecordStore` trait, a `JsonFileStore` that keeps one record
//! as a JSON file, and an `InMemoryStore` for tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{EthericError, EthericResult};
use crate::record::PersistedRecord;

/// Durable storage for a single persisted record.
///
/// Single writer. Writes must be all-or-nothing.
pub trait RecordStore: Send + Sync {
    /// Load the record. `Ok(None)` means no record exists yet.
    fn load(&self) -> EthericResult<Option<PersistedRecord>>;

    /// Replace the stored record.
    fn save(&self, record: &PersistedRecord) -> EthericResult<()>;

    /// Human-readable location, for logs and self-description.
    fn location(&self) -> String;
}

/// Load a prior record for continuation.
///
/// Missing, unreadable and corrupt records all mean first life; failures are
/// logged and swallowed.
pub fn recover(store: &dyn RecordStore) -> Option<PersistedRecord> {
    match store.load() {
        Ok(Some(record)) => {
            info!(
                location = %store.location(),
                cycle_count = record.cycle_count,
                "continuing from persisted record"
            );
            Some(record)
        }
        Ok(None) => {
            info!(location = %store.location(), "no persisted record, first life");
            None
        }
        Err(e) => {
            warn!(
                location = %store.location(),
                error = %e,
                "persisted record unusable, starting first life"
            );
            None
        }
    }
}

// ── JSON File Store ─────────────────────────────────────────────────

/// JSON-file record store.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over
/// the target.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "record".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> EthericResult<Option<PersistedRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let record: PersistedRecord =
            serde_json::from_str(&contents).map_err(|e| EthericError::Corrupt {
                location: self.location(),
                reason: e.to_string(),
            })?;

        debug!(location = %self.location(), cycle_count = record.cycle_count, "record loaded");
        Ok(Some(record))
    }

    fn save(&self, record: &PersistedRecord) -> EthericResult<()> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| EthericError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Atomic write: write to .tmp, sync, then rename
        let tmp_path = self.tmp_path();
        {
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;

        debug!(location = %self.location(), cycle_count = record.cycle_count, "record saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

// ── In-Memory Store ─────────────────────────────────────────────────

/// In-memory record store (for testing).
pub struct InMemoryStore {
    data: std::sync::Mutex<Option<PersistedRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: std::sync::Mutex::new(None),
        }
    }

    /// A store that already holds a record.
    pub fn with_record(record: PersistedRecord) -> Self {
        Self {
            data: std::sync::Mutex::new(Some(record)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self) -> EthericResult<Option<PersistedRecord>> {
        let data = self.data.lock().map_err(|_| EthericError::LockError)?;
        Ok(data.clone())
    }

    fn save(&self, record: &PersistedRecord) -> EthericResult<()> {
        let mut data = self.data.lock().map_err(|_| EthericError::LockError)?;
        *data = Some(record.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}
