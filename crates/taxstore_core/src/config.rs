//! Store location configuration.
//!
//! # Responsibility
//! - Carry the backing file path and backup naming used by the store.
//!
//! # Invariants
//! - The backup path is always the data path with the suffix appended,
//!   so both files live in the same directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the data file path to name its backup copy.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// File locations for one tax store instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_path: PathBuf,
    backup_suffix: String,
}

impl StoreConfig {
    /// Creates a config for `data_path` with the default backup suffix.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }

    /// Overrides the backup suffix. An empty suffix falls back to the default,
    /// otherwise the backup would alias the data file.
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        if !suffix.is_empty() {
            self.backup_suffix = suffix;
        }
        self
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backup_suffix(&self) -> &str {
        &self.backup_suffix
    }

    /// Returns `<data_path><backup_suffix>`.
    pub fn backup_path(&self) -> PathBuf {
        let mut raw: OsString = self.data_path.clone().into_os_string();
        raw.push(&self.backup_suffix);
        PathBuf::from(raw)
    }
}
