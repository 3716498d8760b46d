//! Tax repository contract and file-backed store.
//!
//! # Responsibility
//! - Own the in-memory region-key index for one store instance.
//! - Load it from the backing file on open and rewrite the file on mutation.
//!
//! # Invariants
//! - Insert is strict: an existing key is rejected, never overwritten.
//! - Keys and names are trimmed before lookup and storage, the same way the
//!   file codec trims them on load.
//! - Reads answer from memory; the file is only re-read by `open`/`reload`.
//! - Opening fails when the backing file is missing or unreadable.
//! - A failed commit does not roll back the in-memory mutation, so memory
//!   and file may diverge until the next successful commit or a reload.

use crate::config::StoreConfig;
use crate::model::tax::{TaxRecord, TaxValidationError};
use crate::storage::{
    commit_records, create_data_file, parse_records, read_data_file, FileWriter, FsFileWriter,
    StorageError,
};
use log::{error, info};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for tax record operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaxValidationError),
    DuplicateKey(String),
    NotFound(String),
    Persistence(StorageError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateKey(key) => write!(f, "tax record already exists: {key}"),
            Self::NotFound(key) => write!(f, "tax record not found: {key}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateKey(_) => None,
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<TaxValidationError> for RepoError {
    fn from(value: TaxValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Persistence(value)
    }
}

/// Repository interface for tax record CRUD operations.
pub trait TaxRepository {
    /// Returns the record for `region_key`, or `None` when absent.
    fn get(&self, region_key: &str) -> RepoResult<Option<TaxRecord>>;
    /// Returns a snapshot of all records in unspecified order.
    fn list(&self) -> RepoResult<Vec<TaxRecord>>;
    /// Adds a new record. Fails with `DuplicateKey` if the key exists.
    fn insert(&mut self, record: &TaxRecord) -> RepoResult<TaxRecord>;
    /// Replaces an existing record. Fails with `NotFound` if the key is absent.
    fn update(&mut self, record: &TaxRecord) -> RepoResult<()>;
    /// Removes a record. Returns `false` when the key was absent.
    fn remove(&mut self, region_key: &str) -> RepoResult<bool>;
}

/// Tax store backed by one flat file.
///
/// Mutating methods take `&mut self`; callers sharing a store across threads
/// must wrap it in a mutex so mapping and file are updated as a unit.
pub struct TaxStore<W: FileWriter = FsFileWriter> {
    config: StoreConfig,
    records: HashMap<String, TaxRecord>,
    writer: W,
}

impl TaxStore<FsFileWriter> {
    /// Opens the store at `config.data_path()`, loading every valid line.
    ///
    /// # Errors
    /// - `RepoError::Persistence` when the file is missing or unreadable.
    pub fn open(config: StoreConfig) -> RepoResult<Self> {
        Self::open_with_writer(config, FsFileWriter)
    }

    /// Opens the store, first creating a header-only backing file when none
    /// exists yet.
    pub fn open_or_create(config: StoreConfig) -> RepoResult<Self> {
        if !config.data_path().exists() {
            create_data_file(config.data_path())?;
        }
        Self::open(config)
    }
}

impl<W: FileWriter> TaxStore<W> {
    /// Opens the store with a caller-provided write seam for commits.
    pub fn open_with_writer(config: StoreConfig, writer: W) -> RepoResult<Self> {
        let records = load_records(&config)?;
        Ok(Self {
            config,
            records,
            writer,
        })
    }

    /// Re-reads the backing file and replaces the whole in-memory index.
    ///
    /// Returns the number of records loaded. On failure the current index is
    /// kept as-is.
    pub fn reload(&mut self) -> RepoResult<usize> {
        self.records = load_records(&self.config)?;
        Ok(self.records.len())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, region_key: &str) -> bool {
        self.records.contains_key(region_key.trim())
    }

    fn commit(&mut self) -> RepoResult<()> {
        commit_records(&self.config, self.records.values(), &mut self.writer)?;
        Ok(())
    }
}

impl<W: FileWriter> TaxRepository for TaxStore<W> {
    fn get(&self, region_key: &str) -> RepoResult<Option<TaxRecord>> {
        Ok(self.records.get(region_key.trim()).cloned())
    }

    fn list(&self) -> RepoResult<Vec<TaxRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn insert(&mut self, record: &TaxRecord) -> RepoResult<TaxRecord> {
        let record = record.normalized();
        record.validate()?;
        if self.records.contains_key(&record.region_key) {
            return Err(RepoError::DuplicateKey(record.region_key));
        }

        self.records.insert(record.region_key.clone(), record.clone());
        self.commit()?;
        Ok(record)
    }

    fn update(&mut self, record: &TaxRecord) -> RepoResult<()> {
        let record = record.normalized();
        record.validate()?;
        match self.records.get_mut(&record.region_key) {
            Some(existing) => *existing = record,
            None => return Err(RepoError::NotFound(record.region_key)),
        }
        self.commit()
    }

    fn remove(&mut self, region_key: &str) -> RepoResult<bool> {
        if self.records.remove(region_key.trim()).is_none() {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }
}

fn load_records(config: &StoreConfig) -> RepoResult<HashMap<String, TaxRecord>> {
    let started_at = Instant::now();
    let path = config.data_path();

    let content = match read_data_file(path) {
        Ok(content) => content,
        Err(err) => {
            error!(
                "event=store_load module=repo status=error error_code=read_failed path={} error={}",
                path.display(),
                err
            );
            return Err(err.into());
        }
    };

    let report = parse_records(&content);
    info!(
        "event=store_load module=repo status=ok path={} records={} skipped={} duration_ms={}",
        path.display(),
        report.records.len(),
        report.skipped_lines.len(),
        started_at.elapsed().as_millis()
    );
    Ok(report.records)
}
