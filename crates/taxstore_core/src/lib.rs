//! Core data access for per-region tax rates.
//! Records live in an in-memory index mirrored to one flat text file.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::{StoreConfig, DEFAULT_BACKUP_SUFFIX};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::tax::{TaxRecord, TaxValidationError};
pub use repo::tax_repo::{RepoError, RepoResult, TaxRepository, TaxStore};
pub use service::tax_service::TaxService;
pub use storage::{FileWriter, FsFileWriter, StorageError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
