//! Flat-file persistence for tax records.
//!
//! # Responsibility
//! - Parse and serialize the comma-delimited backing file.
//! - Rewrite the whole file on commit, guarded by a backup copy.
//!
//! # Invariants
//! - The backing file always mirrors a full in-memory snapshot; writes are
//!   never appends.
//! - A failed write restores the pre-commit bytes from the backup before the
//!   error is surfaced.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod codec;
mod commit;

pub use codec::{parse_records, serialize_records, LoadReport, HEADER_LINE};
pub use commit::{commit_records, create_data_file, read_data_file, FileWriter, FsFileWriter};

pub type StorageResult<T> = Result<T, StorageError>;

/// I/O failure while reading or rewriting the backing file.
#[derive(Debug)]
pub enum StorageError {
    /// Backing file is missing or unreadable.
    Read { path: PathBuf, source: io::Error },
    /// A new backing file could not be created.
    Create { path: PathBuf, source: io::Error },
    /// Pre-commit copy to the backup location failed; the data file was not touched.
    Backup { path: PathBuf, source: io::Error },
    /// Overwriting the data file failed. `restored` reports whether the
    /// pre-commit content was put back afterwards.
    Write {
        path: PathBuf,
        source: io::Error,
        restored: bool,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read tax data `{}`: {source}", path.display())
            }
            Self::Create { path, source } => {
                write!(f, "failed to create tax data `{}`: {source}", path.display())
            }
            Self::Backup { path, source } => {
                write!(f, "failed to back up tax data to `{}`: {source}", path.display())
            }
            Self::Write {
                path,
                source,
                restored,
            } => {
                write!(f, "failed to write tax data `{}`: {source}", path.display())?;
                if *restored {
                    write!(f, " (previous content restored)")
                } else {
                    write!(f, " (restore failed; file may be incomplete)")
                }
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Create { source, .. } => Some(source),
            Self::Backup { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}
