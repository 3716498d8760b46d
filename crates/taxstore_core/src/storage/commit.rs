//! Backing file read and guarded full-file rewrite.
//!
//! # Invariants
//! - The backup is a byte-for-byte copy taken before every write attempt.
//! - On write failure the data file is restored before returning the error.

use super::codec::serialize_records;
use super::{StorageError, StorageResult};
use crate::config::StoreConfig;
use crate::model::tax::TaxRecord;
use log::{error, info, warn};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

/// Write seam for the commit step. Swapped out in tests to inject faults.
pub trait FileWriter {
    /// Replaces the full content of `path` with `contents`.
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Writes straight to the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileWriter;

impl FileWriter for FsFileWriter {
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }
}

/// Reads the whole backing file as UTF-8 text.
pub fn read_data_file(path: &Path) -> StorageResult<String> {
    fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates a header-only backing file at `path` for a first run.
///
/// # Errors
/// - `StorageError::Create` when the file already exists or cannot be written.
pub fn create_data_file(path: &Path) -> StorageResult<()> {
    let content = serialize_records(std::iter::empty::<&TaxRecord>());
    let created = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| file.write_all(content.as_bytes()));

    match created {
        Ok(()) => {
            info!(
                "event=store_create module=storage status=ok path={}",
                path.display()
            );
            Ok(())
        }
        Err(source) => {
            error!(
                "event=store_create module=storage status=error path={} error={}",
                path.display(),
                source
            );
            Err(StorageError::Create {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Rewrites the backing file with `records`, guarded by a backup copy.
///
/// # Side effects
/// - Overwrites `config.backup_path()` with the current data file bytes.
/// - Overwrites `config.data_path()` with the serialized snapshot.
/// - Emits `store_commit` and, on failure, `store_restore` logging events.
///
/// # Errors
/// - `StorageError::Backup` when the pre-commit copy fails; nothing was written.
/// - `StorageError::Write` when the rewrite fails; the restore outcome is
///   carried in `restored`.
pub fn commit_records<'a, W, I>(
    config: &StoreConfig,
    records: I,
    writer: &mut W,
) -> StorageResult<()>
where
    W: FileWriter + ?Sized,
    I: IntoIterator<Item = &'a TaxRecord>,
{
    let started_at = Instant::now();
    let data_path = config.data_path();
    let backup_path = config.backup_path();

    let has_backup = if data_path.exists() {
        if let Err(source) = fs::copy(data_path, &backup_path) {
            error!(
                "event=store_commit module=storage status=error error_code=backup_failed path={} error={}",
                backup_path.display(),
                source
            );
            return Err(StorageError::Backup {
                path: backup_path,
                source,
            });
        }
        true
    } else {
        // Only reachable when the file vanished after the store was opened.
        warn!(
            "event=store_commit module=storage status=no_backup reason=data_file_missing path={}",
            data_path.display()
        );
        false
    };

    let content = serialize_records(records);
    match writer.write_file(data_path, content.as_bytes()) {
        Ok(()) => {
            info!(
                "event=store_commit module=storage status=ok bytes={} duration_ms={}",
                content.len(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(source) => {
            error!(
                "event=store_commit module=storage status=error error_code=write_failed path={} duration_ms={} error={}",
                data_path.display(),
                started_at.elapsed().as_millis(),
                source
            );
            let restored = restore_data_file(data_path, &backup_path, has_backup);
            Err(StorageError::Write {
                path: data_path.to_path_buf(),
                source,
                restored,
            })
        }
    }
}

fn restore_data_file(data_path: &Path, backup_path: &Path, has_backup: bool) -> bool {
    let outcome = if has_backup {
        fs::copy(backup_path, data_path).map(|_| ())
    } else {
        // No prior file existed, so "restored" means no partial file is left.
        match fs::remove_file(data_path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    };

    match outcome {
        Ok(()) => {
            info!(
                "event=store_restore module=storage status=ok path={} from_backup={}",
                data_path.display(),
                has_backup
            );
            true
        }
        Err(err) => {
            error!(
                "event=store_restore module=storage status=error path={} from_backup={} error={}",
                data_path.display(),
                has_backup,
                err
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{commit_records, create_data_file, FileWriter, FsFileWriter};
    use crate::config::StoreConfig;
    use crate::model::tax::TaxRecord;
    use crate::storage::StorageError;
    use rust_decimal::Decimal;
    use std::fs;
    use std::io;
    use std::path::Path;

    struct TruncatingWriter;

    impl FileWriter for TruncatingWriter {
        fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
            fs::write(path, &contents[..contents.len() / 2])?;
            Err(io::Error::other("disk full"))
        }
    }

    fn sample() -> Vec<TaxRecord> {
        vec![TaxRecord::new("CA", "California", Decimal::new(725, 2))]
    }

    #[test]
    fn commit_backs_up_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("taxes.txt"));
        fs::write(config.data_path(), "old content\n").unwrap();

        commit_records(&config, sample().iter(), &mut FsFileWriter).unwrap();

        assert_eq!(
            fs::read_to_string(config.backup_path()).unwrap(),
            "old content\n"
        );
        assert!(fs::read_to_string(config.data_path())
            .unwrap()
            .contains("CA,California,7.25"));
    }

    #[test]
    fn create_data_file_writes_header_and_refuses_to_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxes.txt");

        create_data_file(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "region_key,region_name,rate\n"
        );

        fs::write(&path, "CA,California,7.25\n").unwrap();
        let err = create_data_file(&path).unwrap_err();
        assert!(matches!(err, StorageError::Create { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "CA,California,7.25\n");
    }

    #[test]
    fn failed_write_without_prior_file_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("taxes.txt"));

        let err = commit_records(&config, sample().iter(), &mut TruncatingWriter).unwrap_err();

        assert!(matches!(err, StorageError::Write { restored: true, .. }));
        assert!(!config.data_path().exists());
        assert!(!config.backup_path().exists());
    }
}
