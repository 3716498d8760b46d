//! Logging bootstrap for tax store processes.
//!
//! # Responsibility
//! - Start the file-based rotating logger at most once per process.
//! - Keep log events metadata-only (`event=… module=… status=…`).
//! - Route panics into the log before the default hook runs.
//!
//! # Invariants
//! - Repeated init with the same level and directory is a no-op.
//! - Init with a different level or directory is rejected, never applied.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "taxstore";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Logging bootstrap failure.
#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDir(String),
    CreateDir { dir: PathBuf, source: std::io::Error },
    Backend(String),
    Conflict { active: String, requested: String },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDir(message) => write!(f, "invalid log_dir: {message}"),
            Self::CreateDir { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already initialized with `{active}`; refusing to switch to `{requested}`"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Initializes logging at `level` into rotating files under `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` for anything but trace|debug|info|warn|error.
/// - `InvalidDir` when `log_dir` is empty or relative.
/// - `Conflict` when logging is already active with another level or dir.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, &log_dir))?;
    if state.level != level || state.log_dir != log_dir {
        return Err(LoggingError::Conflict {
            active: format!("{} {}", state.level, state.log_dir.display()),
            requested: format!("{} {}", level, log_dir.display()),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` when logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: &Path) -> Result<LoggingState, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        dir: log_dir.to_path_buf(),
        source,
    })?;

    let logger = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();

    info!(
        "event=logging_init module=taxstore status=ok level={} log_dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _logger: logger,
    })
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        // Payloads may echo record fields; keep them on one short line.
        error!(
            "event=panic_captured module=taxstore status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\n', '\r'], " ");
    let mut truncated: String = single_line.chars().take(max_chars).collect();
    if single_line.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::InvalidDir("cannot be empty".to_string()));
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::InvalidDir(format!(
            "must be an absolute path, got `{trimmed}`"
        )));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, normalize_log_dir, sanitize_message,
        LoggingError, PANIC_HOOK_INSTALLED,
    };
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Stays on disk after the test: the logger keeps writing into it.
    fn unique_log_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "taxstore-logging-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn sanitize_message_flattens_and_truncates() {
        let sanitized = sanitize_message("CA\nCalifornia\r7.25", 8);
        assert_eq!(sanitized, "CA Calif...");
        assert_eq!(sanitize_message("short", 8), "short");
    }

    #[test]
    fn normalize_level_accepts_aliases_and_rejects_unknown() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert!(matches!(
            normalize_level("loud"),
            Err(LoggingError::UnsupportedLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn normalize_log_dir_rejects_relative_path() {
        let err = normalize_log_dir("logs/dev").unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let dir = unique_log_dir();
        let dir_str = dir.to_str().unwrap().to_string();

        init_logging("info", &dir_str).unwrap();
        init_logging("INFO", &dir_str).unwrap();

        let err = init_logging("debug", &dir_str).unwrap_err();
        assert!(matches!(err, LoggingError::Conflict { .. }));

        assert!(PANIC_HOOK_INSTALLED.get().is_some());

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir);
    }
}
