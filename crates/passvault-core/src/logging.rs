//! Rolling file logs for the vault core.
//!
//! Events are metadata only: operation, outcome, counts. Record names,
//! field values and passphrases never reach a log line.
//!
//! Logging is opt-in. Nothing is written until [`init_logging`] succeeds,
//! and the `log` macros are no-ops before that.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::{Result, VaultError};

const LOG_FILE_BASENAME: &str = "passvault";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LogLevel,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Verbosity accepted by [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// `debug` for debug builds, `info` for release builds.
    pub fn default_for_build() -> Self {
        if cfg!(debug_assertions) {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(VaultError::InvalidInput(format!(
                "Unknown log level '{}' (expected error|warn|info|debug|trace)",
                other
            ))),
        }
    }
}

/// Start writing logs under `dir`.
///
/// Repeating the call with the same directory and level is a no-op; any
/// other combination after the first success is rejected.
///
/// # Errors
///
/// - `InvalidInput` for a relative directory, a conflicting re-init or a
///   logger backend failure
/// - `Persistence` if the directory cannot be created
pub fn init_logging(level: LogLevel, dir: &Path) -> Result<()> {
    if !dir.is_absolute() {
        return Err(VaultError::InvalidInput(format!(
            "Log directory must be absolute: {}",
            dir.display()
        )));
    }

    let active = LOGGER.get_or_try_init(|| start_logger(level, dir))?;

    if active.dir != dir || active.level != level {
        return Err(VaultError::InvalidInput(format!(
            "Logging already started at {} with level {}",
            active.dir.display(),
            active.level
        )));
    }
    Ok(())
}

/// Level and directory of the running logger, if any.
pub fn logging_status() -> Option<(LogLevel, PathBuf)> {
    LOGGER.get().map(|active| (active.level, active.dir.clone()))
}

fn start_logger(level: LogLevel, dir: &Path) -> Result<ActiveLogger> {
    std::fs::create_dir_all(dir).map_err(|e| VaultError::persistence(dir, e))?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|e| VaultError::InvalidInput(format!("Log level: {}", e)))?
        .log_to_file(
            FileSpec::default()
                .directory(dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::Direct)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|e| VaultError::InvalidInput(format!("Failed to start logger: {}", e)))?;

    info!(
        "event=logging_start module=core status=ok level={} version={} platform={}",
        level,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}
