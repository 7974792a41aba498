//! Rolling file logger for hosts that want core diagnostics on disk.
//!
//! # Responsibility
//! - Install the `flexi_logger` backend once per process.
//! - Keep core log lines metadata-only (`event=... module=... status=...`
//!   plus ids and counts, never document titles or payloads).
//!
//! # Invariants
//! - Repeating a call with the same level and directory is a no-op.
//! - A later call with a different level or directory is rejected.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "pagetree";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn matches(&self, level: LevelFilter, dir: &Path) -> Result<(), String> {
        if self.level != level || self.dir != dir {
            return Err(format!(
                "logging already running with level `{}` in `{}`; refusing level `{}` in `{}`",
                self.level,
                self.dir.display(),
                level,
                dir.display()
            ));
        }
        Ok(())
    }
}

/// Starts file logging at `level` (`trace|debug|info|warn|error`) under
/// the absolute directory `dir`.
///
/// # Errors
/// - Unknown level name or a relative `dir`.
/// - `dir` cannot be created, or the backend fails to start.
/// - Logging already runs with a different level or directory.
pub fn init_logging(level: &str, dir: &Path) -> Result<(), String> {
    let level = parse_level(level)?;
    if !dir.is_absolute() {
        return Err(format!("log dir must be absolute, got `{}`", dir.display()));
    }

    if let Some(active) = ACTIVE.get() {
        return active.matches(level, dir);
    }
    ACTIVE
        .get_or_try_init(|| start(level, dir))?
        .matches(level, dir)
}

fn start(level: LevelFilter, dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(dir)
        .map_err(|err| format!("cannot create log dir `{}`: {err}", dir.display()))?;

    let spec = LogSpecification::builder().default(level).build();
    let handle = Logger::with(spec)
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))?;

    info!(
        "event=logging_start module=core status=ok version={} level={}",
        env!("CARGO_PKG_VERSION"),
        level
    );
    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{}`; expected trace|debug|info|warn|error",
            level.trim()
        )),
        Ok(parsed) => Ok(parsed),
    }
}
