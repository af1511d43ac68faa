//! File logging for the terminal app.
//!
//! The terminal belongs to the UI while the app runs, so log records go to
//! rotating files under the configured log directory instead of stderr.
//! Initialization happens at most once per process.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "habitgrid";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Default level: `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}

/// Maps user spellings onto the levels the logger understands.
pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" | "none" => Ok("off"),
        other => Err(anyhow!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

/// Starts file logging. Repeating the call with the same level and
/// directory is a no-op; a different configuration is rejected.
pub fn init_logging(level: &str, dir: &Path) -> Result<()> {
    let level = normalize_level(level)?;

    if let Some(active) = ACTIVE.get() {
        if active.level == level && active.dir == dir {
            return Ok(());
        }
        return Err(anyhow!(
            "logging already started at level `{}` in `{}`",
            active.level,
            active.dir.display()
        ));
    }

    let active = ACTIVE.get_or_try_init(|| -> Result<ActiveLogger> {
        std::fs::create_dir_all(dir)
            .map_err(|err| anyhow!("failed to create log directory `{}`: {err}", dir.display()))?;

        let handle = Logger::try_with_str(level)?
            .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()?;

        info!(
            "event=app_start module=logging status=ok version={} level={} dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            dir.display()
        );

        Ok(ActiveLogger {
            level,
            dir: dir.to_path_buf(),
            _handle: handle,
        })
    })?;

    if active.level != level || active.dir != dir {
        return Err(anyhow!("logging was started concurrently with another configuration"));
    }
    Ok(())
}

/// Level and directory of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_normalized() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("Warning").unwrap(), "warn");
        assert!(normalize_level("loud").is_err());
    }

    #[test]
    fn init_is_idempotent_and_rejects_other_config() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        init_logging("info", &logs).unwrap();
        init_logging("info", &logs).unwrap();
        assert!(init_logging("debug", &logs).is_err());
        assert!(init_logging("info", &dir.path().join("elsewhere")).is_err());

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir, logs);
    }
}
