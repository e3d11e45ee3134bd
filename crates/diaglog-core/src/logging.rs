//! Operator log for diaglog.
//!
//! Failures of the reporting pipeline itself (dropped reports, failed
//! inserts, failed sweeps) never reach callers; they land here. The log is
//! a file under the XDG state dir, with stderr as the fallback.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// XDG prefix shared with the store and config.
const APP_DIR: &str = "diaglog";
const LOG_FILE: &str = "diaglog.log";
/// Target of this library's events (`diaglog_core`).
const CORE_TARGET: &str = env!("CARGO_CRATE_NAME");
/// Target of the `diaglog` binary's events.
const CLI_TARGET: &str = "diaglog";

/// Filter used when `RUST_LOG` is unset or invalid: everything at info,
/// diaglog's own targets at debug.
fn default_directives() -> String {
    format!("info,{CLI_TARGET}=debug,{CORE_TARGET}=debug")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()))
}

/// `~/.local/state/diaglog/diaglog.log` (honours `XDG_STATE_HOME`).
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR)?;
    Ok(xdg_dirs.get_state_home().join(LOG_FILE))
}

/// A clone of the log file per event, or stderr if cloning the handle fails.
enum LogSink {
    File(fs::File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFile(fs::File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogSink::File)
            .unwrap_or(LogSink::Stderr)
    }
}

/// Initialize structured logging to [`log_file_path`].
///
/// Returns Err when the log dir is unwritable or a subscriber is already
/// installed, so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(LogFile(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::info!(path = %path.display(), "diaglog operator log opened");
    Ok(())
}

/// Stderr-only logging, for when [`init_logging`] fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_name_both_crates() {
        let directives = default_directives();
        assert_eq!(CORE_TARGET, "diaglog_core");
        assert!(directives.contains("diaglog_core=debug"), "{directives}");
        assert!(directives.contains("diaglog=debug"), "{directives}");
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn log_file_sits_directly_under_app_state_dir() {
        let Ok(path) = log_file_path() else {
            return;
        };
        assert_eq!(path.file_name().unwrap(), LOG_FILE);
        assert_eq!(path.parent().unwrap().file_name().unwrap(), APP_DIR);
    }
}
