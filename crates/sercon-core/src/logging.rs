//! Logging init: append to a file under the XDG state dir, or fall back to stderr.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. Covers both `sercon_core` and the `sercon` binary.
const DEFAULT_FILTER: &str = "info,sercon=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Hands each event a clone of the log file, or stderr if cloning fails.
struct LogFile(File);

enum LogWriter {
    File(File),
    Stderr(io::Stderr),
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::File(f) => f.write(buf),
            LogWriter::Stderr(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::File(f) => f.flush(),
            LogWriter::Stderr(e) => e.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogWriter::File)
            .unwrap_or_else(|_| LogWriter::Stderr(io::stderr()))
    }
}

/// Path of the log file: `$XDG_STATE_HOME/sercon/sercon.log`. Creates the directory.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sercon")?;
    xdg_dirs
        .place_state_file("sercon.log")
        .context("cannot create sercon state directory")
}

/// Install a `tracing` subscriber writing to the log file.
///
/// Returns Err if the file cannot be opened or a subscriber is already set, so
/// the caller can fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(LogFile(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install log subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "sercon logging initialized");
    Ok(path)
}

/// Log to stderr only. Silently does nothing if a subscriber is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
