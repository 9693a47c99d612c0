//! Logger setup.
//!
//! The TUI owns the terminal, so interactive runs log to a file in the data
//! directory. One-shot commands log to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

pub const LOG_FILE: &str = "flashcards.log";

/// Where log lines go.
#[derive(Debug, PartialEq, Eq)]
pub enum LogSink<'a> {
    Stderr,
    File(&'a Path),
    /// Drop every line. Used when nothing may touch the disk.
    Discard,
}

/// Install the global logger.
///
/// `RUST_LOG` wins over `default_filter`; an explicit `override_filter` wins
/// over both.
pub fn init(sink: LogSink<'_>, default_filter: &str, override_filter: Option<&str>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(filter) = override_filter {
        builder.parse_filters(filter);
    }

    match sink {
        LogSink::Stderr => {
            builder.target(Target::Stderr);
        }
        LogSink::File(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
            let path = dir.join(LOG_FILE);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        LogSink::Discard => {
            builder.target(Target::Pipe(Box::new(io::sink())));
        }
    }

    builder
        .format_timestamp_millis()
        .try_init()
        .with_context(|| "Failed to install logger")?;
    Ok(())
}
