//! Tracing setup.
//!
//! Filtering comes from `UNINN_LOG` (same syntax as `RUST_LOG`), falling back
//! to `warn`. Command-line subcommands log to stderr. The interactive view
//! owns the terminal, so it only logs when a log file was given.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "UNINN_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Where log lines go for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Off,
}

impl<'a> LogTarget<'a> {
    /// Pick a target: a log file always wins, otherwise stderr unless the
    /// terminal belongs to the interactive view.
    pub fn choose(log_file: Option<&'a Path>, interactive: bool) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path),
            None if interactive => LogTarget::Off,
            None => LogTarget::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init(target: LogTarget<'_>) -> anyhow::Result<()> {
    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
            .context("failed to initialize logging"),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
                .context("failed to initialize logging")
        }
    }
}
