//! Tracing setup for the binaries
//!
//! Logs go to stderr and, optionally, to a file without ANSI colours.
//! `RUST_LOG` overrides the level chosen on the command line.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directive(level: Level) -> String {
    level.as_str().to_lowercase()
}

/// Install the global subscriber; fails if one is already installed
pub fn init(level: Level, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to initialise logging")?;

    tracing::debug!(%level, log_file = ?log_file, "Logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(Level::INFO), "info");
        assert_eq!(default_directive(Level::TRACE), "trace");
    }

    #[test]
    fn test_file_sink_receives_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ontogent.log");

        init(Level::INFO, Some(&path)).unwrap();
        tracing::error!("file sink check");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("file sink check"));
        assert!(!contents.contains('\u{1b}'), "no ANSI escapes in file output");
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let path = std::env::temp_dir()
            .join("ontogent-missing-dir")
            .join("nested")
            .join("ontogent.log");
        let err = init(Level::INFO, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
