//! Optional file logging.
//!
//! The terminal belongs to the game screen, so log output only goes to a file.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber writing to `path`; does nothing without a path
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {err}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_is_noop() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let err = init(Some(Path::new("/definitely/not/here/snake.log"))).unwrap_err();
        assert!(err.to_string().contains("Failed to create log file"));
    }
}
