//! Logger setup.
//!
//! The level comes from `RUST_LOG` (default `info`). The terminal view owns
//! stdout/stderr while it runs, so it logs to a file instead.

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::AppError;

pub enum LogTarget<'a> {
    Stderr,
    /// Appends to the given file, creating it if needed.
    File(&'a Path),
}

pub fn init(target: LogTarget<'_>) -> Result<(), AppError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    match target {
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::new(2, format!("Failed to open log file '{}': {e}", path.display()))
                })?;
            builder.target(Target::Pipe(Box::new(file)));
        }
    }
    // A second init (e.g. from tests) keeps the first logger.
    let _ = builder.try_init();
    Ok(())
}
