//! File logging.
//!
//! The terminal belongs to the UI, so log records are only written when a
//! log file is configured. The level comes from `RUST_LOG` and defaults to
//! `info`.

use std::env;
use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Target, WriteStyle};

use crate::QuizError;

const DEFAULT_FILTER: &str = "info";

pub fn init(log_file: Option<&Path>) -> Result<(), QuizError> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filters = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    log::info!("logging to {}", path.display());
    Ok(())
}
