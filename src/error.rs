//! Error type for the fallible edges of the crate: configuration loading and
//! terminal I/O.
//!
//! Component faults (unmeasurable labels, missing anchor regions) are not
//! errors. They degrade to a safe layout and are only logged.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {path:?}: {message}")]
    ConfigParse { path: Option<PathBuf>, message: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("layout engine failure: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
