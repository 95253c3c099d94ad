//! Error types for Margin
//!
//! Missing or thin data is never an error here: the analytics degrade to
//! heuristic defaults with lower confidence. These variants cover input the
//! caller controls (unreadable files, malformed CSV, bad configuration).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
