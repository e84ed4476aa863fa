//! Common error types for liftfuel

use thiserror::Error;

/// Common result type for liftfuel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the liftfuel binaries
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Referenced identity has no registered row
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input row or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
