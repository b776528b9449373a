//! Error types for vault operations.

use thiserror::Error;

/// Errors that can occur during vault operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO failure reading the vault.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A note failed to parse.
    #[error("parse error: {0}")]
    Parse(#[from] lodestone_parser::ParseError),
}

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, Error>;
