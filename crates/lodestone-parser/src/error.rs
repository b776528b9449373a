//! Error types for note parsing.

use thiserror::Error;

/// Errors that can occur while parsing a note.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Frontmatter block was opened but never closed.
    #[error("unterminated frontmatter block")]
    UnterminatedFrontmatter,

    /// Frontmatter block is not a valid YAML mapping.
    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
