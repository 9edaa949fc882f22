//! Error types for the report generation core.

use std::io;
use thiserror::Error;

/// Result type alias for report generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the generation pipeline and its building blocks.
///
/// Transient failures (remote image downloads, temp-directory deletion) are
/// deliberately *not* represented here: they are logged and swallowed at the
/// point of failure so a broken image reference never aborts an export.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input was missing or empty (title, column formats, image
    /// extension). Raised synchronously at the violating call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The temporary-image root was never configured when an image staging
    /// was attempted. Fatal to the generation pass.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation was invoked out of lifecycle order.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// I/O error when writing the rendered output or creating the staging
    /// directory.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
