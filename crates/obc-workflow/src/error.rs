//! Error types for obc-workflow

use thiserror::Error;

/// Result type alias using obc-workflow Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the pipeline.
///
/// Steps absorb provider failures into documented fallback values, so a
/// turn rarely sees one of these; the orchestrator still catches anything
/// that escapes and degrades to a fixed roadmap string.
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the provider layer
    #[error(transparent)]
    Provider(#[from] obc_providers::Error),

    /// Checkpoint persistence failed
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] std::io::Error),

    /// A generic workflow error
    #[error("{0}")]
    Other(String),
}
