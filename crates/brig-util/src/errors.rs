use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all brig operations.
#[derive(Debug, Error, Diagnostic)]
pub enum BrigError {
    /// Invalid or malformed manifest data.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check the manifest document for syntax errors"))]
    Manifest { message: String },

    /// Malformed version or dependency specification string.
    /// The message carries the offending input.
    #[error("Invalid specification: {message}")]
    Spec { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type BrigResult<T> = miette::Result<T>;
