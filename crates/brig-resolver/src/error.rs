use miette::Diagnostic;
use thiserror::Error;

/// Errors that halt a resolve call.
///
/// The messages are part of the public contract; callers match on them
/// to classify failures.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// A name reappeared on the active DFS path.
    #[error("circular dependency detected: {path}")]
    CircularDependency { path: String },

    /// Unknown name, or every candidate was filtered out or failed.
    #[error("No suitable candidate for package {name} found")]
    #[diagnostic(help("check the package name and the requested version bounds"))]
    NoCandidate { name: String },

    /// The installed version cannot satisfy the request; installed
    /// packages are never replaced during resolution.
    #[error("Package {name} is required at version {required} but installed at version {installed}")]
    InstalledMismatch {
        name: String,
        required: String,
        installed: String,
    },

    /// A name was requested twice in one resolve with requirements the
    /// committed package cannot satisfy.
    #[error("Package {name} is already planned at version {selected}, which does not satisfy {requirement}")]
    SelectionConflict {
        name: String,
        selected: String,
        requirement: String,
    },
}
