use thiserror::Error;

/// Unified error type for mono-version operations
#[derive(Error, Debug)]
pub enum MonoVersionError {
    #[error("Repository unavailable: {0}")]
    RepoUnavailable(String),

    #[error("Unknown commit: {0}")]
    UnknownCommit(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project error: {0}")]
    Project(String),

    #[error("Output serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in mono-version
pub type Result<T> = std::result::Result<T, MonoVersionError>;

impl MonoVersionError {
    /// Create a repository-unavailable error with context
    pub fn repo_unavailable(msg: impl Into<String>) -> Self {
        MonoVersionError::RepoUnavailable(msg.into())
    }

    /// Create an unknown-commit error with context
    pub fn unknown_commit(msg: impl Into<String>) -> Self {
        MonoVersionError::UnknownCommit(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MonoVersionError::Config(msg.into())
    }

    /// Create a project error with context
    pub fn project(msg: impl Into<String>) -> Self {
        MonoVersionError::Project(msg.into())
    }
}
