use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum GitReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Version format error: {0}")]
    Format(String),

    #[error("Unknown version scheme: {0}")]
    Scheme(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, GitReleaseError>;

impl GitReleaseError {
    /// Create a version format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        GitReleaseError::Format(msg.into())
    }

    /// Create a scheme error with context
    pub fn scheme(msg: impl Into<String>) -> Self {
        GitReleaseError::Scheme(msg.into())
    }

    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        GitReleaseError::NotFound(msg.into())
    }

    /// Create an already-exists error with context
    pub fn already_exists(msg: impl Into<String>) -> Self {
        GitReleaseError::AlreadyExists(msg.into())
    }

    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        GitReleaseError::Validation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitReleaseError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitReleaseError::Remote(msg.into())
    }
}
