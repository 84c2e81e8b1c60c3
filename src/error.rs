use std::io;
use thiserror::Error;

/// Custom error type for procgate configuration and setup
#[derive(Error, Debug)]
pub enum ProcgateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for procgate
pub type Result<T> = std::result::Result<T, ProcgateError>;

impl ProcgateError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ProcgateError::Config(msg.into())
    }
}

/// The metrics source could not be queried.
///
/// Never surfaced to callers of the boundary: listing degrades to an empty
/// sequence and the error is logged.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Metrics source unavailable: {0}")]
    Unavailable(String),

    #[error("Metrics query timed out after {0} ms")]
    TimedOut(u64),

    #[error("Metrics worker failed: {0}")]
    Worker(String),
}

impl ProviderError {
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        ProviderError::Unavailable(msg.into())
    }
}

/// The OS rejected (or never answered) a priority change or termination.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("No such process: {0}")]
    NotFound(u32),

    #[error("Permission denied for process {0}")]
    PermissionDenied(u32),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Process control timed out after {0} ms")]
    TimedOut(u64),

    #[error("Unsupported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("OS error: {0}")]
    Os(#[from] io::Error),

    #[error("Control worker failed: {0}")]
    Worker(String),
}

impl ControlError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ControlError::InvalidArgument(msg.into())
    }
}

/// Login rejected. The message is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// A write was attempted without an active admin session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Not logged in")]
    NoSession,

    #[error("User '{0}' is not allowed to modify processes")]
    Forbidden(String),
}
