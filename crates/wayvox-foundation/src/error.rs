use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Position stream error: {0}")]
    PositionStream(String),

    #[error("Invalid guidance transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

/// Coarse classification used by callers deciding whether to keep a
/// session alive after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Surface to the user, keep the session alive and retry-eligible.
    Recoverable,
    /// Tear the session down.
    Fatal,
}

impl AppError {
    pub fn severity(&self) -> Severity {
        match self {
            AppError::PositionStream(_) => Severity::Recoverable,
            AppError::Config(_)
            | AppError::InvalidTransition { .. }
            | AppError::ShutdownRequested
            | AppError::Fatal(_) => Severity::Fatal,
        }
    }
}
