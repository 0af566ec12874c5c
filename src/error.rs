use thiserror::Error;

/// Failures from the remote tracker boundary, classified into the
/// kinds the engines dispatch on. Classification happens where the
/// `gh` output is read; nothing above this type inspects error text.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("gh binary unavailable: {0}")]
    MissingBinary(String),
    #[error("remote rejected one or more labels: {stderr}")]
    LabelRejected { stderr: String },
    #[error("remote rate limit hit: {stderr}")]
    RateLimited { stderr: String },
    #[error("gh {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("failed to run gh: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON from gh: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl TrackerError {
    /// Transient failures are worth retrying with backoff; everything
    /// else fails the record immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
