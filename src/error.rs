use std::io;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for battalert
#[derive(Error, Debug)]
pub enum BattError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Battery sampling failed: {0}")]
    Sample(#[from] SampleError),

    #[error("Invalid thresholds: {0}")]
    Validation(#[from] ValidationError),

    #[error("Notification failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("Login item error: {0}")]
    LoginItem(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for battalert
pub type Result<T> = std::result::Result<T, BattError>;

impl BattError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        BattError::Config(msg.into())
    }

    /// Create a login item error
    pub fn login_item<S: Into<String>>(msg: S) -> Self {
        BattError::LoginItem(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        BattError::Other(msg.into())
    }
}

/// Failures of the battery probe. A tick that hits one of these produces no reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("probe unavailable: {0}")]
    ProbeUnavailable(String),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
}

impl SampleError {
    pub fn probe_unavailable<S: Into<String>>(msg: S) -> Self {
        SampleError::ProbeUnavailable(msg.into())
    }
}

/// Rejected threshold pair. The store keeps its previous values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("low threshold ({low}%) must be below high threshold ({high}%)")]
    LowNotBelowHigh { low: u8, high: u8 },

    #[error("high threshold ({0}%) must not exceed 100%")]
    HighAboveHundred(u8),
}

/// Notification delivery failure. Logged, never retried.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification backend error: {0}")]
    Backend(String),

    #[error("notification task failed: {0}")]
    Task(String),
}
