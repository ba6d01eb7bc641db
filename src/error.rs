//! Error types for the optional platform capabilities.
//!
//! Nothing here is fatal: the engine logs these and carries on with defaults.

use thiserror::Error;

/// Failure reported by a key-value store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Storage exists but refused the operation (privacy mode, policy)
    #[error("storage access denied: {0}")]
    Denied(String),
    /// Write rejected for lack of space
    #[error("storage quota exceeded writing '{key}'")]
    QuotaExceeded { key: String },
    /// No storage on this platform
    #[error("storage unavailable")]
    Unavailable,
}

/// Failure reported by an audio, haptic or celebration capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("{capability} failed: {reason}")]
    Failed {
        capability: &'static str,
        reason: String,
    },
}

/// Rejected tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Field must be a finite number above zero
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("miss_penalty must be finite and non-negative, got {0}")]
    NegativePenalty(f64),
    #[error("game_duration {duration} exceeds max_time_cap {cap}")]
    DurationAboveCap { duration: f64, cap: f64 },
}
