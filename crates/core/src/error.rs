//! # Errors
//!
//! Domain errors for board actions and tag generation.

use thiserror::Error;

/// Errors surfaced by board actions and the generation gateway.
///
/// `Provider` and `Parse` never reach the user on their own: the gateway
/// logs them and fills the request from the fallback table instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TierError {
    /// Bad input, rejected before any state change or network call
    #[error("validation error: {0}")]
    Validation(String),
    /// Network failure, non-success status, or credential rejection
    #[error("provider error: {0}")]
    Provider(String),
    /// Provider text could not be read as a JSON array
    #[error("parse error: {0}")]
    Parse(String),
    /// Nothing to do; shown to the user as a dismissible notice
    #[error("{0}")]
    NoOp(String),
}

impl TierError {
    /// The message without the error-kind prefix
    pub fn message(&self) -> &str {
        match self {
            TierError::Validation(m)
            | TierError::Provider(m)
            | TierError::Parse(m)
            | TierError::NoOp(m) => m,
        }
    }

    /// Whether this error should be shown as a notice rather than a failure
    pub fn is_notice(&self) -> bool {
        matches!(self, TierError::NoOp(_))
    }

    /// Whether the gateway recovers from this error with the fallback table
    pub fn triggers_fallback(&self) -> bool {
        matches!(self, TierError::Provider(_) | TierError::Parse(_))
    }
}

pub type TierResult<T> = std::result::Result<T, TierError>;
