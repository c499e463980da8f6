use thiserror::Error;

/// Error type for access token operations.
///
/// `Expired` and `Invalid` are kept apart so callers can tell a token that was
/// once genuine from one that never was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}
