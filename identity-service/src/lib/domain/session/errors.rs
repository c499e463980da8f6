use thiserror::Error;

use crate::domain::account::errors::AccountError;

/// Error for SessionId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for sign-in, token validation and refresh
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account has not been confirmed")]
    AccountNotConfirmed,

    // Token errors: all of them mean the caller must authenticate again
    #[error("Access token expired")]
    TokenExpired,

    #[error("Access token invalid: {0}")]
    TokenInvalid(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Refresh token invalid")]
    RefreshTokenInvalid,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Token issuance failed: {0}")]
    TokenIssuanceFailed(String),

    // Account lookups performed while authenticating
    #[error(transparent)]
    Account(#[from] AccountError),

    // Infrastructure errors
    #[error("Session store temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
