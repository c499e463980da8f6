use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Password;
use crate::domain::session::errors::SessionIdError;

/// Session entity binding an account to its current refresh token.
///
/// At most one session exists per account; repeated sign-ins rotate the
/// refresh grant inside it and keep the id.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub account_id: AccountId,
    pub refresh: Option<RefreshGrant>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session that has not been issued a refresh token yet.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            id: SessionId::new(),
            account_id,
            refresh: None,
            created_at: Utc::now(),
        }
    }
}

/// Session unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, SessionIdError> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|e| SessionIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Refresh token together with its expiry.
///
/// The two values only ever exist as a pair.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshGrant {
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self { token, expires_at }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for RefreshGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshGrant")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Email/password pair presented at sign-in
#[derive(Debug)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: Password,
}

impl Credentials {
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }
}

/// Tokens handed out by a successful sign-in or refresh
#[derive(Debug, Clone)]
pub struct SignIn {
    pub access_token: String,
    pub refresh_token: String,
    pub session: Session,
}

/// Outcome of a successful access token validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValidation {
    pub email: String,
    pub session_id: SessionId,
}
