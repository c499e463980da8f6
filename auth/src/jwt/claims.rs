use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// The token identifies the account by email and points at the server-side
/// session it was minted for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Account email (subject identity)
    pub email: String,

    /// Session identifier the token is bound to
    pub session: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Create claims issued now and expiring after `ttl`.
    ///
    /// # Arguments
    /// * `email` - Account email
    /// * `session` - Session identifier
    /// * `ttl` - Lifetime of the token
    pub fn new(email: impl ToString, session: impl ToString, ttl: Duration) -> Self {
        Self::issued_at(email, session, Utc::now(), ttl)
    }

    /// Create claims with an explicit issue time.
    ///
    /// An expiry past the representable range is clamped to the maximum.
    pub fn issued_at(
        email: impl ToString,
        session: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            email: email.to_string(),
            session: session.to_string(),
            iat: issued_at.timestamp(),
            exp: issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is expired from the second its `exp` is reached, so a zero TTL
    /// yields a token that is never valid.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
