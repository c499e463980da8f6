use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PasswordError;

/// Account aggregate entity.
///
/// Plain data: hashing and verification live in the `auth` crate and are
/// composed by the session manager.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a freshly registered, unconfirmed account.
    ///
    /// # Arguments
    /// * `email` - Normalized email address
    /// * `password_hash` - PHC hash of the chosen password
    pub fn new(email: EmailAddress, password_hash: String) -> Self {
        Self {
            id: AccountId::new(),
            email,
            password_hash,
            is_confirmed: false,
            created_at: Utc::now(),
        }
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Stored trimmed and lowercased so that lookups and the uniqueness check see
/// one canonical spelling per mailbox. Validated with an RFC 5322 parser that
/// accepts a bare address only; `Name <addr>` forms are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new normalized, validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let options = email_address::Options::default().without_display_text();
        email_address::EmailAddress::parse_with_options(email.trim(), options)
            .map(|parsed| EmailAddress(parsed.email().to_lowercase()))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password held only for the duration of a request.
///
/// Its `Debug` output is redacted so it cannot leak through logs or error
/// payloads.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wrap a raw password.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    pub fn new(password: String) -> Result<Self, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(password))
    }

    /// Access the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Command to register a new account
#[derive(Debug)]
pub struct RegisterAccountCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterAccountCommand {
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }
}
