use std::sync::OnceLock;

use chrono::Duration;

use crate::jwt::AccessClaims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::generate_refresh_token;

/// Credential coordinator combining password hashing, access token signing
/// and refresh token generation.
///
/// Built once at startup from immutable configuration and shared behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    access_token_ttl: Duration,
    dummy_hash: OnceLock<Option<String>>,
}

/// Plaintext behind the hash that unknown accounts are verified against.
const DUMMY_PASSWORD: &str = "unknown-account-dummy-password";

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for access token signing
    /// * `access_token_ttl` - Lifetime of minted access tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_secret: &[u8], access_token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(jwt_secret),
            access_token_ttl,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a candidate password against a stored hash.
    ///
    /// When there is no stored hash (unknown account) the candidate is
    /// verified against a dummy hash, so both outcomes cost the same.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored hash, if an account was found
    ///
    /// # Returns
    /// True only when a stored hash exists and matches
    pub fn verify_password(&self, password: &str, stored_hash: Option<&str>) -> bool {
        match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => {
                if let Some(dummy) = self.dummy_hash() {
                    let _ = self.password_hasher.verify(password, dummy);
                }
                false
            }
        }
    }

    /// Mint an access token bound to a session.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_access_token(&self, email: &str, session: &str) -> Result<String, TokenError> {
        self.token_codec.encode(email, session, self.access_token_ttl)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `Expired` - Token lapsed
    /// * `Invalid` - Token is forged or malformed
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.token_codec.decode(token)
    }

    /// Generate a fresh opaque refresh token.
    pub fn generate_refresh_token(&self) -> String {
        generate_refresh_token()
    }

    /// Hash used for unknown accounts, created on first use with the same
    /// parameters as real hashes.
    fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| self.password_hasher.hash(DUMMY_PASSWORD).ok())
            .as_deref()
    }
}
