//! Credential utilities library
//!
//! Provides the leaf building blocks of the identity service:
//! - Password hashing (Argon2id)
//! - Access token signing and validation (HS256 JWT)
//! - Opaque refresh token generation
//! - A coordinator bundling the three behind one configured handle
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{TokenCodec, TokenError};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.encode("alice@example.com", "session-1", Duration::minutes(15)).unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.session, "session-1");
//!
//! let expired = codec.encode("alice@example.com", "session-1", Duration::zero()).unwrap();
//! assert_eq!(codec.decode(&expired), Err(TokenError::Expired));
//! ```
//!
//! ## Complete Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(15));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Sign in: verify, then mint both tokens
//! assert!(auth.verify_password("password123", Some(&hash)));
//! let access_token = auth.issue_access_token("alice@example.com", "session-1").unwrap();
//! let refresh_token = auth.generate_refresh_token();
//! assert_ne!(access_token, refresh_token);
//!
//! // Validate
//! let claims = auth.validate_token(&access_token).unwrap();
//! assert_eq!(claims.email, "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::AccessClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::generate_refresh_token;
