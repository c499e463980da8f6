use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::RefreshGrant;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::models::SignIn;
use crate::domain::session::models::TokenValidation;

/// Port for the session and token lifecycle.
#[async_trait]
pub trait SessionManagerPort: Send + Sync + 'static {
    /// Register a new, unconfirmed account and request email confirmation.
    ///
    /// # Errors
    /// * `DuplicateAccount` - Email is already registered
    /// * `Unavailable` - Credential store could not be reached
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError>;

    /// Mark an account as confirmed. Idempotent.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    async fn confirm_account(&self, email: &EmailAddress) -> Result<Account, AccountError>;

    /// Verify credentials and issue a fresh token pair for the account's session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `AccountNotConfirmed` - Password matched but the account is unconfirmed
    async fn authenticate(&self, credentials: Credentials) -> Result<SignIn, SessionError>;

    /// Validate an access token and the session it points to.
    ///
    /// # Errors
    /// * `TokenExpired` - Signature valid, expiry lapsed
    /// * `TokenInvalid` - Forged or malformed token
    /// * `SessionNotFound` - Referenced session no longer exists
    async fn validate_access_token(&self, token: &str) -> Result<TokenValidation, SessionError>;

    /// Redeem a refresh token for a new token pair. The presented token is
    /// single use.
    ///
    /// # Errors
    /// * `RefreshTokenInvalid` - Unknown or already rotated token
    /// * `RefreshTokenExpired` - Token is past its expiry
    async fn refresh(&self, refresh_token: &str) -> Result<SignIn, SessionError>;

    /// Retrieve account by email.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    async fn get_account(&self, email: &EmailAddress) -> Result<Account, AccountError>;
}

/// Persistence operations for sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Return the account's session, creating it if there is none.
    ///
    /// Must be atomic per account: concurrent callers for the same account
    /// all observe the same session (unique constraint or transactional upsert).
    async fn find_or_create_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Session, SessionError>;

    /// Retrieve session by identifier.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SessionError>;

    /// Retrieve the session currently holding a refresh token.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Store a new refresh grant on the session, replacing the previous one.
    ///
    /// Token and expiry are written together in a single update.
    ///
    /// # Errors
    /// * `SessionNotFound` - Session does not exist
    async fn rotate_refresh_token(
        &self,
        id: &SessionId,
        grant: RefreshGrant,
    ) -> Result<Session, SessionError>;

    /// Swap a presented, unexpired refresh token for a new grant.
    ///
    /// Compare-and-set: returns `None` when the presented token is no longer
    /// current or has expired, so a token can be redeemed only once.
    async fn replace_refresh_token(
        &self,
        presented: &str,
        grant: RefreshGrant,
    ) -> Result<Option<Session>, SessionError>;
}
