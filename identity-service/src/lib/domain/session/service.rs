use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenError;
use chrono::Duration;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::PasswordError;
use crate::domain::account::events::ConfirmationRequestedEvent;
use crate::domain::account::models::Account;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::ConfirmationNotifier;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::RefreshGrant;
use crate::domain::session::models::SessionId;
use crate::domain::session::models::SignIn;
use crate::domain::session::models::TokenValidation;
use crate::domain::session::ports::SessionManagerPort;
use crate::domain::session::ports::SessionRepository;

/// Fixed policy values applied by the session manager.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Lifetime of a refresh token from the moment it is issued
    pub refresh_token_ttl: Duration,
    /// Base of the confirmation callback URL sent to the mailer
    pub confirmation_url_base: String,
}

/// Domain service orchestrating registration, confirmation, sign-in and
/// token validation.
///
/// Holds no state of its own; the repositories own durability.
pub struct SessionManager<AR, SR, CN>
where
    AR: AccountRepository,
    SR: SessionRepository,
    CN: ConfirmationNotifier,
{
    accounts: Arc<AR>,
    sessions: Arc<SR>,
    notifier: Arc<CN>,
    authenticator: Arc<Authenticator>,
    policy: SessionPolicy,
}

impl<AR, SR, CN> SessionManager<AR, SR, CN>
where
    AR: AccountRepository,
    SR: SessionRepository,
    CN: ConfirmationNotifier,
{
    /// Create a new session manager with injected dependencies.
    ///
    /// # Arguments
    /// * `accounts` - Account persistence implementation
    /// * `sessions` - Session persistence implementation
    /// * `notifier` - Confirmation request publisher
    /// * `authenticator` - Password hashing and token signing
    /// * `policy` - Refresh TTL and confirmation URL base
    pub fn new(
        accounts: Arc<AR>,
        sessions: Arc<SR>,
        notifier: Arc<CN>,
        authenticator: Arc<Authenticator>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            accounts,
            sessions,
            notifier,
            authenticator,
            policy,
        }
    }

    /// Mint an access token for the session and a new refresh grant.
    fn mint_tokens(
        &self,
        account: &Account,
        session_id: &SessionId,
    ) -> Result<(String, RefreshGrant), SessionError> {
        let access_token = self
            .authenticator
            .issue_access_token(account.email.as_str(), &session_id.to_string())
            .map_err(|e| SessionError::TokenIssuanceFailed(e.to_string()))?;

        let expires_at = Utc::now()
            .checked_add_signed(self.policy.refresh_token_ttl)
            .ok_or_else(|| {
                SessionError::TokenIssuanceFailed("refresh token expiry out of range".to_string())
            })?;
        let grant = RefreshGrant::new(self.authenticator.generate_refresh_token(), expires_at);

        Ok((access_token, grant))
    }
}

#[async_trait]
impl<AR, SR, CN> SessionManagerPort for SessionManager<AR, SR, CN>
where
    AR: AccountRepository,
    SR: SessionRepository,
    CN: ConfirmationNotifier,
{
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, AccountError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        let account = Account::new(command.email, password_hash);
        let created = self.accounts.create(account).await?;

        tracing::info!(
            account_id = %created.id,
            email = %created.email,
            "Account registered"
        );

        // Published in the background; a slow or failed publish never fails registration.
        let event = ConfirmationRequestedEvent::new(&created, &self.policy.confirmation_url_base);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.publish_confirmation_requested(&event).await {
                tracing::error!(
                    account_id = %event.account_id,
                    error = %e,
                    "Failed to publish confirmation request; registration kept"
                );
            }
        });

        Ok(created)
    }

    async fn confirm_account(&self, email: &EmailAddress) -> Result<Account, AccountError> {
        let account = self.accounts.confirm(email).await?;

        tracing::info!(account_id = %account.id, "Account confirmed");

        Ok(account)
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<SignIn, SessionError> {
        let account = self.accounts.find_by_email(&credentials.email).await?;

        let verified = self.authenticator.verify_password(
            credentials.password.expose(),
            account.as_ref().map(|a| a.password_hash.as_str()),
        );

        let account = match account {
            Some(account) if verified => account,
            _ => {
                tracing::info!(email = %credentials.email, "Sign-in rejected");
                return Err(SessionError::InvalidCredentials);
            }
        };

        if !account.is_confirmed {
            tracing::info!(account_id = %account.id, "Sign-in refused for unconfirmed account");
            return Err(SessionError::AccountNotConfirmed);
        }

        let session = self.sessions.find_or_create_for_account(&account.id).await?;
        let (access_token, grant) = self.mint_tokens(&account, &session.id)?;
        let refresh_token = grant.token.clone();
        let session = self.sessions.rotate_refresh_token(&session.id, grant).await?;

        tracing::info!(
            account_id = %account.id,
            session_id = %session.id,
            "Tokens issued"
        );

        Ok(SignIn {
            access_token,
            refresh_token,
            session,
        })
    }

    async fn validate_access_token(&self, token: &str) -> Result<TokenValidation, SessionError> {
        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| match e {
                TokenError::Expired => SessionError::TokenExpired,
                other => SessionError::TokenInvalid(other.to_string()),
            })?;

        let session_id = SessionId::from_string(&claims.session)
            .map_err(|e| SessionError::TokenInvalid(e.to_string()))?;

        self.sessions
            .find_by_id(&session_id)
            .await?
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;

        Ok(TokenValidation {
            email: claims.email,
            session_id,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SignIn, SessionError> {
        let session = self
            .sessions
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(SessionError::RefreshTokenInvalid)?;

        match &session.refresh {
            Some(grant) if grant.is_expired(Utc::now()) => {
                return Err(SessionError::RefreshTokenExpired)
            }
            Some(_) => {}
            None => return Err(SessionError::RefreshTokenInvalid),
        }

        let account = self
            .accounts
            .find_by_id(&session.account_id)
            .await?
            .ok_or(SessionError::RefreshTokenInvalid)?;

        let (access_token, grant) = self.mint_tokens(&account, &session.id)?;
        let new_refresh_token = grant.token.clone();

        // Another request may have redeemed the same token in the meantime.
        let session = self
            .sessions
            .replace_refresh_token(refresh_token, grant)
            .await?
            .ok_or(SessionError::RefreshTokenInvalid)?;

        tracing::info!(
            account_id = %account.id,
            session_id = %session.id,
            "Refresh token redeemed"
        );

        Ok(SignIn {
            access_token,
            refresh_token: new_refresh_token,
            session,
        })
    }

    async fn get_account(&self, email: &EmailAddress) -> Result<Account, AccountError> {
        self.accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::NotFound(email.to_string()))
    }
}
