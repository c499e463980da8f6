use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountRepository;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshGrant;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;

/// Process-local account store keyed by normalized email.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<EmailAddress, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&account.email) {
            return Err(AccountError::DuplicateAccount(account.email.to_string()));
        }

        accounts.insert(account.email.clone(), account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.id == *id)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn confirm(&self, email: &EmailAddress) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .get_mut(email)
            .ok_or_else(|| AccountError::NotFound(email.to_string()))?;
        account.is_confirmed = true;

        Ok(account.clone())
    }
}

/// Process-local session store.
///
/// One mutex guards every operation, which makes find-or-create and token
/// replacement atomic.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_or_create_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.lock().await;

        if let Some(existing) = sessions.values().find(|s| s.account_id == *account_id) {
            return Ok(existing.clone());
        }

        let session = Session::new(*account_id);
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SessionError> {
        Ok(self.sessions.lock().await.get(id).cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, SessionError> {
        Ok(self
            .sessions
            .lock()
            .await
            .values()
            .find(|s| s.refresh.as_ref().is_some_and(|g| g.token == token))
            .cloned())
    }

    async fn rotate_refresh_token(
        &self,
        id: &SessionId,
        grant: RefreshGrant,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.lock().await;

        let session = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))?;
        session.refresh = Some(grant);

        Ok(session.clone())
    }

    async fn replace_refresh_token(
        &self,
        presented: &str,
        grant: RefreshGrant,
    ) -> Result<Option<Session>, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;

        let current = sessions.values_mut().find(|s| {
            s.refresh
                .as_ref()
                .is_some_and(|g| g.token == presented && !g.is_expired(now))
        });

        Ok(current.map(|session| {
            session.refresh = Some(grant);
            session.clone()
        }))
    }
}
