use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::models::AccountId;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshGrant;
use crate::domain::session::models::Session;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionRepository;
use crate::outbound::repositories::retry::is_transient;
use crate::outbound::repositories::retry::RetryPolicy;

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    account_id: Uuid,
    refresh_token: Option<String>,
    refresh_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        // The table CHECK keeps token and expiry set or unset together.
        let refresh = match (row.refresh_token, row.refresh_token_expires_at) {
            (Some(token), Some(expires_at)) => Some(RefreshGrant::new(token, expires_at)),
            _ => None,
        };

        Session {
            id: SessionId(row.id),
            account_id: AccountId(row.account_id),
            refresh,
            created_at: row.created_at,
        }
    }
}

fn store_error(e: sqlx::Error) -> SessionError {
    if is_transient(&e) {
        SessionError::Unavailable(e.to_string())
    } else {
        SessionError::DatabaseError(e.to_string())
    }
}

pub struct PostgresSessionRepository {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn find_or_create_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Session, SessionError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = self
            .retry
            .run("find_or_create_session", || async move {
                sqlx::query_as::<_, SessionRow>(
                    r#"
                    INSERT INTO sessions (id, account_id, created_at)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (account_id) DO UPDATE SET account_id = EXCLUDED.account_id
                    RETURNING id, account_id, refresh_token, refresh_token_expires_at, created_at
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(account_id.0)
                .bind(Utc::now())
                .fetch_one(&self.pool)
                .await
            })
            .await
            .map_err(store_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SessionError> {
        let row = self
            .retry
            .run("find_session_by_id", || async move {
                sqlx::query_as::<_, SessionRow>(
                    r#"
                    SELECT id, account_id, refresh_token, refresh_token_expires_at, created_at
                    FROM sessions
                    WHERE id = $1
                    "#,
                )
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
            })
            .await
            .map_err(store_error)?;

        Ok(row.map(Session::from))
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let row = self
            .retry
            .run("find_session_by_refresh_token", || async move {
                sqlx::query_as::<_, SessionRow>(
                    r#"
                    SELECT id, account_id, refresh_token, refresh_token_expires_at, created_at
                    FROM sessions
                    WHERE refresh_token = $1
                    "#,
                )
                .bind(token)
                .fetch_optional(&self.pool)
                .await
            })
            .await
            .map_err(store_error)?;

        Ok(row.map(Session::from))
    }

    async fn rotate_refresh_token(
        &self,
        id: &SessionId,
        grant: RefreshGrant,
    ) -> Result<Session, SessionError> {
        let grant = &grant;
        let row = self
            .retry
            .run("rotate_refresh_token", || async move {
                sqlx::query_as::<_, SessionRow>(
                    r#"
                    UPDATE sessions
                    SET refresh_token = $2, refresh_token_expires_at = $3
                    WHERE id = $1
                    RETURNING id, account_id, refresh_token, refresh_token_expires_at, created_at
                    "#,
                )
                .bind(id.0)
                .bind(grant.token.as_str())
                .bind(grant.expires_at)
                .fetch_optional(&self.pool)
                .await
            })
            .await
            .map_err(store_error)?;

        row.map(Session::from)
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))
    }

    async fn replace_refresh_token(
        &self,
        presented: &str,
        grant: RefreshGrant,
    ) -> Result<Option<Session>, SessionError> {
        // Not retried: a repeat after a lost acknowledgement would find the
        // token already swapped and report it as redeemed.
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            UPDATE sessions
            SET refresh_token = $2, refresh_token_expires_at = $3
            WHERE refresh_token = $1 AND refresh_token_expires_at > $4
            RETURNING id, account_id, refresh_token, refresh_token_expires_at, created_at
            "#,
        )
        .bind(presented)
        .bind(&grant.token)
        .bind(grant.expires_at)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(Session::from))
    }
}
