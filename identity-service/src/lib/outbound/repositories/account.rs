use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountRepository;
use crate::outbound::repositories::retry::is_transient;
use crate::outbound::repositories::retry::RetryPolicy;

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    is_confirmed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            is_confirmed: row.is_confirmed,
            created_at: row.created_at,
        })
    }
}

fn store_error(e: sqlx::Error) -> AccountError {
    if is_transient(&e) {
        AccountError::Unavailable(e.to_string())
    } else {
        AccountError::DatabaseError(e.to_string())
    }
}

pub struct PostgresAccountRepository {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        // Not retried: a lost acknowledgement would turn into a false duplicate.
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, is_confirmed, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.is_confirmed)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AccountError::DuplicateAccount(account.email.to_string());
                }
            }
            store_error(e)
        })?;

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let row = self
            .retry
            .run("find_account_by_id", || async move {
                sqlx::query_as::<_, AccountRow>(
                    r#"
                    SELECT id, email, password_hash, is_confirmed, created_at
                    FROM accounts
                    WHERE id = $1
                    "#,
                )
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
            })
            .await
            .map_err(store_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        let row = self
            .retry
            .run("find_account_by_email", || async move {
                sqlx::query_as::<_, AccountRow>(
                    r#"
                    SELECT id, email, password_hash, is_confirmed, created_at
                    FROM accounts
                    WHERE email = $1
                    "#,
                )
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
            })
            .await
            .map_err(store_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn confirm(&self, email: &EmailAddress) -> Result<Account, AccountError> {
        let row = self
            .retry
            .run("confirm_account", || async move {
                sqlx::query_as::<_, AccountRow>(
                    r#"
                    UPDATE accounts
                    SET is_confirmed = TRUE
                    WHERE email = $1
                    RETURNING id, email, password_hash, is_confirmed, created_at
                    "#,
                )
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
            })
            .await
            .map_err(store_error)?;

        match row {
            Some(row) => Account::try_from(row),
            None => Err(AccountError::NotFound(email.to_string())),
        }
    }
}
