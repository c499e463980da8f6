use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::events::ConfirmationRequestedEvent;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::errors::EventPublisherError;

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `DuplicateAccount` - Email is already registered
    /// * `Unavailable` - Store could not be reached
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Retrieve account by normalized email address.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Mark the account as confirmed.
    ///
    /// Confirming an already confirmed account leaves it unchanged.
    ///
    /// # Returns
    /// Confirmed account entity
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    async fn confirm(&self, email: &EmailAddress) -> Result<Account, AccountError>;
}

/// Outbound channel asking an external mailer to send confirmation emails.
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync + 'static {
    /// Publish a confirmation request.
    ///
    /// # Errors
    /// * `SerializationFailed` - Event serialization failed
    /// * `PublishFailed` - Failed to publish to broker
    async fn publish_confirmation_requested(
        &self,
        event: &ConfirmationRequestedEvent,
    ) -> Result<(), EventPublisherError>;
}
