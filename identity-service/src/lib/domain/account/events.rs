use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::models::Account;

/// Domain event published after registration so an external mailer can ask
/// the owner to confirm the address.
#[derive(Debug, Clone)]
pub struct ConfirmationRequestedEvent {
    pub event_id: String,
    pub account_id: String,
    pub email: String,
    pub confirmation_url: String,
    pub requested_at: DateTime<Utc>,
}

impl ConfirmationRequestedEvent {
    /// Create a confirmation request for a newly registered account.
    ///
    /// # Arguments
    /// * `account` - Account that was registered
    /// * `confirmation_url_base` - Base of the confirmation callback, e.g.
    ///   `https://id.example.com/api/accounts/confirm`
    ///
    /// # Returns
    /// Event with unique event ID and a callback URL carrying the email
    pub fn new(account: &Account, confirmation_url_base: &str) -> Self {
        let email = account.email.as_str();

        Self {
            event_id: Uuid::new_v4().to_string(),
            account_id: account.id.to_string(),
            email: email.to_string(),
            confirmation_url: format!(
                "{}?email={}",
                confirmation_url_base,
                urlencoding::encode(email)
            ),
            requested_at: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &str {
        "confirmation_requested"
    }
}
