use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::account::events::ConfirmationRequestedEvent;

/// Serializable envelope for account events sent to the mailer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AccountEventMessage {
    ConfirmationRequested(ConfirmationRequestedMessage),
}

/// Serializable message for the ConfirmationRequested domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationRequestedMessage {
    pub event_id: String,
    pub account_id: String,
    pub email: String,
    pub confirmation_url: String,
    pub requested_at: DateTime<Utc>,
}

impl From<&ConfirmationRequestedEvent> for ConfirmationRequestedMessage {
    fn from(event: &ConfirmationRequestedEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            account_id: event.account_id.clone(),
            email: event.email.clone(),
            confirmation_url: event.confirmation_url.clone(),
            requested_at: event.requested_at,
        }
    }
}

impl From<&ConfirmationRequestedEvent> for AccountEventMessage {
    fn from(event: &ConfirmationRequestedEvent) -> Self {
        AccountEventMessage::ConfirmationRequested(event.into())
    }
}
