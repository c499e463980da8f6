use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::domain::account::models::EmailAddress;
use crate::domain::session::ports::SessionManagerPort;
use crate::inbound::http::router::AppState;

/// Target of the link carried by confirmation emails.
pub async fn confirm_account(
    State(state): State<AppState>,
    Query(query): Query<ConfirmAccountQuery>,
) -> Result<ApiSuccess<ConfirmAccountResponseData>, ApiError> {
    let email = EmailAddress::new(query.email).map_err(AccountError::from)?;

    state
        .session_manager
        .confirm_account(&email)
        .await
        .map_err(ApiError::from)
        .map(|account| {
            ApiSuccess::new(
                StatusCode::OK,
                ConfirmAccountResponseData {
                    email: account.email.to_string(),
                    confirmed: account.is_confirmed,
                },
            )
        })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmAccountQuery {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmAccountResponseData {
    pub email: String,
    pub confirmed: bool,
}
