use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Password;
use crate::domain::session::models::Credentials;
use crate::domain::session::models::SignIn;
use crate::domain::session::ports::SessionManagerPort;
use crate::inbound::http::router::AppState;
use crate::session::errors::SessionError;

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequestBody>,
) -> Result<ApiSuccess<TokenPairResponseData>, ApiError> {
    // Malformed input gets the same answer as a wrong password.
    let credentials = body
        .try_into_credentials()
        .ok_or(SessionError::InvalidCredentials)?;

    state
        .session_manager
        .authenticate(credentials)
        .await
        .map_err(ApiError::from)
        .map(|sign_in| ApiSuccess::new(StatusCode::OK, sign_in.into()))
}

#[derive(Clone, Deserialize)]
pub struct SignInRequestBody {
    email: String,
    password: String,
}

impl SignInRequestBody {
    fn try_into_credentials(self) -> Option<Credentials> {
        let email = EmailAddress::new(self.email).ok()?;
        let password = Password::new(self.password).ok()?;
        Some(Credentials::new(email, password))
    }
}

/// Token pair returned by sign-in and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPairResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl From<SignIn> for TokenPairResponseData {
    fn from(sign_in: SignIn) -> Self {
        Self {
            access_token: sign_in.access_token,
            refresh_token: sign_in.refresh_token,
            token_type: "Bearer".to_string(),
        }
    }
}
