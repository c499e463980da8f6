use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::sign_in::TokenPairResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionManagerPort;
use crate::inbound::http::router::AppState;

pub async fn refresh_session(
    State(state): State<AppState>,
    Json(body): Json<RefreshSessionRequestBody>,
) -> Result<ApiSuccess<TokenPairResponseData>, ApiError> {
    state
        .session_manager
        .refresh(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|sign_in| ApiSuccess::new(StatusCode::OK, sign_in.into()))
}

#[derive(Clone, Deserialize)]
pub struct RefreshSessionRequestBody {
    refresh_token: String,
}
