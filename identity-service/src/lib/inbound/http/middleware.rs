use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::account::models::EmailAddress;
use crate::domain::session::models::SessionId;
use crate::domain::session::ports::SessionManagerPort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type holding the caller resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub email: EmailAddress,
    pub session_id: SessionId,
}

/// Middleware that validates the bearer token and its session, then adds the
/// caller to request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let validation = state
        .session_manager
        .validate_access_token(token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Access token rejected");
            ApiError::from(e).into_response()
        })?;

    let email = EmailAddress::new(validation.email).map_err(|e| {
        tracing::error!(error = %e, "Token carries an unparseable email");
        ApiError::Unauthorized("Invalid token format".to_string()).into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedAccount {
        email,
        session_id: validation.session_id,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let unauthorized = |message: &str| ApiError::Unauthorized(message.to_string()).into_response();

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}
