use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::confirm_account::confirm_account;
use super::handlers::current_account::current_account;
use super::handlers::refresh_session::refresh_session;
use super::handlers::register_account::register_account;
use super::handlers::sign_in::sign_in;
use super::handlers::validate_token::validate_token;
use super::middleware::authenticate as auth_middleware;
use crate::domain::session::ports::SessionManagerPort;

#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<dyn SessionManagerPort>,
}

pub fn create_router(session_manager: Arc<dyn SessionManagerPort>) -> Router {
    let state = AppState { session_manager };

    let public_routes = Router::new()
        .route("/api/accounts", post(register_account))
        .route("/api/accounts/confirm", get(confirm_account))
        .route("/api/auth/signin", post(sign_in))
        .route("/api/auth/validate", post(validate_token))
        .route("/api/auth/refresh", post(refresh_session));

    let protected_routes = Router::new()
        .route("/api/accounts/me", get(current_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
