//! Request authentication middleware.
//!
//! Accepts `Bearer <jwt>` backed by a live session, or `Basic` credentials.
//! The resolved `Principal` and the `Authenticated` record are placed in the
//! request extensions for handlers to extract.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::api::AppState;
use crate::config::{BASIC_AUTH_PREFIX, BEARER_TOKEN_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::services::Authenticated;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    let authenticated = authenticate(&state, &auth_header).await?;
    tracing::debug!(user_id = %authenticated.principal.user_id, "Request authenticated");

    request.extensions_mut().insert(authenticated.principal);
    request.extensions_mut().insert(authenticated);

    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, header: &str) -> AppResult<Authenticated> {
    let auth = state.services.auth();

    if let Some(token) = header.strip_prefix(BEARER_TOKEN_PREFIX) {
        return auth.authenticate_bearer(token.trim()).await;
    }

    let encoded = header
        .strip_prefix(BASIC_AUTH_PREFIX)
        .ok_or(AppError::Unauthorized)?;
    let (email, password) = basic_credentials(encoded).ok_or(AppError::Unauthorized)?;
    auth.authenticate_basic(&email, &password).await
}

/// `email:password` from a Basic auth payload.
fn basic_credentials(encoded: &str) -> Option<(String, String)> {
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (email, password) = text.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}
