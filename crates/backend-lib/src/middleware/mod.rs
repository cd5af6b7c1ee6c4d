// ============================
// sabha-backend-lib/src/middleware/mod.rs
// ============================
//! Middleware for the Sabha API server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// Bearer-token guard for the protected API surface.
///
/// Verifies the `Authorization: Bearer <jwt>` header and stashes the decoded
/// claims as a request extension for downstream handlers.
pub async fn require_auth<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Auth("Missing bearer token".to_string()))?;

    let claims = state.tokens.verify(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
