// ============================
// sabha-backend-lib/src/handlers/accounts.rs
// ============================
//! Account sign-up and sign-in.
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use metrics::counter;
use sabha_common::UserRecord;
use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::metrics::USER_SIGNED_UP;
use crate::storage::Storage;
use crate::validation::{validate_email, validate_password, validate_user_type};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub user_type: String,
    pub fullname: String,
    pub mobilenumber: String,
    pub gender: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Token response shared by both endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_type: String,
}

/// Handles `POST /sign-up`: creates an account and hands back a fresh token.
pub async fn sign_up<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_email(&req.email).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    validate_password(&req.password).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    validate_user_type(&req.user_type).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let password_hash = hash_password(&req.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let user = UserRecord::new(
        req.email,
        password_hash,
        req.user_type.clone(),
        req.fullname,
        req.mobilenumber,
        req.gender,
        req.language,
    );
    state.storage.create_user(&user).await?;
    // per-user upload tree is created eagerly, like the legacy data folders
    tokio_fs::create_dir_all(state.storage.upload_dir(&user.email, "files")).await?;

    let token = state.tokens.issue(&user.id, &user.email)?;
    counter!(USER_SIGNED_UP).increment(1);
    info!(user_id = user.id, user_type = req.user_type, "account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_type: req.user_type,
        }),
    ))
}

/// Handles `POST /sign-in`: verifies credentials and issues a token.
///
/// Failed attempts feed the per-email lockout; a locked account answers 429
/// without touching the stored hash.
pub async fn sign_in<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if !state.sign_in_limiter.check(&req.email) {
        return Err(AppError::SignInRateLimited);
    }

    let Some(user) = state.storage.find_by_email(&req.email).await? else {
        state.sign_in_limiter.record_failure(&req.email);
        return Err(AppError::InvalidCredentials);
    };
    if !verify_password(&user.password_hash, &req.password) {
        state.sign_in_limiter.record_failure(&req.email);
        return Err(AppError::InvalidCredentials);
    }
    state.sign_in_limiter.record_success(&req.email);

    let token = state.tokens.issue(&user.id, &user.email)?;
    Ok(Json(AuthResponse {
        token,
        user_type: user.user_type,
    }))
}
