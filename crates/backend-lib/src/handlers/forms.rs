// ============================
// sabha-backend-lib/src/handlers/forms.rs
// ============================
//! Dynamic form templates and responses.
//!
//! Merchants author templates (manually or AI-generated); anyone holding a
//! merchant id can fetch the templates and submit a filled copy, so the
//! submission endpoints are unauthenticated.
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use sabha_common::{FilledForm, FormTemplate};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

use super::profile::UserIdRequest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFormRequest {
    pub form_name: String,
    #[serde(default)]
    pub form_description: Option<String>,
    pub form_data: Value,
}

/// Handles `POST /save-manually-created-form`: appends a template to the caller's
/// `manualForms`, minting its id.
pub async fn save_manually_created_form<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SaveFormRequest>,
) -> Result<Json<Value>, AppError> {
    let mut user = state.storage.load_user(&claims.sub).await?;
    user.manual_forms.push(FormTemplate {
        form_id: Uuid::new_v4().to_string(),
        form_name: req.form_name,
        form_description: req.form_description,
        form_data: req.form_data,
    });
    state.storage.save_user(&user).await?;
    Ok(Json(user.public_json()))
}

#[derive(Debug, Deserialize)]
pub struct AddGeneratedFormsRequest {
    pub aiform: Vec<Value>,
}

/// Handles `POST /add-generated-forms`, replacing the caller's `autoForms` wholesale.
pub async fn add_generated_forms<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddGeneratedFormsRequest>,
) -> Result<Json<Value>, AppError> {
    let mut user = state.storage.load_user(&claims.sub).await?;
    user.auto_forms = req.aiform;
    state.storage.save_user(&user).await?;
    Ok(Json(user.public_json()))
}

/// Body of the filled-form submission endpoints: the owning merchant's id
/// plus the response payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledFormRequest {
    pub id: String,
    #[serde(rename = "formID")]
    pub form_id: String,
    pub form_data: Value,
}

async fn append_filled<S: Storage + Send + Sync>(
    state: &AppState<S>,
    req: FilledFormRequest,
    ai: bool,
) -> Result<Json<Value>, AppError> {
    let mut user = state.storage.load_user(&req.id).await?;
    let filled = FilledForm {
        form_id: req.form_id,
        form_data: req.form_data,
    };
    if ai {
        user.auto_forms_filled.push(filled);
    } else {
        user.manual_forms_filled.push(filled);
    }
    state.storage.save_user(&user).await?;
    Ok(Json(user.public_json()))
}

/// `POST /save-filled-manual-form`
pub async fn save_filled_manual_form<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<FilledFormRequest>,
) -> Result<Json<Value>, AppError> {
    append_filled(&state, req, false).await
}

/// `POST /save-filled-ai-form`
pub async fn save_filled_ai_form<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<FilledFormRequest>,
) -> Result<Json<Value>, AppError> {
    append_filled(&state, req, true).await
}

/// Handles `POST /fetch-manual-forms`: a merchant's manual templates.
pub async fn fetch_manual_forms<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UserIdRequest>,
) -> Result<Json<Vec<FormTemplate>>, AppError> {
    let user = state.storage.load_user(&req.id).await?;
    Ok(Json(user.manual_forms))
}

/// Handles `POST /fetch-ai-forms`: a merchant's generated templates.
pub async fn fetch_ai_forms<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UserIdRequest>,
) -> Result<Json<Vec<Value>>, AppError> {
    let user = state.storage.load_user(&req.id).await?;
    Ok(Json(user.auto_forms))
}

#[derive(Debug, Deserialize)]
pub struct FindIdRequest {
    pub findid: String,
}

/// Handles `POST /fetch-manual-forms-filled`: templates plus responses.
pub async fn fetch_manual_forms_filled<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<FindIdRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state.storage.load_user(&req.findid).await?;
    Ok(Json(json!({
        "manualform": user.manual_forms,
        "formresponses": user.manual_forms_filled,
    })))
}

/// Handles `POST /fetch-ai-forms-filled`: generated templates plus responses.
pub async fn fetch_ai_forms_filled<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<FindIdRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state.storage.load_user(&req.findid).await?;
    Ok(Json(json!({
        "autoForms": user.auto_forms,
        "formresponses": user.auto_forms_filled,
    })))
}
