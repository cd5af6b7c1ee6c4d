// ============================
// sabha-backend-lib/src/handlers/uploads.rs
// ============================
//! Multipart uploads and stored-file serving.
//!
//! Files live under `<data_dir>/uploads/<email>/<kind>/<filename>`. The
//! serving handlers take the upload owner's email as the `userId` path
//! segment, matching the paths handed out by the upload endpoints.
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    Json,
};
use serde_json::{json, Value};
use tokio::fs as tokio_fs;
use tracing::info;
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::storage::Storage;
use crate::validation::validate_file_name;
use crate::AppState;
use axum::Extension;

const MAX_FILES_PER_UPLOAD: usize = 10;

/// Pull the next file-bearing field with the given name out of the multipart
/// stream and write it under the user's `kind` directory. Returns the
/// client-facing relative path.
async fn store_field_file<S: Storage + Send + Sync>(
    state: &AppState<S>,
    email: &str,
    kind: &str,
    field_name: &str,
    multipart: &mut Multipart,
) -> Result<Option<String>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(file_name) = field.file_name().map(ToString::to_string) else {
            continue;
        };
        validate_file_name(&file_name).map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let dir = state.storage.upload_dir(email, kind);
        tokio_fs::create_dir_all(&dir).await?;
        let data = field.bytes().await?;
        tokio_fs::write(dir.join(&file_name), &data).await?;

        return Ok(Some(format!("users/{email}/{kind}/{file_name}")));
    }
    Ok(None)
}

/// Handles `POST /upload-profile-photo`: a single `profilePhoto` multipart field.
pub async fn upload_profile_photo<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let path = store_field_file(&state, &claims.email, "profilePhoto", "profilePhoto", &mut multipart)
        .await?
        .ok_or_else(|| AppError::InvalidInput("File is required".to_string()))?;
    Ok(Json(json!({ "filePath": path })))
}

/// Handles `POST /upload-business-logo`: a single `businessLogo` multipart field.
pub async fn upload_business_logo<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let path = store_field_file(&state, &claims.email, "businessLogo", "businessLogo", &mut multipart)
        .await?
        .ok_or_else(|| AppError::InvalidInput("File is required".to_string()))?;
    Ok(Json(json!({ "filePath": path })))
}

/// Handles `POST /upload-files`: up to ten `files` fields. Stores the documents and
/// stamps a fresh collection name on the account (the handle a downstream
/// document-index service is keyed by).
pub async fn upload_files<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut paths = Vec::new();
    while let Some(path) =
        store_field_file(&state, &claims.email, "files", "files", &mut multipart).await?
    {
        paths.push(path);
        if paths.len() == MAX_FILES_PER_UPLOAD {
            break;
        }
    }
    if paths.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one file is required.".to_string(),
        ));
    }

    let mut user = state.storage.load_user(&claims.sub).await?;
    let collection_name = format!("{}_{}", user.email, Uuid::new_v4());
    user.collection_name = Some(collection_name.clone());
    state.storage.save_user(&user).await?;
    info!(user_id = user.id, collection_name, files = paths.len(), "documents uploaded");

    Ok(Json(json!({ "filePaths": paths })))
}

fn content_type_for(file_name: &str) -> &'static str {
    match PathBuf::from(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn serve_stored(
    path: PathBuf,
    file_name: &str,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>), AppError> {
    if !path.is_file() {
        return Err(AppError::NotFound("File not found.".to_string()));
    }
    let data = tokio_fs::read(&path).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(file_name))], data))
}

/// `GET /users/{userId}/profilePhoto/{filename}`
pub async fn serve_profile_photo<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((user_id, filename)): Path<(String, String)>,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>), AppError> {
    serve_kind(&state, &user_id, "profilePhoto", &filename).await
}

/// `GET /users/{userId}/businessLogo/{filename}`
pub async fn serve_business_logo<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((user_id, filename)): Path<(String, String)>,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>), AppError> {
    serve_kind(&state, &user_id, "businessLogo", &filename).await
}

async fn serve_kind<S: Storage + Send + Sync>(
    state: &AppState<S>,
    user_id: &str,
    kind: &str,
    filename: &str,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>), AppError> {
    validate_file_name(user_id).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    validate_file_name(filename).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    serve_stored(state.storage.upload_dir(user_id, kind).join(filename), filename).await
}

/// Handles `GET /file/{*path}`: static access to the uploads tree.
pub async fn serve_file<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(path): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>), AppError> {
    let mut full = state.storage.uploads_root();
    for segment in path.split('/') {
        validate_file_name(segment).map_err(|e| AppError::InvalidInput(e.to_string()))?;
        full.push(segment);
    }
    serve_stored(full, &path).await
}
