// ============================
// sabha-backend-lib/src/handlers/profile.rs
// ============================
//! Business-profile upsert and user-data reads.
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use sabha_common::BusinessProfile;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::auth::Claims;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// Body of `PUT /update-user-data`. `emailId` is the business contact email
/// (historical field name kept for the deployed clients).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserDataRequest {
    pub business_name: Option<String>,
    #[serde(rename = "businessURL")]
    pub business_url: Option<String>,
    pub profile_photo: Option<String>,
    pub business_logo: Option<String>,
    pub contact_person: Option<String>,
    pub designation: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<String>,
    pub email_id: Option<String>,
    pub youtube_video_link: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    /// Comma-separated on the wire
    pub services: Option<String>,
    pub professional_memberships: Option<String>,
    pub awards_and_achievements: Option<String>,
    pub keywords: Option<String>,
    pub files: Option<Value>,
    pub company_description: Option<String>,
    pub available_hours: Option<Value>,
    pub available_days: Option<Value>,
}

fn split_csv(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(',').map(|p| p.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Handles `PUT /update-user-data`, replacing the caller's business profile wholesale.
pub async fn update_user_data<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateUserDataRequest>,
) -> Result<Json<Value>, AppError> {
    let mut user = state.storage.load_user(&claims.sub).await?;

    user.profile = BusinessProfile {
        business_name: req.business_name,
        business_url: req.business_url,
        profile_photo: req.profile_photo,
        business_logo: req.business_logo,
        contact_person: req.contact_person,
        designation: req.designation,
        qualification: req.qualification,
        specialization: req.specialization,
        experience_years: req.experience_years,
        business_email: req.email_id,
        youtube_video_link: req.youtube_video_link,
        contact_number: req.contact_number,
        address: req.address,
        city: req.city,
        state: req.state,
        district: req.district,
        pin_code: req.pin_code,
        services: split_csv(req.services),
        professional_memberships: split_csv(req.professional_memberships),
        awards_and_achievements: split_csv(req.awards_and_achievements),
        keywords: req.keywords,
        files: req.files,
        company_description: req.company_description,
        available_hours: req.available_hours,
        available_days: req.available_days,
    };
    state.storage.save_user(&user).await?;

    Ok(Json(user.public_json()))
}

/// Handles `GET /fetch-user-data`: the caller's document.
///
/// End users only hold `{appointmentID, merchantId}` stubs; those are joined
/// against each merchant's copy into a `merchantAppointments` list. Stubs
/// whose merchant no longer resolves are skipped rather than failing the
/// whole read.
pub async fn fetch_user_data<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>, AppError> {
    let user = state.storage.load_user(&claims.sub).await?;
    let mut body = user.public_json();

    if user.user_type == "user" {
        let mut merchant_appointments = Vec::new();
        for stub in &user.appointments {
            let Some(merchant_id) = &stub.merchant_id else {
                continue;
            };
            let merchant = match state.storage.load_user(merchant_id).await {
                Ok(m) => m,
                Err(e) => {
                    warn!(merchant_id, error = %e, "skipping unresolvable appointment stub");
                    continue;
                },
            };
            let Some(booked) = merchant
                .appointments
                .iter()
                .find(|a| a.appointment_id == stub.appointment_id)
            else {
                continue;
            };
            merchant_appointments.push(json!({
                "appointmentID": stub.appointment_id,
                "merchantName": merchant.profile.business_name,
                "merchantEmail": merchant.email,
                "merchantMobile": merchant.mobilenumber,
                "discussion": booked.discussion,
                "appointmentDate": booked.appointment_date,
                "appointmentTime": booked.appointment_time,
            }));
        }
        if let Some(obj) = body.as_object_mut() {
            obj.insert(
                "merchantAppointments".to_string(),
                Value::Array(merchant_appointments),
            );
        }
    }

    Ok(Json(body))
}

/// Handles `GET /fetch-list`: the public directory, legacy type-`"1"` accounts
/// followed by all merchants.
pub async fn fetch_list<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Value>, AppError> {
    let mut users = state.storage.list_by_type("1").await?;
    users.extend(state.storage.list_by_type("merchant").await?);
    let users: Vec<Value> = users.iter().map(|u| u.public_json()).collect();
    Ok(Json(json!({ "users": users })))
}

#[derive(Debug, Deserialize)]
pub struct UserIdRequest {
    pub id: String,
}

/// Handles `POST /fetch-available-time`: a merchant's bookable hours.
pub async fn fetch_available_time<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UserIdRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state.storage.load_user(&req.id).await?;
    Ok(Json(json!({ "availableHours": user.profile.available_hours })))
}
