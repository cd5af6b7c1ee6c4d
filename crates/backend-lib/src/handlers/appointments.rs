// ============================
// sabha-backend-lib/src/handlers/appointments.rs
// ============================
//! Appointment booking.
use std::sync::Arc;

use axum::{extract::State, Json};
use metrics::counter;
use rand::{distributions::Alphanumeric, Rng};
use sabha_common::{Appointment, UserRecord};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::error::AppError;
use crate::metrics::APPOINTMENT_BOOKED;
use crate::storage::Storage;
use crate::AppState;

/// Booking payload as the public booking widget posts it. Field names are
/// wire-compatible with the deployed form.
#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    /// Merchant id being booked
    pub id: String,
    #[serde(rename = "FormData")]
    pub form_data: BookingForm,
}

#[derive(Debug, Deserialize)]
pub struct BookingForm {
    /// `"Selected Date: <date>,Selected Time: <time>"`
    pub dateandtime: String,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "MobilePn")]
    pub mobile: String,
    #[serde(rename = "CompanyName", default)]
    pub company: Option<String>,
    #[serde(rename = "websiteUrl", default)]
    pub website: Option<String>,
    #[serde(rename = "DiscusseAbt", default)]
    pub discussion: Option<String>,
    #[serde(rename = "Email")]
    pub email: String,
}

fn parse_date_and_time(raw: &str) -> Result<(String, String), AppError> {
    let (date_part, time_part) = raw
        .split_once(',')
        .ok_or_else(|| AppError::InvalidInput(format!("malformed dateandtime: {raw}")))?;
    let date = date_part
        .split_once(": ")
        .map(|(_, d)| d.to_string())
        .ok_or_else(|| AppError::InvalidInput(format!("malformed date: {date_part}")))?;
    let time = time_part
        .trim()
        .split_once(": ")
        .map(|(_, t)| t.to_string())
        .ok_or_else(|| AppError::InvalidInput(format!("malformed time: {time_part}")))?;
    Ok((date, time))
}

fn random_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}

/// Handles `POST /book-appointment`: records the booking on the merchant and opens an
/// account for the visitor.
///
/// The merchant's copy carries the full booking details; the visitor's
/// account (created here with a generated password, or reused when the email
/// is already registered) only holds an `{appointmentID, merchantId}` stub.
/// A confirmation with the generated password goes out through the mailer;
/// mail failure does not void the booking.
pub async fn book_appointment<S: Storage + Send + Sync + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let mut merchant = state.storage.load_user(&req.id).await?;
    let form = req.form_data;
    let (date, time) = parse_date_and_time(&form.dateandtime)?;
    let appointment_id = Uuid::new_v4().to_string();

    merchant.appointments.push(Appointment {
        appointment_id: appointment_id.clone(),
        merchant_id: None,
        appointment_date: Some(date),
        appointment_time: Some(time),
        firstname: Some(form.first_name.clone()),
        lastname: Some(form.last_name.clone()),
        mobile: Some(form.mobile.clone()),
        company: form.company,
        website: form.website,
        discussion: form.discussion,
        email: Some(form.email.clone()),
    });
    state.storage.save_user(&merchant).await?;

    let stub = Appointment {
        appointment_id: appointment_id.clone(),
        merchant_id: Some(req.id.clone()),
        ..Appointment::default()
    };

    match state.storage.find_by_email(&form.email).await? {
        Some(mut existing) => {
            existing.appointments.push(stub);
            state.storage.save_user(&existing).await?;
        },
        None => {
            let password = random_password();
            let mut visitor = UserRecord::new(
                form.email.clone(),
                hash_password(&password).map_err(|e| AppError::Internal(e.to_string()))?,
                "user".to_string(),
                format!("{} {}", form.first_name, form.last_name),
                form.mobile.clone(),
                "male".to_string(),
                "en-IN".to_string(),
            );
            visitor.appointments.push(stub);
            state.storage.create_user(&visitor).await?;

            let business_name = merchant.profile.business_name.as_deref().unwrap_or("");
            if let Err(e) = state
                .mailer
                .send_booking_confirmation(
                    &form.email,
                    &form.first_name,
                    &form.dateandtime,
                    business_name,
                    &password,
                )
                .await
            {
                warn!(to = form.email, error = %e, "booking confirmation mail failed");
            }
        },
    }

    counter!(APPOINTMENT_BOOKED).increment(1);
    info!(merchant_id = req.id, appointment_id, "appointment booked");
    Ok(Json(json!({ "appointment": merchant.appointments })))
}
