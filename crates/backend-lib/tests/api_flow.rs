// ============================
// sabha-backend-lib/tests/api_flow.rs
// ============================
//! End-to-end API flow over the assembled router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sabha_backend_lib::config::Settings;
use sabha_backend_lib::storage::FlatFileStorage;
use sabha_backend_lib::{ws_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
    let state = Arc::new(AppState::new(storage, &Settings::default()));
    (ws_router::create_router(state), temp_dir)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn merchant_sign_up() -> Value {
    json!({
        "email": "clinic@example.com",
        "password": "hunter22",
        "userType": "merchant",
        "fullname": "Asha Rao",
        "mobilenumber": "9999999999",
        "gender": "female",
        "language": "en-IN",
    })
}

#[tokio::test]
async fn test_sign_up_profile_and_booking_flow() {
    let (app, _tmp) = app();

    // merchant registers
    let (status, body) = send_json(&app, "POST", "/sign-up", None, merchant_sign_up()).await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["token"].as_str().unwrap().to_string();

    // fills in the business profile
    let (status, body) = send_json(
        &app,
        "PUT",
        "/update-user-data",
        Some(&token),
        json!({
            "businessName": "Rao Clinic",
            "services": "Dentistry,Implants",
            "availableHours": ["9:00", "9:30"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["businessName"], "Rao Clinic");
    let merchant_id = body["id"].as_str().unwrap().to_string();

    // the public directory lists the merchant, without the password hash
    let (status, body) = get(&app, "/fetch-list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["businessName"], "Rao Clinic");
    assert!(body["users"][0].get("passwordHash").is_none());

    // a visitor checks the hours and books
    let (status, body) = send_json(
        &app,
        "POST",
        "/fetch-available-time",
        None,
        json!({ "id": merchant_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availableHours"][0], "9:00");

    let (status, body) = send_json(
        &app,
        "POST",
        "/book-appointment",
        None,
        json!({
            "id": merchant_id,
            "FormData": {
                "dateandtime": "Selected Date: 11/4/2024,Selected Time: 9:00 AM",
                "FirstName": "Ravi",
                "LastName": "Kumar",
                "MobilePn": "8888888888",
                "Email": "ravi@example.com",
                "DiscusseAbt": "tooth",
            },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"][0]["appointmentTime"], "9:00 AM");

    // the merchant sees the booking in their own document
    let (status, body) = get(&app, "/fetch-user-data", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointments"][0]["firstname"], "Ravi");
}

#[tokio::test]
async fn test_sign_in_and_forms_flow() {
    let (app, _tmp) = app();

    let (status, _) = send_json(&app, "POST", "/sign-up", None, merchant_sign_up()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/sign-in",
        None,
        json!({ "email": "clinic@example.com", "password": "hunter22" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userType"], "merchant");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        "POST",
        "/save-manually-created-form",
        Some(&token),
        json!({
            "formName": "Intake",
            "formDescription": "New patient intake",
            "formData": [{"label": "Name", "type": "text"}],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let merchant_id = body["id"].as_str().unwrap().to_string();
    let form_id = body["manualForms"][0]["formID"].as_str().unwrap().to_string();

    // an anonymous visitor fetches and fills the form
    let (status, body) = send_json(
        &app,
        "POST",
        "/fetch-manual-forms",
        None,
        json!({ "id": merchant_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["formName"], "Intake");

    let (status, _) = send_json(
        &app,
        "POST",
        "/save-filled-manual-form",
        None,
        json!({ "id": merchant_id, "formID": form_id, "formData": {"Name": "Ravi"} }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app,
        "POST",
        "/fetch-manual-forms-filled",
        None,
        json!({ "findid": merchant_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formresponses"][0]["formData"]["Name"], "Ravi");
}

#[tokio::test]
async fn test_bad_credentials_and_unknown_ids() {
    let (app, _tmp) = app();

    let (status, _) = send_json(
        &app,
        "POST",
        "/sign-in",
        None,
        json!({ "email": "nobody@example.com", "password": "whatever1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "POST",
        "/fetch-available-time",
        None,
        json!({ "id": "missing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "POST",
        "/fetch-manual-forms-filled",
        None,
        json!({ "findid": "missing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
