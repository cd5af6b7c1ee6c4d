// ============================
// sabha-backend-lib/src/ws_router.rs
// ============================
//! Router assembly and WebSocket connection handling.
use crate::handlers::{accounts, appointments, forms, profile, uploads};
use crate::live::{ConnId, LiveHandler};
use crate::metrics::{WS_ACTIVE, WS_CONNECTION, WS_DISCONNECTION};
use crate::middleware::require_auth;
use crate::storage::Storage;
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use sabha_common::{ClientEvent, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;
use uuid::Uuid;

/// Assemble the full application router: public API, token-guarded API,
/// stored-file serving, and the live WebSocket endpoint.
pub fn create_router<S: Storage + Send + Sync + Clone + 'static>(
    state: Arc<AppState<S>>,
) -> Router {
    let protected = Router::new()
        .route("/update-user-data", put(profile::update_user_data::<S>))
        .route("/fetch-user-data", get(profile::fetch_user_data::<S>))
        .route(
            "/save-manually-created-form",
            post(forms::save_manually_created_form::<S>),
        )
        .route("/add-generated-forms", post(forms::add_generated_forms::<S>))
        .route("/upload-profile-photo", post(uploads::upload_profile_photo::<S>))
        .route("/upload-business-logo", post(uploads::upload_business_logo::<S>))
        .route("/upload-files", post(uploads::upload_files::<S>))
        // route_layer keeps the guard off the fallback, so unknown paths
        // still answer 404 after the merge
        .route_layer(from_fn_with_state(state.clone(), require_auth::<S>));

    Router::new()
        .route("/sign-up", post(accounts::sign_up::<S>))
        .route("/sign-in", post(accounts::sign_in::<S>))
        .route("/fetch-list", get(profile::fetch_list::<S>))
        .route("/fetch-available-time", post(profile::fetch_available_time::<S>))
        .route("/book-appointment", post(appointments::book_appointment::<S>))
        .route("/save-filled-manual-form", post(forms::save_filled_manual_form::<S>))
        .route("/save-filled-ai-form", post(forms::save_filled_ai_form::<S>))
        .route("/fetch-manual-forms", post(forms::fetch_manual_forms::<S>))
        .route("/fetch-ai-forms", post(forms::fetch_ai_forms::<S>))
        .route(
            "/fetch-manual-forms-filled",
            post(forms::fetch_manual_forms_filled::<S>),
        )
        .route("/fetch-ai-forms-filled", post(forms::fetch_ai_forms_filled::<S>))
        .route(
            "/users/{user_id}/profilePhoto/{filename}",
            get(uploads::serve_profile_photo::<S>),
        )
        .route(
            "/users/{user_id}/businessLogo/{filename}",
            get(uploads::serve_business_logo::<S>),
        )
        .route("/file/{*path}", get(uploads::serve_file::<S>))
        .route("/ws", get(ws_handler::<S>))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for WebSocket connections
pub async fn ws_handler<S: Storage + Send + Sync + Clone + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    counter!(WS_CONNECTION).increment(1);
    gauge!(WS_ACTIVE).increment(1.0);

    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection<S: Storage + Send + Sync + Clone + 'static>(
    socket: WebSocket,
    state: Arc<AppState<S>>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let conn: ConnId = Uuid::new_v4();

    // Outbound channel: everything addressed to this connection flows through
    // the broadcaster into here.
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(32);
    state.rooms.attach(conn, event_tx);
    let handler = LiveHandler::new(state.clone(), conn);

    let send_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let Ok(json) = serde_json::to_string(&event) else {
                continue;
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = ws_rx.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => handler.handle_event(event).await,
                Err(e) => {
                    debug!(%conn, error = %e, "dropping malformed live event");
                    state
                        .rooms
                        .send_to(
                            conn,
                            ServerEvent::Error {
                                code: "MALFORMED_EVENT".to_string(),
                                message: e.to_string(),
                            },
                        )
                        .await;
                },
            },
            Message::Close(_) => break,
            // pings are answered by axum, binary frames are not part of the protocol
            _ => {},
        }
    }

    handler.disconnect();
    counter!(WS_DISCONNECTION).increment(1);
    gauge!(WS_ACTIVE).decrement(1.0);
    send_task.abort();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::storage::FlatFileStorage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
        let state = Arc::new(AppState::new(storage, &Settings::default()));
        (create_router(state), temp_dir)
    }

    #[tokio::test]
    async fn test_public_routes_do_not_require_a_token() {
        let (app, _tmp) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/fetch-list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_token() {
        let (app, _tmp) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/fetch-user-data")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _tmp) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/definitely-not-a-route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
