// ============================
// sabha-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the Sabha appointment-platform server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod live;
pub mod mailer;
pub mod metrics;
pub mod middleware;
pub mod storage;
pub mod validation;
pub mod ws_router;

use std::sync::Arc;

use crate::auth::{SignInRateLimiter, TokenKeys};
use crate::config::Settings;
use crate::live::{
    ConnectionDirectory, InMemorySpeakerQueue, InProcessSessionControl, RoomBroadcaster,
    SessionControl, SpeakerQueue,
};
use crate::mailer::{LogMailer, Mailer};

/// Application state shared across all handlers.
///
/// Owns the live-session context (connection directory and room broadcaster)
/// explicitly, so its lifecycle is tied to the server instance and both can be
/// exercised in isolation from any transport.
#[derive(Clone)]
pub struct AppState<S> {
    /// Settings manager
    pub settings: Arc<Settings>,
    /// Storage backend for user documents
    pub storage: S,
    /// JWT signing/verification keys
    pub tokens: Arc<TokenKeys>,
    /// Failed sign-in tracking
    pub sign_in_limiter: Arc<SignInRateLimiter>,
    /// Logical user id -> live connection handle
    pub directory: Arc<ConnectionDirectory>,
    /// Room membership and event delivery
    pub rooms: Arc<RoomBroadcaster>,
    /// Speaker-queue lookup collaborator
    pub speaker_queue: Arc<dyn SpeakerQueue>,
    /// Session-status computation collaborator
    pub session_control: Arc<dyn SessionControl>,
    /// Outbound mail collaborator
    pub mailer: Arc<dyn Mailer>,
}

impl<S> AppState<S> {
    /// Create a new application state with the default collaborators.
    pub fn new(storage: S, settings: &Settings) -> Self {
        Self {
            settings: Arc::new(settings.clone()),
            storage,
            tokens: Arc::new(TokenKeys::new(
                &settings.auth.jwt_secret,
                settings.auth.token_ttl_secs,
            )),
            sign_in_limiter: Arc::new(SignInRateLimiter::new(
                settings.auth.max_sign_in_attempts,
                std::time::Duration::from_secs(settings.auth.lockout_secs),
            )),
            directory: Arc::new(ConnectionDirectory::new()),
            rooms: Arc::new(RoomBroadcaster::new()),
            speaker_queue: Arc::new(InMemorySpeakerQueue::new()),
            session_control: Arc::new(InProcessSessionControl::new()),
            mailer: Arc::new(LogMailer),
        }
    }

    /// Replace the live-session collaborators (used by tests and deployments
    /// that wire in real queue/session services).
    pub fn with_live_services(
        mut self,
        speaker_queue: Arc<dyn SpeakerQueue>,
        session_control: Arc<dyn SessionControl>,
    ) -> Self {
        self.speaker_queue = speaker_queue;
        self.session_control = session_control;
        self
    }

    /// Replace the mailer collaborator.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}
