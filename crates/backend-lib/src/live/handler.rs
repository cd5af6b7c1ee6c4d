// ============================
// sabha-backend-lib/src/live/handler.rs
// ============================
//! Per-connection live event handler.
//!
//! One handler is instantiated per WebSocket connection and drives the whole
//! live protocol: room join, targeted chat relay, the speak-request round
//! trip, and the session-status relay. Addressing misses are dropped
//! silently (best-effort presence semantics); collaborator failures are
//! caught per event and reported back to the originating connection so one
//! bad external call never takes a connection down.

use crate::metrics::{
    CHAT_RELAYED, ROOM_JOINED, SESSION_STATUS_CHANGED, SPEAK_ACCEPTED, SPEAK_REJECTIONS,
    SPEAK_REQUESTED,
};
use crate::storage::Storage;
use crate::AppState;
use metrics::counter;
use sabha_common::{
    ChatMessage, ClientEvent, ServerEvent, SessionStatusParams, SpeakRequest, SpeakResponse,
    SPEAK_REJECTED,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::ConnId;

/// Live event handler for one connection
pub struct LiveHandler<S> {
    state: Arc<AppState<S>>,
    conn: ConnId,
}

impl<S: Storage + Send + Sync + Clone + 'static> LiveHandler<S> {
    pub fn new(state: Arc<AppState<S>>, conn: ConnId) -> Self {
        Self { state, conn }
    }

    /// Process one inbound event to completion.
    pub async fn handle_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom(user_id) => self.join_room(user_id),
            ClientEvent::SendMessage(msg) => self.relay_chat(msg).await,
            ClientEvent::SendSpeakRequest(req) => self.speak_request(req).await,
            ClientEvent::SpeakRequestResponse(resp) => self.speak_response(resp).await,
            ClientEvent::ChangeSessionStatus(params) => self.change_session_status(params).await,
        }
    }

    /// Disconnect cleanup: one directory mutation, nothing else. Any pending
    /// targeted sends to this handle drop silently.
    pub fn disconnect(&self) {
        if let Some(user_id) = self.state.directory.unregister(self.conn) {
            info!(user_id, "live connection unregistered");
        }
        self.state.rooms.detach(self.conn);
    }

    fn join_room(&self, user_id: String) {
        let room = &self.state.settings.room_name;
        self.state.rooms.join_room(room, self.conn);
        self.state.directory.register(&user_id, self.conn);
        counter!(ROOM_JOINED).increment(1);
        debug!(user_id, room, "user joined live room");
    }

    async fn relay_chat(&self, msg: ChatMessage) {
        let Some(target) = self.state.directory.resolve(&msg.receiver_id) else {
            // receiver offline: message is lost, by design
            debug!(receiver_id = msg.receiver_id, "chat receiver not connected");
            return;
        };
        counter!(CHAT_RELAYED).increment(1);
        self.state
            .rooms
            .send_to(target, ServerEvent::ReceiveMessage(msg))
            .await;
    }

    /// Forward the request to the named admin's connection only; nothing is
    /// surfaced to the requester if the admin is offline.
    async fn speak_request(&self, req: SpeakRequest) {
        counter!(SPEAK_REQUESTED).increment(1);
        let Some(admin_conn) = self.state.directory.resolve(&req.admin) else {
            debug!(admin = req.admin, "speak-request target not connected");
            return;
        };
        self.state
            .rooms
            .send_to(admin_conn, ServerEvent::RequestReceived)
            .await;
    }

    /// Resolve the admin's verdict: rejection goes privately to the
    /// requester, acceptance is broadcast to every live connection because a
    /// new speaker order is public information.
    async fn speak_response(&self, resp: SpeakResponse) {
        if resp.status == SPEAK_REJECTED {
            counter!(SPEAK_REJECTIONS).increment(1);
            let Some(requester) = self.state.directory.resolve(&resp.id) else {
                debug!(requester = resp.id, "rejected requester not connected");
                return;
            };
            self.state
                .rooms
                .send_to(
                    requester,
                    ServerEvent::SpeakerResponse {
                        status: "error".to_string(),
                        message: "Speaker Rejected Your Request!".to_string(),
                        data: None,
                    },
                )
                .await;
            return;
        }

        match self
            .state
            .speaker_queue
            .slot_details(u32::from(resp.status))
            .await
        {
            Ok(data) => {
                counter!(SPEAK_ACCEPTED).increment(1);
                self.state
                    .rooms
                    .broadcast_all(ServerEvent::SpeakerResponse {
                        status: "success".to_string(),
                        message: "Speaker accepted your request.".to_string(),
                        data: Some(data),
                    })
                    .await;
            },
            Err(e) => {
                warn!(error = %e, slot = resp.status, "speaker-queue lookup failed");
                self.report_failure("speaker-queue", &e).await;
            },
        }
    }

    /// Compute the status change, then relay the outcome to the whole room,
    /// sender included: the room itself is the addressing mechanism here.
    async fn change_session_status(&self, params: SessionStatusParams) {
        match self.state.session_control.change_status(&params).await {
            Ok(outcome) => {
                counter!(SESSION_STATUS_CHANGED).increment(1);
                self.state
                    .rooms
                    .broadcast_to_room(
                        &self.state.settings.room_name,
                        ServerEvent::UpdateSessionStatus {
                            status: outcome.status,
                            message: outcome.message,
                            session_status: params.status,
                        },
                        None,
                    )
                    .await;
            },
            Err(e) => {
                warn!(error = %e, "session-control computation failed");
                self.report_failure("session-control", &e).await;
            },
        }
    }

    /// Per-event failure boundary: tell the originating connection that its
    /// event went nowhere instead of blackholing it.
    async fn report_failure(&self, service: &str, err: &anyhow::Error) {
        self.state
            .rooms
            .send_to(
                self.conn,
                ServerEvent::Error {
                    code: format!("{}_FAILED", service.replace('-', "_").to_uppercase()),
                    message: err.to_string(),
                },
            )
            .await;
    }
}
