// ================
// common/src/live.rs
// ================
//! Live-session wire protocol.
//!
//! Every frame on the WebSocket is a JSON object with an `event` tag and an
//! optional `data` payload. Event names are kept exactly as the deployed
//! clients emit them (mixed camelCase/kebab-case is historical).

use serde::{Deserialize, Serialize};

/// Status code an admin sends to reject a speak request.
/// Any other value is treated as an accepted queue slot.
pub const SPEAK_REJECTED: u8 = 3;

/// Events sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Join the global room and register the logical user id
    #[serde(rename = "joinRoom")]
    JoinRoom(String),
    /// Targeted peer-to-peer chat relay
    #[serde(rename = "send-message")]
    SendMessage(ChatMessage),
    /// Ask the named admin for the floor
    #[serde(rename = "send-speak-request")]
    SendSpeakRequest(SpeakRequest),
    /// Admin's verdict on a pending speak request
    #[serde(rename = "new-speaker-request-response")]
    SpeakRequestResponse(SpeakResponse),
    /// Request a session status change (computed server-side)
    #[serde(rename = "change-session-status")]
    ChangeSessionStatus(SessionStatusParams),
}

/// Events sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Targeted chat delivery
    #[serde(rename = "receive-message")]
    ReceiveMessage(ChatMessage),
    /// Notifies an admin that someone asked for the floor (empty payload)
    #[serde(rename = "request-received")]
    RequestReceived,
    /// Outcome of a speak request; targeted on reject, broadcast on accept
    #[serde(rename = "speaker-response")]
    SpeakerResponse {
        status: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Result of a session status change, relayed to the whole room
    #[serde(rename = "update-session-status")]
    UpdateSessionStatus {
        status: String,
        message: String,
        session_status: String,
    },
    /// Per-event failure report (a collaborator call failed)
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

/// Peer-to-peer chat payload, relayed verbatim
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub receiver_id: String,
    pub message: String,
    pub sender: String,
}

/// Payload of `send-speak-request`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    /// Logical user id of the admin being asked
    pub admin: String,
}

/// Payload of `new-speaker-request-response`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeakResponse {
    /// Logical user id of the original requester
    pub id: String,
    /// [`SPEAK_REJECTED`] or an accepted queue slot number
    pub status: u8,
}

/// Payload of `change-session-status`; anything beyond `status` is passed
/// through to the session-control collaborator untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionStatusParams {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
