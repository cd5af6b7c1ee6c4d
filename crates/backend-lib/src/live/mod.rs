// ============================
// sabha-backend-lib/src/live/mod.rs
// ============================
//! Real-time session core: connection directory, room broadcast, and the
//! speak-request protocol. Everything here is transport-free; the WebSocket
//! layer in [`crate::ws_router`] only attaches channels and feeds events in.

pub mod directory;
pub mod handler;
pub mod rooms;
pub mod services;

pub use directory::{ConnId, ConnectionDirectory};
pub use handler::LiveHandler;
pub use rooms::RoomBroadcaster;
pub use services::{
    InMemorySpeakerQueue, InProcessSessionControl, SessionControl, SessionOutcome, SpeakerQueue,
};
