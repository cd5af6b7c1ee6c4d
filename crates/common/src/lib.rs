// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the Sabha backend server and its clients.
//! This crate defines the live-session wire protocol and the
//! persistent user/appointment document model.

pub mod live;
pub mod model;

pub use live::{
    ChatMessage, ClientEvent, ServerEvent, SessionStatusParams, SpeakRequest, SpeakResponse,
    SPEAK_REJECTED,
};
pub use model::{Appointment, BusinessProfile, FilledForm, FormTemplate, UserRecord};
