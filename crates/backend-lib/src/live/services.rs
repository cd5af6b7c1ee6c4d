// ============================
// sabha-backend-lib/src/live/services.rs
// ============================
//! Collaborator seams consumed by the live-session core.
//!
//! Both services are opaque to the event handler: the speaker queue turns an
//! accepted slot number into an arbitrary serializable payload, and session
//! control computes the outcome of a status change. Failures surface as
//! errors the handler reports per event instead of letting them escape.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use sabha_common::SessionStatusParams;
use serde_json::Value;

/// Speaker-queue lookup: accepted slot number -> queue/result payload.
#[async_trait]
pub trait SpeakerQueue: Send + Sync {
    async fn slot_details(&self, slot: u32) -> Result<Value>;
}

/// Session-end / status-change computation.
#[async_trait]
pub trait SessionControl: Send + Sync {
    async fn change_status(&self, params: &SessionStatusParams) -> Result<SessionOutcome>;
}

/// Result of a session status change
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub status: String,
    pub message: String,
}

/// In-process speaker queue keyed by slot number.
///
/// Deployments populate slots as the speaker order changes; lookups for an
/// unknown slot return a minimal payload rather than failing, since the slot
/// number itself is the only thing an accepting admin guarantees.
#[derive(Debug, Default)]
pub struct InMemorySpeakerQueue {
    slots: DashMap<u32, Value>,
}

impl InMemorySpeakerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_slot(&self, slot: u32, payload: Value) {
        self.slots.insert(slot, payload);
    }
}

#[async_trait]
impl SpeakerQueue for InMemorySpeakerQueue {
    async fn slot_details(&self, slot: u32) -> Result<Value> {
        match self.slots.get(&slot) {
            Some(entry) => Ok(entry.value().clone()),
            None => Ok(serde_json::json!({ "slot": slot })),
        }
    }
}

/// Session control that validates the requested status locally.
#[derive(Debug, Default)]
pub struct InProcessSessionControl;

impl InProcessSessionControl {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionControl for InProcessSessionControl {
    async fn change_status(&self, params: &SessionStatusParams) -> Result<SessionOutcome> {
        if params.status.is_empty() {
            anyhow::bail!("status must not be empty");
        }
        Ok(SessionOutcome {
            status: "success".to_string(),
            message: format!("Session status changed to {}", params.status),
        })
    }
}
