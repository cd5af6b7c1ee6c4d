// ============================
// sabha-backend-lib/src/live/directory.rs
// ============================
//! Logical-user-id to live-connection mapping.
//!
//! Entries are a weak association: a handle may go stale between a crash and
//! the transport noticing; deliveries to it just drop. No heartbeat, no
//! reaping.

use dashmap::DashMap;
use uuid::Uuid;

/// Opaque handle for one live connection, valid only while that channel is open
pub type ConnId = Uuid;

/// Process-local directory mapping logical user ids to connection handles.
///
/// Owned by the server state and passed to event handlers; never a global.
#[derive(Debug, Default)]
pub struct ConnectionDirectory {
    entries: DashMap<String, ConnId>,
}

impl ConnectionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional upsert: the latest join wins, any prior handle for this
    /// user is presumed stale and overwritten.
    pub fn register(&self, user_id: &str, conn: ConnId) {
        self.entries.insert(user_id.to_string(), conn);
    }

    /// Resolve a user to their current handle; `None` is a legal, silent
    /// outcome (user never joined or already left).
    pub fn resolve(&self, user_id: &str) -> Option<ConnId> {
        self.entries.get(user_id).map(|e| *e.value())
    }

    /// Remove the entry currently mapped to this handle, if any, and return
    /// the user id it belonged to. Reverse value scan, O(n) in registered
    /// users; acceptable at room scale.
    pub fn unregister(&self, conn: ConnId) -> Option<String> {
        let user_id = self
            .entries
            .iter()
            .find(|e| *e.value() == conn)
            .map(|e| e.key().clone())?;
        self.entries.remove(&user_id);
        Some(user_id)
    }

    /// Number of registered users
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries (server shutdown)
    pub fn clear(&self) {
        self.entries.clear();
    }
}
