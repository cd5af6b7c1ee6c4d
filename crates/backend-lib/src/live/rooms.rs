// ============================
// sabha-backend-lib/src/live/rooms.rs
// ============================
//! Room membership and event delivery.
//!
//! Connections are represented by their outbound [`mpsc::Sender`]; the
//! broadcaster never touches the network, which keeps the speak-request
//! logic testable with plain channels. Delivery is fire-and-forget: no
//! acknowledgment, no retry, no ordering guarantee across events.

use super::ConnId;
use dashmap::DashMap;
use sabha_common::ServerEvent;
use std::collections::HashSet;
use tokio::sync::mpsc;

/// Per-connection event registry plus named room subscription sets.
#[derive(Debug, Default)]
pub struct RoomBroadcaster {
    peers: DashMap<ConnId, mpsc::Sender<ServerEvent>>,
    rooms: DashMap<String, HashSet<ConnId>>,
}

impl RoomBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's outbound channel. Called once per connection
    /// before any event is processed for it.
    pub fn attach(&self, conn: ConnId, tx: mpsc::Sender<ServerEvent>) {
        self.peers.insert(conn, tx);
    }

    /// Remove a connection from the registry and from every room.
    pub fn detach(&self, conn: ConnId) {
        self.peers.remove(&conn);
        for mut room in self.rooms.iter_mut() {
            room.value_mut().remove(&conn);
        }
    }

    /// Subscribe a connection to a named room.
    pub fn join_room(&self, room: &str, conn: ConnId) {
        self.rooms.entry(room.to_string()).or_default().insert(conn);
    }

    /// Deliver to exactly one connection; silently dropped when the handle is
    /// absent or the channel already closed.
    pub async fn send_to(&self, conn: ConnId, event: ServerEvent) {
        let tx = self.peers.get(&conn).map(|e| e.value().clone());
        if let Some(tx) = tx {
            let _ = tx.send(event).await;
        }
    }

    /// Deliver to every connection subscribed to `room`, optionally skipping
    /// the originating connection.
    pub async fn broadcast_to_room(&self, room: &str, event: ServerEvent, exclude: Option<ConnId>) {
        let members: Vec<ConnId> = match self.rooms.get(room) {
            Some(set) => set.iter().copied().collect(),
            None => return,
        };
        // clone senders before awaiting so no map guard is held across sends
        let targets: Vec<mpsc::Sender<ServerEvent>> = members
            .into_iter()
            .filter(|c| Some(*c) != exclude)
            .filter_map(|c| self.peers.get(&c).map(|e| e.value().clone()))
            .collect();
        for tx in targets {
            let _ = tx.send(event.clone()).await;
        }
    }

    /// Deliver to every live connection, subscribed to a room or not.
    /// Used by the speak-accept path: acceptance is public information.
    pub async fn broadcast_all(&self, event: ServerEvent) {
        let targets: Vec<mpsc::Sender<ServerEvent>> =
            self.peers.iter().map(|e| e.value().clone()).collect();
        for tx in targets {
            let _ = tx.send(event.clone()).await;
        }
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sabha_common::ChatMessage;
    use uuid::Uuid;

    fn chat(text: &str) -> ServerEvent {
        ServerEvent::ReceiveMessage(ChatMessage {
            receiver_id: "r".to_string(),
            message: text.to_string(),
            sender: "s".to_string(),
        })
    }

    fn connect(b: &RoomBroadcaster) -> (ConnId, mpsc::Receiver<ServerEvent>) {
        let conn = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(16);
        b.attach(conn, tx);
        (conn, rx)
    }

    #[tokio::test]
    async fn test_room_broadcast_reaches_members_only() {
        let b = RoomBroadcaster::new();
        let (in_room_a, mut rx_a) = connect(&b);
        let (in_room_b, mut rx_b) = connect(&b);
        let (_outside, mut rx_out) = connect(&b);
        b.join_room("sabha", in_room_a);
        b.join_room("sabha", in_room_b);

        b.broadcast_to_room("sabha", chat("hello"), None).await;

        assert_eq!(rx_a.try_recv().unwrap(), chat("hello"));
        assert_eq!(rx_b.try_recv().unwrap(), chat("hello"));
        assert!(rx_out.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_room_broadcast_can_exclude_sender() {
        let b = RoomBroadcaster::new();
        let (sender, mut rx_sender) = connect(&b);
        let (other, mut rx_other) = connect(&b);
        b.join_room("sabha", sender);
        b.join_room("sabha", other);

        b.broadcast_to_room("sabha", chat("x"), Some(sender)).await;

        assert!(rx_sender.try_recv().is_err());
        assert!(rx_other.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_send_to_absent_handle_is_silent() {
        let b = RoomBroadcaster::new();
        // never attached
        b.send_to(Uuid::new_v4(), chat("into the void")).await;

        // attached then detached (stale handle)
        let (conn, rx) = connect(&b);
        drop(rx);
        b.detach(conn);
        b.send_to(conn, chat("also dropped")).await;
    }

    #[tokio::test]
    async fn test_broadcast_all_ignores_room_membership() {
        let b = RoomBroadcaster::new();
        let (member, mut rx_member) = connect(&b);
        let (_loner, mut rx_loner) = connect(&b);
        b.join_room("sabha", member);

        b.broadcast_all(chat("to everyone")).await;

        assert!(rx_member.try_recv().is_ok());
        assert!(rx_loner.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_detach_removes_from_rooms() {
        let b = RoomBroadcaster::new();
        let (conn, mut rx) = connect(&b);
        b.join_room("sabha", conn);
        b.detach(conn);

        b.broadcast_to_room("sabha", chat("gone"), None).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(b.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room_is_noop() {
        let b = RoomBroadcaster::new();
        let (_conn, mut rx) = connect(&b);
        b.broadcast_to_room("no-such-room", chat("x"), None).await;
        assert!(rx.try_recv().is_err());
    }
}
