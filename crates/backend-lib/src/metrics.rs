// ==============
// sabha-backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const WS_CONNECTION: &str = "ws.connection";
pub const WS_DISCONNECTION: &str = "ws.disconnection";
pub const WS_ACTIVE: &str = "ws.active";
pub const ROOM_JOINED: &str = "live.room_joined";
pub const CHAT_RELAYED: &str = "live.chat_relayed";
pub const SPEAK_REQUESTED: &str = "live.speak_requested";
pub const SPEAK_ACCEPTED: &str = "live.speak_accepted";
pub const SPEAK_REJECTIONS: &str = "live.speak_rejected";
pub const SESSION_STATUS_CHANGED: &str = "live.session_status_changed";
pub const USER_SIGNED_UP: &str = "user.signed_up";
pub const APPOINTMENT_BOOKED: &str = "appointment.booked";
