// ============================
// sabha-backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers for the Sabha API.

pub mod accounts;
pub mod appointments;
pub mod forms;
pub mod profile;
pub mod uploads;
