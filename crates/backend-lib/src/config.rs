// ============================
// sabha-backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path (user documents + uploads)
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Name of the single well-known live-session room
    pub room_name: String,
    /// Authentication settings
    pub auth: AuthSettings,
}

/// Token issuance and sign-in protection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for JWT signing
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Failed sign-in attempts before lockout
    pub max_sign_in_attempts: u32,
    /// Lockout duration in seconds
    pub lockout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            room_name: "LokSabha".to_string(),
            auth: AuthSettings::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_ttl_secs: 60 * 60, // 1 hour
            max_sign_in_attempts: 5,
            lockout_secs: 5 * 60,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` merged with `SABHA_`-prefixed
    /// environment variables; missing keys fall back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings from an explicit config file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Figment::from(figment::providers::Serialized::defaults(
            Settings::default(),
        ))
        .merge(Toml::file(path.as_ref()))
        .merge(Env::prefixed("SABHA_").split("__"))
        .extract()?;
        Ok(settings)
    }
}
