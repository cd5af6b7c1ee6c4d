// ============================
// sabha-backend-bin/src/main.rs
// ============================
//! Server binary: config, storage, state, serve.
use std::sync::Arc;

use sabha_backend_lib::{config::Settings, storage::FlatFileStorage, ws_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().or_else(|_| Settings::load_from("config/default.toml"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let storage = FlatFileStorage::new(&settings.data_dir)?;
    let state = Arc::new(AppState::new(storage, &settings));
    let app = ws_router::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, room = settings.room_name, "sabha backend listening");
    axum::serve(listener, app).await?;

    Ok(())
}
