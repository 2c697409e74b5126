// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cupflow_server::{
    build_router, ApiConfig, AppState, HttpChatGateway, LocalFsAssetStore,
};
use cupflow_store::OrderStore;

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env::var(name).unwrap_or_else(|_| default.to_string()))
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("CUPFLOW_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("CUPFLOW_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let db_path = env_path("CUPFLOW_DB_PATH", "data/cupflow.db");
    let asset_root = env_path("CUPFLOW_ASSET_ROOT", "data/assets");
    let asset_base =
        env::var("CUPFLOW_ASSET_BASE_URL").unwrap_or_else(|_| "/files".to_string());
    let chat_base =
        env::var("CUPFLOW_CHAT_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3020".to_string());

    let config = ApiConfig {
        arts_dir: env_path("CUPFLOW_ARTS_DIR", "data/arts"),
        staging_dir: env_path("CUPFLOW_STAGING_DIR", "data/arts/staging"),
        send_delay: env_duration_ms("CUPFLOW_SEND_DELAY_MS", 3000),
        cors_origins: env_list("CUPFLOW_CORS_ORIGINS"),
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("create {}: {e}", parent.display()))?;
    }
    let store = OrderStore::open(&db_path).map_err(|e| format!("open store: {e}"))?;
    let assets = Arc::new(LocalFsAssetStore::new(asset_root, asset_base));
    let chat = Arc::new(HttpChatGateway::new(chat_base));

    let app = build_router(AppState::new(store, assets, chat, config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr}: {e}"))?;
    info!("cupflow-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
