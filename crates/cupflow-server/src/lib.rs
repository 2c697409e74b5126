// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod adapters;
mod error;
mod http;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use cupflow_store::OrderStore;

pub const CRATE_NAME: &str = "cupflow-server";

pub use adapters::{
    AssetError, AssetStore, ChatError, ChatGateway, ChatGroup, ChatStatus, FakeChatGateway,
    HttpChatGateway, ImageAttachment, LocalFsAssetStore, SentMessage,
};
pub use error::{ApiError, ApiErrorCode};
pub use http::build_router;

/// Settings the handlers need beyond their injected services.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub arts_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub send_delay: Duration,
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            arts_dir: PathBuf::from("data/arts"),
            staging_dir: PathBuf::from("data/arts/staging"),
            send_delay: Duration::from_secs(3),
            cors_origins: Vec::new(),
        }
    }
}

/// Shared handler state. The store sits behind a mutex; handlers are
/// effectively sequential, which is all this workload needs.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<OrderStore>>,
    pub assets: Arc<dyn AssetStore>,
    pub chat: Arc<dyn ChatGateway>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: OrderStore,
        assets: Arc<dyn AssetStore>,
        chat: Arc<dyn ChatGateway>,
        config: ApiConfig,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            assets,
            chat,
            config: Arc::new(config),
        }
    }
}
