// SPDX-License-Identifier: Apache-2.0

//! Service ports the handlers talk to. Both the chat bridge and the asset
//! backend are injected at startup, so tests swap in fakes.

mod assets_fs;
mod chat_http;
mod fakes;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub use assets_fs::LocalFsAssetStore;
pub use chat_http::HttpChatGateway;
pub use fakes::{FakeChatGateway, SentMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError(pub String);

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ChatError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetError(pub String);

impl Display for AssetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for AssetError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStatus {
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatGroup {
    pub id: String,
    pub name: String,
}

/// Image payload for `ChatGateway::send_image`.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub file_name: String,
}

/// Messaging bridge the shop notifies through.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn status(&self) -> Result<ChatStatus, ChatError>;
    /// Pairing QR as a data URL while the bridge is unpaired.
    async fn qr_code(&self) -> Result<Option<String>, ChatError>;
    async fn init(&self) -> Result<(), ChatError>;
    async fn groups(&self) -> Result<Vec<ChatGroup>, ChatError>;
    async fn send_text(&self, group_id: &str, message: &str) -> Result<(), ChatError>;
    async fn send_image(
        &self,
        group_id: &str,
        caption: &str,
        image: &ImageAttachment,
    ) -> Result<(), ChatError>;
}

/// Blob storage for uploaded artwork files.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stores `bytes` at `relative_path` and returns the public URL.
    async fn put(
        &self,
        relative_path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, AssetError>;
    async fn get_by_url(&self, url: &str) -> Result<Vec<u8>, AssetError>;
    async fn delete_by_url(&self, url: &str) -> Result<(), AssetError>;
}
