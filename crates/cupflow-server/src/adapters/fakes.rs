// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::{ChatError, ChatGateway, ChatGroup, ChatStatus, ImageAttachment};

/// Records every send instead of talking to a bridge. Used by the server
/// integration tests.
#[derive(Default)]
pub struct FakeChatGateway {
    pub connected: AtomicBool,
    pub sent: Mutex<Vec<SentMessage>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text { group_id: String, message: String },
    Image { group_id: String, caption: String, file_name: String },
}

impl FakeChatGateway {
    #[must_use]
    pub fn connected() -> Self {
        let fake = Self::default();
        fake.connected.store(true, Ordering::Relaxed);
        fake
    }
}

#[async_trait]
impl ChatGateway for FakeChatGateway {
    async fn status(&self) -> Result<ChatStatus, ChatError> {
        Ok(ChatStatus {
            connected: self.connected.load(Ordering::Relaxed),
        })
    }

    async fn qr_code(&self) -> Result<Option<String>, ChatError> {
        if self.connected.load(Ordering::Relaxed) {
            Ok(None)
        } else {
            Ok(Some("data:image/png;base64,ZmFrZS1xcg==".to_string()))
        }
    }

    async fn init(&self) -> Result<(), ChatError> {
        Ok(())
    }

    async fn groups(&self) -> Result<Vec<ChatGroup>, ChatError> {
        Ok(vec![ChatGroup {
            id: "group-1".to_string(),
            name: "Produção".to_string(),
        }])
    }

    async fn send_text(&self, group_id: &str, message: &str) -> Result<(), ChatError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(ChatError("bridge not connected".to_string()));
        }
        self.sent.lock().await.push(SentMessage::Text {
            group_id: group_id.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    async fn send_image(
        &self,
        group_id: &str,
        caption: &str,
        image: &ImageAttachment,
    ) -> Result<(), ChatError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(ChatError("bridge not connected".to_string()));
        }
        self.sent.lock().await.push(SentMessage::Image {
            group_id: group_id.to_string(),
            caption: caption.to_string(),
            file_name: image.file_name.clone(),
        });
        Ok(())
    }
}
