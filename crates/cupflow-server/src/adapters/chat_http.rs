// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use super::{ChatError, ChatGateway, ChatGroup, ChatStatus, ImageAttachment};

/// Talks to the WhatsApp bridge sidecar over plain HTTP.
pub struct HttpChatGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct QrResponse {
    qr: Option<String>,
}

impl HttpChatGateway {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ChatError(format!("bridge returned {status}: {body}")))
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn status(&self) -> Result<ChatStatus, ChatError> {
        let response = self
            .client
            .get(self.url("/status"))
            .send()
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ChatError(format!("bad status payload: {e}")))
    }

    async fn qr_code(&self) -> Result<Option<String>, ChatError> {
        let response = self
            .client
            .get(self.url("/qr"))
            .send()
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        let payload: QrResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ChatError(format!("bad qr payload: {e}")))?;
        Ok(payload.qr)
    }

    async fn init(&self) -> Result<(), ChatError> {
        let response = self
            .client
            .post(self.url("/init"))
            .send()
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn groups(&self) -> Result<Vec<ChatGroup>, ChatError> {
        let response = self
            .client
            .get(self.url("/groups"))
            .send()
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ChatError(format!("bad groups payload: {e}")))
    }

    async fn send_text(&self, group_id: &str, message: &str) -> Result<(), ChatError> {
        let response = self
            .client
            .post(self.url("/send-text"))
            .json(&json!({ "group_id": group_id, "message": message }))
            .send()
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn send_image(
        &self,
        group_id: &str,
        caption: &str,
        image: &ImageAttachment,
    ) -> Result<(), ChatError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let response = self
            .client
            .post(self.url("/send-image"))
            .json(&json!({
                "group_id": group_id,
                "caption": caption,
                "file_name": image.file_name,
                "mime_type": image.mime,
                "image_base64": encoded,
            }))
            .send()
            .await
            .map_err(|e| ChatError(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }
}
