// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use cupflow_model::{
    daily_batch_message, group_for_priority, painting_message, sort_groups, Order,
};
use cupflow_store::OrderFilter;

use crate::adapters::ImageAttachment;
use crate::error::{ApiError, ApiErrorCode};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ChatStatusResponse {
    pub connected: bool,
    pub qr_code: Option<String>,
}

pub async fn status(State(state): State<AppState>) -> Result<Json<ChatStatusResponse>, ApiError> {
    let status = state.chat.status().await?;
    let qr_code = if status.connected {
        None
    } else {
        state.chat.qr_code().await?
    };
    Ok(Json(ChatStatusResponse {
        connected: status.connected,
        qr_code,
    }))
}

pub async fn init(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.chat.init().await?;
    info!("chat bridge init requested");
    Ok(StatusCode::ACCEPTED)
}

pub async fn groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::adapters::ChatGroup>>, ApiError> {
    Ok(Json(state.chat.groups().await?))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendTextRequest {
    pub group_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendReport {
    pub sent: usize,
}

pub async fn send_text(
    State(state): State<AppState>,
    Json(request): Json<SendTextRequest>,
) -> Result<Json<SendReport>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::validation("message must not be empty"));
    }
    ensure_connected(&state).await?;
    state
        .chat
        .send_text(&request.group_id, &request.message)
        .await?;
    Ok(Json(SendReport { sent: 1 }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendPaintingRequest {
    pub order_ids: Vec<Uuid>,
    pub group_id: String,
}

/// Sends the painting request for a set of orders, attaching the first
/// order's raster artwork when one is on file.
pub async fn send_painting(
    State(state): State<AppState>,
    Json(request): Json<SendPaintingRequest>,
) -> Result<Json<SendReport>, ApiError> {
    if request.order_ids.is_empty() {
        return Err(ApiError::validation("order_ids must not be empty"));
    }
    ensure_connected(&state).await?;
    let orders = state.store.lock().await.get_many(&request.order_ids)?;
    if orders.is_empty() {
        return Err(ApiError::new(ApiErrorCode::NotFound, "no matching orders"));
    }
    let today = Local::now().date_naive();
    let message = painting_message(&orders, today).ok_or_else(|| {
        ApiError::validation("none of the selected orders needs painting")
    })?;

    let attachment = raster_attachment(&state, &orders).await;
    match attachment {
        Some(image) => {
            state
                .chat
                .send_image(&request.group_id, &message, &image)
                .await?;
        }
        None => {
            state.chat.send_text(&request.group_id, &message).await?;
        }
    }
    info!(group = request.group_id, orders = orders.len(), "painting request sent");
    Ok(Json(SendReport { sent: 1 }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendDailyRequest {
    pub group_id: String,
}

/// Sends the daily batch list, then one painting request per queued group
/// that needs it, pausing between consecutive messages.
pub async fn send_daily(
    State(state): State<AppState>,
    Json(request): Json<SendDailyRequest>,
) -> Result<Json<SendReport>, ApiError> {
    ensure_connected(&state).await?;
    let today = Local::now().date_naive();
    let queued = state.store.lock().await.list(&OrderFilter {
        in_daily_queue: Some(true),
        ..OrderFilter::default()
    })?;
    if queued.is_empty() {
        return Err(ApiError::validation("daily queue is empty"));
    }
    let mut groups = group_for_priority(&queued, today);
    sort_groups(&mut groups);
    let ordered: Vec<Order> = groups.iter().flat_map(|g| g.orders.clone()).collect();

    let batch = daily_batch_message(&ordered, today)
        .ok_or_else(|| ApiError::validation("daily queue is empty"))?;
    state.chat.send_text(&request.group_id, &batch).await?;
    let mut sent = 1usize;
    for group in &groups {
        if let Some(message) = painting_message(&group.orders, today) {
            tokio::time::sleep(state.config.send_delay).await;
            state.chat.send_text(&request.group_id, &message).await?;
            sent += 1;
        }
    }
    info!(group = request.group_id, sent, "daily batch sent");
    Ok(Json(SendReport { sent }))
}

async fn ensure_connected(state: &AppState) -> Result<(), ApiError> {
    let status = state.chat.status().await?;
    if !status.connected {
        return Err(ApiError::new(
            ApiErrorCode::ChatUnavailable,
            "chat bridge is not connected",
        )
        .with_details(json!({ "hint": "pair the bridge via /v1/chat/init" })));
    }
    Ok(())
}

/// Loads the PNG attachment for the first order that has one. Failure to
/// read the asset falls back to a text-only send.
async fn raster_attachment(state: &AppState, orders: &[Order]) -> Option<ImageAttachment> {
    let order = orders.iter().find(|o| o.art_png_url.is_some())?;
    let url = order.art_png_url.as_deref()?;
    match state.assets.get_by_url(url).await {
        Ok(bytes) => Some(ImageAttachment {
            bytes,
            mime: "image/png".to_string(),
            file_name: url.rsplit('/').next().unwrap_or("art.png").to_string(),
        }),
        Err(e) => {
            tracing::warn!(url, error = %e, "raster asset unreadable, sending text only");
            None
        }
    }
}
