// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use cupflow_model::{group_for_priority, sort_groups, ArtStatus, Order, OrderPatch};
use cupflow_store::OrderFilter;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub in_daily_queue: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(ArtStatus::parse)
        .transpose()
        .map_err(|e| ApiError::validation(e.0))?;
    let filter = OrderFilter {
        status,
        search: query.search,
        in_daily_queue: query.in_daily_queue,
    };
    let orders = state.store.lock().await.list(&filter)?;
    Ok(Json(orders))
}

pub async fn patch_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let order = state.store.lock().await.apply_patch(id, &patch)?;
    info!(order = %id, status = order.art_status.as_str(), "order patched");
    Ok(Json(order))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.lock().await.delete(id)?;
    info!(order = %id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchStatusRequest {
    pub ids: Vec<Uuid>,
    pub status: ArtStatus,
}

pub async fn batch_status(
    State(state): State<AppState>,
    Json(request): Json<BatchStatusRequest>,
) -> Result<Json<Vec<Order>>, ApiError> {
    if request.ids.is_empty() {
        return Err(ApiError::validation("ids must not be empty"));
    }
    let orders = state
        .store
        .lock()
        .await
        .set_status_bulk(&request.ids, request.status)?;
    info!(
        count = orders.len(),
        status = request.status.as_str(),
        "bulk status change"
    );
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyQueueRequest {
    pub count: usize,
}

/// Rebuilds the daily queue: drop the previous selection, order the open
/// groups by priority, then queue the first `count` orders across groups.
pub async fn build_daily_queue(
    State(state): State<AppState>,
    Json(request): Json<DailyQueueRequest>,
) -> Result<Json<Vec<Order>>, ApiError> {
    if request.count == 0 {
        return Err(ApiError::validation("count must be at least 1"));
    }
    let today = Local::now().date_naive();
    let mut store = state.store.lock().await;
    let open: Vec<Order> = store
        .list(&OrderFilter::default())?
        .into_iter()
        .filter(|o| o.art_status != ArtStatus::Shipped)
        .collect();
    let mut groups = group_for_priority(&open, today);
    sort_groups(&mut groups);
    let selected: Vec<Uuid> = groups
        .iter()
        .flat_map(|g| g.orders.iter().map(|o| o.id))
        .take(request.count)
        .collect();

    store.clear_daily_queue()?;
    store.set_daily_queue(&selected)?;
    let queued = store.get_many(&selected)?;
    info!(requested = request.count, queued = queued.len(), "daily queue rebuilt");
    Ok(Json(queued))
}

pub async fn clear_daily_queue(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let cleared = state.store.lock().await.clear_daily_queue()?;
    info!(cleared, "daily queue cleared");
    Ok(StatusCode::NO_CONTENT)
}
