// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use cupflow_model::{sanitize_file_name, AssetKind, Order};

use crate::error::ApiError;
use crate::AppState;

struct Upload {
    kind: Option<AssetKind>,
    file_name: Option<String>,
    content_type: String,
    bytes: Option<Vec<u8>>,
}

/// Stores an artwork file for one order and records its public URL.
/// The stored name prefers the order's art name (`"{art} - shopee.{ext}"`)
/// over whatever the browser called the upload.
pub async fn upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Order>, ApiError> {
    let mut upload = Upload {
        kind: None,
        file_name: None,
        content_type: "application/octet-stream".to_string(),
        bytes: None,
    };
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("bad multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("kind") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("unreadable kind: {e}")))?;
                upload.kind =
                    Some(AssetKind::parse(value.trim()).map_err(|e| ApiError::validation(e.0))?);
            }
            Some("file") => {
                upload.file_name = field.file_name().map(ToString::to_string);
                if let Some(ct) = field.content_type() {
                    upload.content_type = ct.to_string();
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("unreadable upload: {e}")))?;
                upload.bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }
    let kind = upload
        .kind
        .ok_or_else(|| ApiError::validation("missing kind field"))?;
    let bytes = upload
        .bytes
        .ok_or_else(|| ApiError::validation("missing file field"))?;

    let order = state.store.lock().await.get(id)?;
    let stored_name = stored_file_name(&order, kind, upload.file_name.as_deref());
    let relative = format!("{}/{}/{stored_name}", kind.as_str(), order.id);
    let url = state
        .assets
        .put(&relative, &bytes, &upload.content_type)
        .await?;
    let updated = state.store.lock().await.set_asset_url(id, kind, Some(&url))?;
    info!(order = %id, kind = kind.as_str(), url, "asset stored");
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct KindQuery {
    pub kind: String,
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<KindQuery>,
) -> Result<Json<Order>, ApiError> {
    let kind = AssetKind::parse(query.kind.trim()).map_err(|e| ApiError::validation(e.0))?;
    let order = state.store.lock().await.get(id)?;
    let url = match kind {
        AssetKind::Png => order.art_png_url.clone(),
        AssetKind::Cdr => order.art_cdr_url.clone(),
    };
    if let Some(url) = url {
        state.assets.delete_by_url(&url).await?;
    }
    let updated = state.store.lock().await.set_asset_url(id, kind, None)?;
    info!(order = %id, kind = kind.as_str(), "asset removed");
    Ok(Json(updated))
}

fn stored_file_name(order: &Order, kind: AssetKind, original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()))
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| kind.as_str().to_string());
    let base = match order.art_name.as_deref() {
        Some(art) if !art.trim().is_empty() => format!("{art} - shopee"),
        _ => original
            .and_then(|name| name.rsplit_once('.').map(|(stem, _)| stem.to_string()))
            .or_else(|| original.map(ToString::to_string))
            .unwrap_or_else(|| order.marketplace_order_id.clone()),
    };
    let sanitized = sanitize_file_name(&format!("{base}.{extension}"));
    if sanitized.is_empty() {
        format!("{}.{extension}", order.marketplace_order_id)
    } else {
        sanitized
    }
}
