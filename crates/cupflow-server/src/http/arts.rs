// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use cupflow_model::sanitize_file_name;

use crate::error::{ApiError, ApiErrorCode};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageRequest {
    pub art_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StageReport {
    pub copied: Vec<String>,
    pub not_found: Vec<String>,
}

/// Collects the source files for a production run into a clean staging
/// directory. Each art's files (`"{art} - shopee.*"`) are copied with a
/// numeric prefix so the staging listing matches the queue order.
pub async fn stage(
    State(state): State<AppState>,
    Json(request): Json<StageRequest>,
) -> Result<Json<StageReport>, ApiError> {
    if request.art_names.is_empty() {
        return Err(ApiError::validation("art_names must not be empty"));
    }
    let staging = &state.config.staging_dir;
    reset_dir(staging).await?;

    let mut copied = Vec::new();
    let mut not_found = Vec::new();
    // Prefixes only advance on a hit so the staged numbers stay contiguous.
    let mut position = 0usize;
    for art in &request.art_names {
        let pattern = sanitize_file_name(&format!("{art} - shopee"));
        if pattern.is_empty() {
            not_found.push(art.clone());
            continue;
        }
        let matches = matching_files(&state.config.arts_dir, &pattern).await?;
        if matches.is_empty() {
            not_found.push(art.clone());
            continue;
        }
        position += 1;
        for file_name in matches {
            let source = state.config.arts_dir.join(&file_name);
            let target = staging.join(format!("{position} - {file_name}"));
            tokio::fs::copy(&source, &target).await.map_err(|e| {
                ApiError::new(
                    ApiErrorCode::StorageFailed,
                    format!("copy {file_name}: {e}"),
                )
            })?;
            copied.push(file_name);
        }
    }
    info!(
        copied = copied.len(),
        missing = not_found.len(),
        "arts staged"
    );
    Ok(Json(StageReport { copied, not_found }))
}

pub async fn clear_staging(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    reset_dir(&state.config.staging_dir).await?;
    info!("staging cleared");
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_dir(dir: &Path) -> Result<(), ApiError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ApiError::new(
                ApiErrorCode::StorageFailed,
                format!("clear {}: {e}", dir.display()),
            ));
        }
    }
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        ApiError::new(
            ApiErrorCode::StorageFailed,
            format!("create {}: {e}", dir.display()),
        )
    })
}

/// File names in `dir` containing the pattern, case-insensitively. Contains
/// rather than equals so variants like `"Festa - shopee (2).png"` or
/// `"Festa - shopee frente.cdr"` are staged along with the plain file.
async fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<String>, ApiError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ApiError::new(
                ApiErrorCode::StorageFailed,
                format!("read {}: {e}", dir.display()),
            ));
        }
    };
    let wanted = pattern.to_lowercase();
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        ApiError::new(ApiErrorCode::StorageFailed, format!("scan {}: {e}", dir.display()))
    })? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_lowercase().contains(&wanted) {
            found.push(name);
        }
    }
    found.sort();
    Ok(found)
}
