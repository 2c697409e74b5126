// SPDX-License-Identifier: Apache-2.0

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::Response;
use std::convert::Infallible;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, error};

use cupflow_ingest::{run_import, ImportEvent};

use crate::error::ApiError;
use crate::AppState;

/// Accepts the Shopee XLSX as a multipart upload and answers with a
/// newline-delimited JSON progress stream. Decoding the workbook and the
/// chunked transactions are synchronous, so the import runs on a blocking
/// task feeding the stream, and the connection sees progress as chunks
/// commit.
pub async fn import_orders(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("bad multipart body: {e}")))?
    {
        if field.name() == Some("file") || bytes.is_none() {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("unreadable upload: {e}")))?;
            bytes = Some(data.to_vec());
        }
    }
    let bytes = bytes.ok_or_else(|| ApiError::validation("missing file field"))?;

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = store.blocking_lock();
        let emit = |event: &ImportEvent| {
            debug!(?event, "import progress");
            if let Ok(line) = serde_json::to_string(event) {
                let _ = tx.send(line);
            }
        };
        if let Err(e) = run_import(&mut guard, &bytes, emit) {
            error!(error = %e, "import failed");
            let event = ImportEvent::Error {
                message: e.to_string(),
            };
            if let Ok(line) = serde_json::to_string(&event) {
                let _ = tx.send(line);
            }
        }
    });

    let body = Body::from_stream(
        UnboundedReceiverStream::new(rx).map(|line| Ok::<_, Infallible>(format!("{line}\n"))),
    );
    Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(body)
        .map_err(|e| ApiError::new(crate::ApiErrorCode::Internal, e.to_string()))
}
