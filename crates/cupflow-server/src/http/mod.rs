// SPDX-License-Identifier: Apache-2.0

mod arts;
mod assets;
mod chat;
mod import;
mod orders;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    Router::new()
        .route("/", get(landing))
        .route("/healthz", get(healthz))
        .route("/v1/orders", get(orders::list))
        .route("/v1/orders/batch", patch(orders::batch_status))
        .route(
            "/v1/orders/{id}",
            patch(orders::patch_one).delete(orders::delete_one),
        )
        .route("/v1/orders/import", post(import::import_orders))
        .route(
            "/v1/orders/daily-queue",
            post(orders::build_daily_queue).delete(orders::clear_daily_queue),
        )
        .route(
            "/v1/orders/{id}/assets",
            post(assets::upload).delete(assets::delete),
        )
        .route("/v1/arts/stage", post(arts::stage).delete(arts::clear_staging))
        .route("/v1/chat/status", get(chat::status))
        .route("/v1/chat/init", post(chat::init))
        .route("/v1/chat/groups", get(chat::groups))
        .route("/v1/chat/send-text", post(chat::send_text))
        .route("/v1/chat/send-painting", post(chat::send_painting))
        .route("/v1/chat/send-daily", post(chat::send_daily))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(methods)
        .allow_headers(Any)
}

async fn landing() -> Json<serde_json::Value> {
    Json(json!({
        "service": crate::CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
