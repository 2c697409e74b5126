// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Local};
use rust_decimal::Decimal;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use cupflow_model::{OrderDraft, OrderPatch};
use cupflow_server::{
    build_router, ApiConfig, AppState, FakeChatGateway, LocalFsAssetStore, SentMessage,
};
use cupflow_store::OrderStore;

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let body = body.unwrap_or("");
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(req.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, mut payload) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    // Responses from a streaming body arrive chunked.
    let dechunked;
    if head.to_lowercase().contains("transfer-encoding: chunked") {
        dechunked = payload
            .split("\r\n")
            .enumerate()
            .filter(|(i, _)| i % 2 == 1)
            .map(|(_, part)| part)
            .collect::<String>();
        payload = &dechunked;
    }
    (status, payload.to_string())
}

async fn send_multipart(
    addr: std::net::SocketAddr,
    path: &str,
    kind: &str,
    file_name: &str,
    bytes: &[u8],
) -> (u16, String) {
    let boundary = "cupflow-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"kind\"\r\n\r\n{kind}\r\n\
             --{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let head = format!(
        "POST {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: multipart/form-data; \
         boundary={boundary}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.expect("write head");
    stream.write_all(&body).await.expect("write body");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, payload) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, payload.to_string())
}

struct Harness {
    addr: std::net::SocketAddr,
    state: AppState,
    chat: Arc<FakeChatGateway>,
    _tmp: tempfile::TempDir,
}

async fn boot(chat: FakeChatGateway) -> Harness {
    let tmp = tempfile::tempdir().expect("tempdir");
    let chat = Arc::new(chat);
    let assets = Arc::new(LocalFsAssetStore::new(tmp.path().join("assets"), "/files"));
    let config = ApiConfig {
        arts_dir: tmp.path().join("arts"),
        staging_dir: tmp.path().join("arts").join("staging"),
        send_delay: Duration::ZERO,
        cors_origins: Vec::new(),
    };
    let store = OrderStore::open_in_memory().expect("open store");
    let state = AppState::new(store, assets, chat.clone(), config);
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    Harness {
        addr,
        state,
        chat,
        _tmp: tmp,
    }
}

fn draft(marketplace_id: &str, handle: &str, ship_in_days: i64) -> OrderDraft {
    OrderDraft {
        marketplace_order_id: marketplace_id.to_string(),
        customer_handle: handle.to_string(),
        customer_name: handle.to_uppercase(),
        product_name: "Caneca Lisa 300ml".to_string(),
        variation: None,
        quantity: 1,
        total_value: Decimal::from(30),
        customer_note: None,
        shipping_date: (Local::now() + ChronoDuration::days(ship_in_days)).date_naive(),
        order_date: Local::now().date_naive(),
    }
}

async fn seed(harness: &Harness, d: &OrderDraft) -> Uuid {
    let (_, order) = harness
        .state
        .store
        .lock()
        .await
        .upsert_imported(d)
        .expect("seed order");
    order.id
}

async fn seed_patch(harness: &Harness, id: Uuid, patch_json: &str) {
    let patch: OrderPatch = serde_json::from_str(patch_json).expect("patch json");
    harness
        .state
        .store
        .lock()
        .await
        .apply_patch(id, &patch)
        .expect("seed patch");
}

#[tokio::test]
async fn landing_and_health_answer() {
    let h = boot(FakeChatGateway::connected()).await;
    let (status, body) = send_raw(h.addr, "GET", "/", None).await;
    assert_eq!(status, 200);
    let landing: serde_json::Value = serde_json::from_str(&body).expect("landing json");
    assert_eq!(landing["service"], "cupflow-server");

    let (status, body) = send_raw(h.addr, "GET", "/healthz", None).await;
    assert_eq!(status, 200);
    assert!(body.contains("ok"));
}

#[tokio::test]
async fn orders_list_patch_delete_contract() {
    let h = boot(FakeChatGateway::connected()).await;
    let id = seed(&h, &draft("2509TEST0001", "ana", 5)).await;

    let (status, body) = send_raw(h.addr, "GET", "/v1/orders", None).await;
    assert_eq!(status, 200);
    let orders: serde_json::Value = serde_json::from_str(&body).expect("orders json");
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
    assert_eq!(orders[0]["art_status"], "PENDING");

    let (status, body) = send_raw(
        h.addr,
        "PATCH",
        &format!("/v1/orders/{id}"),
        Some(r#"{"art_status":"APPROVED","art_name":"Festa Neon"}"#),
    )
    .await;
    assert_eq!(status, 200);
    let patched: serde_json::Value = serde_json::from_str(&body).expect("patched json");
    assert_eq!(patched["art_status"], "APPROVED");
    assert_eq!(patched["art_name"], "Festa Neon");

    let (status, _) = send_raw(h.addr, "DELETE", &format!("/v1/orders/{id}"), None).await;
    assert_eq!(status, 204);
    let (status, body) = send_raw(h.addr, "GET", "/v1/orders", None).await;
    assert_eq!(status, 200);
    assert_eq!(body.trim(), "[]");
}

#[tokio::test]
async fn errors_use_the_json_envelope() {
    let h = boot(FakeChatGateway::connected()).await;
    let id = seed(&h, &draft("2509TEST0002", "bia", 5)).await;

    // PENDING cannot jump straight to PRODUCTION.
    let (status, body) = send_raw(
        h.addr,
        "PATCH",
        &format!("/v1/orders/{id}"),
        Some(r#"{"art_status":"PRODUCTION"}"#),
    )
    .await;
    assert_eq!(status, 400);
    let envelope: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(envelope["error"]["code"], "validation_failed");
    assert!(envelope["error"]["message"]
        .as_str()
        .expect("message")
        .contains("not allowed"));

    let (status, body) = send_raw(
        h.addr,
        "PATCH",
        &format!("/v1/orders/{}", Uuid::new_v4()),
        Some(r#"{"is_urgent":true}"#),
    )
    .await;
    assert_eq!(status, 404);
    let envelope: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(envelope["error"]["code"], "not_found");

    let (status, body) = send_raw(h.addr, "GET", "/v1/orders?status=BOGUS", None).await;
    assert_eq!(status, 400);
    let envelope: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(envelope["error"]["code"], "validation_failed");
}

#[tokio::test]
async fn daily_queue_prefers_urgent_customers() {
    let h = boot(FakeChatGateway::connected()).await;
    // bia ships sooner, but ana has an active urgent order.
    let ana_urgent = seed(&h, &draft("2509QUEUE001", "ana", 6)).await;
    let ana_other = seed(&h, &draft("2509QUEUE002", "ana", 9)).await;
    let bia = seed(&h, &draft("2509QUEUE003", "bia", 2)).await;
    seed_patch(&h, ana_urgent, r#"{"is_urgent":true}"#).await;
    seed_patch(&h, ana_other, r#"{"art_group_id":7}"#).await;

    let (status, body) = send_raw(
        h.addr,
        "POST",
        "/v1/orders/daily-queue",
        Some(r#"{"count":2}"#),
    )
    .await;
    assert_eq!(status, 200);
    let queued: serde_json::Value = serde_json::from_str(&body).expect("queued json");
    let ids: Vec<String> = queued
        .as_array()
        .expect("array")
        .iter()
        .map(|o| o["id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids, vec![ana_urgent.to_string(), ana_other.to_string()]);

    let (status, body) = send_raw(h.addr, "GET", "/v1/orders?in_daily_queue=true", None).await;
    assert_eq!(status, 200);
    let listed: serde_json::Value = serde_json::from_str(&body).expect("listed json");
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
    assert!(!listed
        .as_array()
        .expect("array")
        .iter()
        .any(|o| o["id"] == bia.to_string().as_str()));

    let (status, _) = send_raw(h.addr, "DELETE", "/v1/orders/daily-queue", None).await;
    assert_eq!(status, 204);
    let (_, body) = send_raw(h.addr, "GET", "/v1/orders?in_daily_queue=true", None).await;
    assert_eq!(body.trim(), "[]");
}

#[tokio::test]
async fn send_painting_formats_and_delivers() {
    let h = boot(FakeChatGateway::connected()).await;
    let mut d = draft("2509PAINT001", "carla", 4);
    d.product_name =
        "Kit 1000 Copos 500ml Personalizados Descartável Degradê Para Festas Adegas Casamentos"
            .to_string();
    let id = seed(&h, &d).await;

    let (status, body) = send_raw(
        h.addr,
        "POST",
        "/v1/chat/send-painting",
        Some(&format!(
            r#"{{"order_ids":["{id}"],"group_id":"group-1"}}"#
        )),
    )
    .await;
    assert_eq!(status, 200);
    let report: serde_json::Value = serde_json::from_str(&body).expect("report json");
    assert_eq!(report["sent"], 1);

    let sent = h.chat.sent.lock().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        SentMessage::Text { group_id, message } => {
            assert_eq!(group_id, "group-1");
            assert!(message.starts_with("Pintar 1000 Copos 500ml Degradê sortidos"));
            assert!(message.contains("shopee"));
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn send_painting_rejects_when_bridge_is_down() {
    let h = boot(FakeChatGateway::default()).await;
    let id = seed(&h, &draft("2509PAINT002", "dora", 4)).await;

    let (status, body) = send_raw(
        h.addr,
        "POST",
        "/v1/chat/send-painting",
        Some(&format!(
            r#"{{"order_ids":["{id}"],"group_id":"group-1"}}"#
        )),
    )
    .await;
    assert_eq!(status, 503);
    let envelope: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(envelope["error"]["code"], "chat_unavailable");
    assert!(h.chat.sent.lock().await.is_empty());
}

#[tokio::test]
async fn chat_status_reports_qr_until_paired() {
    let h = boot(FakeChatGateway::default()).await;
    let (status, body) = send_raw(h.addr, "GET", "/v1/chat/status", None).await;
    assert_eq!(status, 200);
    let payload: serde_json::Value = serde_json::from_str(&body).expect("status json");
    assert_eq!(payload["connected"], false);
    assert!(payload["qr_code"].as_str().expect("qr").starts_with("data:image/png"));
}

#[tokio::test]
async fn asset_upload_then_delete_removes_the_stored_file() {
    let h = boot(FakeChatGateway::connected()).await;
    let id = seed(&h, &draft("2509ASSET001", "gabi", 5)).await;
    seed_patch(&h, id, r#"{"art_name":"Festa Neon"}"#).await;

    let (status, body) = send_multipart(
        h.addr,
        &format!("/v1/orders/{id}/assets"),
        "png",
        "download.png",
        b"png-bytes",
    )
    .await;
    assert_eq!(status, 200);
    let order: serde_json::Value = serde_json::from_str(&body).expect("order json");
    assert_eq!(
        order["art_png_url"],
        format!("/files/png/{id}/Festa Neon - shopee.png")
    );
    let stored = h
        ._tmp
        .path()
        .join("assets")
        .join("png")
        .join(id.to_string())
        .join("Festa Neon - shopee.png");
    assert_eq!(
        tokio::fs::read(&stored).await.expect("stored file"),
        b"png-bytes"
    );

    let (status, body) = send_raw(
        h.addr,
        "DELETE",
        &format!("/v1/orders/{id}/assets?kind=png"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let order: serde_json::Value = serde_json::from_str(&body).expect("order json");
    assert!(order["art_png_url"].is_null());
    assert!(!stored.exists());
}

#[tokio::test]
async fn staging_copies_name_variants_with_contiguous_prefixes() {
    let h = boot(FakeChatGateway::connected()).await;
    let arts = h.state.config.arts_dir.clone();
    tokio::fs::create_dir_all(&arts).await.expect("arts dir");
    for name in [
        "Festa Neon - shopee.png",
        "Festa Neon - shopee (2).png",
        "Festa Neon - shopee frente.cdr",
        "Outra Arte - shopee.png",
    ] {
        tokio::fs::write(arts.join(name), b"x").await.expect("seed art");
    }

    let (status, body) = send_raw(
        h.addr,
        "POST",
        "/v1/arts/stage",
        Some(r#"{"art_names":["Sem Arquivo","Festa Neon","Outra Arte"]}"#),
    )
    .await;
    assert_eq!(status, 200);
    let report: serde_json::Value = serde_json::from_str(&body).expect("report json");
    assert_eq!(report["not_found"], serde_json::json!(["Sem Arquivo"]));
    assert_eq!(report["copied"].as_array().map(Vec::len), Some(4));

    let mut staged: Vec<String> = std::fs::read_dir(&h.state.config.staging_dir)
        .expect("staging dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    staged.sort();
    // The art with no files does not consume a prefix number.
    assert_eq!(
        staged,
        vec![
            "1 - Festa Neon - shopee (2).png",
            "1 - Festa Neon - shopee frente.cdr",
            "1 - Festa Neon - shopee.png",
            "2 - Outra Arte - shopee.png",
        ]
    );
}

#[tokio::test]
async fn send_daily_sends_batch_then_painting_requests() {
    let h = boot(FakeChatGateway::connected()).await;
    let plain = seed(&h, &draft("2509DAILY001", "eva", 3)).await;
    let mut d = draft("2509DAILY002", "eva", 5);
    d.product_name =
        "Kit 1000 Copos 500ml Personalizados Descartável Degradê Para Festas Adegas Casamentos"
            .to_string();
    let painted = seed(&h, &d).await;
    seed_patch(&h, painted, r#"{"art_group_id":2}"#).await;
    h.state
        .store
        .lock()
        .await
        .set_daily_queue(&[plain, painted])
        .expect("queue");

    let (status, body) = send_raw(
        h.addr,
        "POST",
        "/v1/chat/send-daily",
        Some(r#"{"group_id":"group-1"}"#),
    )
    .await;
    assert_eq!(status, 200);
    let report: serde_json::Value = serde_json::from_str(&body).expect("report json");
    assert_eq!(report["sent"], 2);

    let sent = h.chat.sent.lock().await;
    assert_eq!(sent.len(), 2);
    match &sent[0] {
        SentMessage::Text { message, .. } => {
            assert!(message.starts_with("Fila do dia (2 pedidos):"));
        }
        other => panic!("unexpected message: {other:?}"),
    }
    match &sent[1] {
        SentMessage::Text { message, .. } => assert!(message.starts_with("Pintar")),
        other => panic!("unexpected message: {other:?}"),
    }
}
