use std::sync::Arc;

use serde_json::Value;
use timetravel::{http, InMemoryVersionStore, RecordService, VersionStore};

/// Bind to port 0 and return the base URL.
pub async fn start_server<S: VersionStore + 'static>(service: Arc<RecordService<S>>) -> String {
    let app = http::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn start_in_memory() -> String {
    start_server(Arc::new(RecordService::new(InMemoryVersionStore::new()))).await
}

pub async fn get(base: &str, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("{base}{path}")).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

pub async fn post(base: &str, path: &str, body: &str) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}
