//! End-to-end scenarios across both API generations.

use serde_json::json;

use crate::support::{get, post, start_in_memory};

#[tokio::test]
async fn health_check() {
    let base = start_in_memory().await;
    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn create_delete_history_and_versions() {
    let base = start_in_memory().await;

    // create then read (v1)
    let (status, body) = post(&base, "/api/v1/records/7", r#"{"a":"1","b":"2"}"#).await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], 7);
    assert_eq!(body["data"], json!({ "a": "1", "b": "2" }));

    let (status, body) = get(&base, "/api/v1/records/7").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!({ "a": "1", "b": "2" }));

    // delete a field (v2)
    let (status, _) = post(&base, "/api/v2/records/7", r#"{"b":null,"c":"3"}"#).await;
    assert_eq!(status, 200);
    let (status, body) = get(&base, "/api/v2/records/7?versions=latest").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!({ "a": "1", "c": "3" }));

    // history
    let (status, body) = get(&base, "/api/v2/records/7?versions=all").await;
    assert_eq!(status, 200);
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["data"], json!({ "a": "1", "b": "2" }));
    assert_eq!(history[1]["data"], json!({ "a": "1", "c": "3" }));
    let v1 = history[0]["version"].as_i64().unwrap();
    let v2 = history[1]["version"].as_i64().unwrap();
    assert!(v1 < v2);

    // specific versions, in request order, with a placeholder
    let (status, body) = get(&base, &format!("/api/v2/records/7?versions={v2},{v1},9999")).await;
    assert_eq!(status, 200);
    let picked = body.as_array().unwrap();
    assert_eq!(picked.len(), 3);
    assert_eq!(picked[0]["version"], v2);
    assert_eq!(picked[0]["data"], json!({ "a": "1", "c": "3" }));
    assert_eq!(picked[1]["version"], v1);
    assert_eq!(picked[1]["data"], json!({ "a": "1", "b": "2" }));
    assert_eq!(picked[2], json!({ "id": 0, "version": 0, "data": {} }));
}

#[tokio::test]
async fn invalid_id() {
    let base = start_in_memory().await;
    for path in [
        "/api/v1/records/0",
        "/api/v1/records/-4",
        "/api/v1/records/abc",
        "/api/v2/records/0?versions=all",
    ] {
        let (status, body) = get(&base, path).await;
        assert_eq!(status, 400, "{path}");
        assert_eq!(
            body,
            json!({ "error": "invalid id; id must be a positive number" }),
            "{path}"
        );
    }

    let (status, body) = post(&base, "/api/v2/records/0", r#"{"a":"1"}"#).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid id; id must be a positive number");
}

#[tokio::test]
async fn missing_record() {
    let base = start_in_memory().await;

    let (status, body) = get(&base, "/api/v1/records/42").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "record of id 42 does not exist" }));

    let (status, body) = get(&base, "/api/v2/records/42?versions=latest").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "record of id 42 does not exist" }));

    let (status, body) = get(&base, "/api/v2/records/42?versions=all").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn v1_and_v2_share_history() {
    let base = start_in_memory().await;
    post(&base, "/api/v2/records/3", r#"{"a":"1"}"#).await;
    post(&base, "/api/v1/records/3", r#"{"b":"2"}"#).await;
    post(&base, "/api/v2/records/3", r#"{"a":null}"#).await;

    let (_, body) = get(&base, "/api/v1/records/3").await;
    assert_eq!(body["data"], json!({ "b": "2" }));

    let (_, body) = get(&base, "/api/v2/records/3?versions=all").await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}
