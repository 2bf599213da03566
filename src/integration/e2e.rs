//! End-to-end integration tests

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::integration::fixtures::{router_for, two_devices, MetaDir};

/// GET `uri`, returning status, content type and raw body
async fn get(app: Router, uri: &str) -> (StatusCode, String, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(app: Router, uri: &str) -> Value {
    let (status, content_type, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    serde_json::from_str(&body).unwrap()
}

/// Outer keys in the order they appear in the body
fn outer_keys(body: &str) -> Vec<i64> {
    body.lines()
        .filter(|l| l.starts_with("    \"") && !l.starts_with("     "))
        .filter_map(|l| l.trim().split('"').nth(1))
        .map(|k| k.parse().unwrap())
        .collect()
}

#[tokio::test]
async fn test_unfiltered_query() {
    let dir = two_devices();
    let (status, content_type, body) = get(dir.router(), "/files").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert_eq!(outer_keys(&body), vec![200, 100]);

    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        value,
        json!({"200": {"dev2": {"sub": "b"}}, "100": {"dev1": {"main": "a"}}})
    );
}

#[tokio::test]
async fn test_tend_filter() {
    let dir = two_devices();
    let value = get_json(dir.router(), "/files?tend=150").await;
    assert_eq!(value, json!({"100": {"dev1": {"main": "a"}}}));
}

#[tokio::test]
async fn test_nest_filter() {
    let dir = two_devices();
    let value = get_json(dir.router(), "/files?nest=dev2").await;
    assert_eq!(value, json!({"200": {"dev2": {"sub": "b"}}}));

    let value = get_json(dir.router(), "/files?nest=%20dev2%20").await;
    assert_eq!(value, json!({"200": {"dev2": {"sub": "b"}}}));
}

#[tokio::test]
async fn test_legacy_path() {
    let dir = two_devices();
    let value = get_json(dir.router(), "/files.php?tstart=150").await;
    assert_eq!(value, json!({"200": {"dev2": {"sub": "b"}}}));
}

#[tokio::test]
async fn test_zero_timestamp_never_appears() {
    let dir = two_devices();
    dir.write_record("zero", 0, "dev1", "main");

    for uri in ["/files", "/files?tstart=-10", "/files?nest=dev1", "/files?tend=0"] {
        let value = get_json(dir.router(), uri).await;
        assert!(value.get("0").is_none(), "uri {}", uri);
    }
}

#[tokio::test]
async fn test_invalid_files_are_skipped() {
    let dir = two_devices();
    dir.write_raw("garbage", "not json at all")
        .write_raw("partial", "{\"timestamp\": 300, \"did\": \"dev3\"")
        .write_raw("empty", "")
        .write_raw("list", "[1, 2, 3]")
        .write_raw("no_did", r#"{"timestamp":300,"stream_type":"main"}"#);

    let value = get_json(dir.router(), "/files").await;
    assert_eq!(
        value,
        json!({"200": {"dev2": {"sub": "b"}}, "100": {"dev1": {"main": "a"}}})
    );
}

#[tokio::test]
async fn test_combined_filters() {
    let dir = MetaDir::new();
    dir.write_record("a", 100, "dev1", "main")
        .write_record("b", 200, "dev1", "sub")
        .write_record("c", 200, "dev2", "main")
        .write_record("d", 300, "dev1", "main")
        .write_record("e", 400, "dev1", "main");

    let value = get_json(dir.router(), "/files?tstart=200&tend=300&nest=dev1").await;
    assert_eq!(
        value,
        json!({"300": {"dev1": {"main": "d"}}, "200": {"dev1": {"sub": "b"}}})
    );
}

#[tokio::test]
async fn test_recorder_layout() {
    let dir = MetaDir::new();
    dir.write_recording("20250101_120000", 1735732800, "nest1", "main")
        .write_recording("20250101_120005", 1735732805, "nest1", "sub");

    let value = get_json(dir.router(), "/files").await;
    assert_eq!(
        value,
        json!({
            "1735732805": {"nest1": {"sub": "detection_20250101_120005.mp4"}},
            "1735732800": {"nest1": {"main": "detection_20250101_120000.mp4"}},
        })
    );
}

#[tokio::test]
async fn test_empty_directory() {
    let dir = MetaDir::new();
    let (status, _, body) = get(dir.router(), "/files").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn test_missing_directory_ignores_filters() {
    let dir = MetaDir::new();
    let missing = dir.path().join("m3u8");

    for uri in ["/files", "/files?tstart=1&tend=2&nest=dev1"] {
        let (status, content_type, body) = get(router_for(missing.clone()), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, r#"{"error":"Directory not found"}"#);
    }
}

#[tokio::test]
async fn test_new_files_visible_on_next_query() {
    let dir = two_devices();
    let before = get_json(dir.router(), "/files").await;
    assert!(before.get("300").is_none());

    dir.write_record("c", 300, "dev3", "main");
    let after = get_json(dir.router(), "/files").await;
    assert_eq!(after["300"], json!({"dev3": {"main": "c"}}));
}

#[tokio::test]
async fn test_over_tcp() {
    let dir = two_devices();
    let app = dir.router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let response = reqwest::get(format!("http://{}/files?nest=dev1", addr))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );

    let value: Value = response.json().await.unwrap();
    assert_eq!(value, json!({"100": {"dev1": {"main": "a"}}}));
}
