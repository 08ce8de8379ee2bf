//! Integration tests for the HTTP front end
//!
//! Requests go straight into the router, no socket is bound.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use virtual_n5::{server, DatasetConfig, VirtualVolume};

fn test_router() -> Router {
    let volume = VirtualVolume::new(&DatasetConfig::default()).unwrap();
    server::router(Arc::new(volume))
}

async fn get(uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = test_router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_top_level_attributes() {
    let (status, content_type, body) = get("/attributes.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(doc["axes"], serde_json::json!(["x", "y", "z", "c"]));
    assert_eq!(doc["scales"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_scale_attributes() {
    let (status, _, body) = get("/s9/attributes.json").await;
    assert_eq!(status, StatusCode::OK);

    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(doc["dimensions"], serde_json::json!([19, 29, 39, 3]));
    assert_eq!(doc["dataType"], "float32");
    assert_eq!(doc["blockSize"], serde_json::json!([128, 96, 64, 3]));
}

#[tokio::test]
async fn test_scale_out_of_range_is_client_error() {
    let (status, _, body) = get("/s10/attributes.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8(body).unwrap().contains("Invalid scale 10"));

    let (status, _, _) = get("/s10/0/0/0/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_scale_dir() {
    let (status, _, _) = get("/scale0/attributes.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chunk() {
    let (status, content_type, body) = get("/s0/0/0/0/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/octet-stream"));

    let volume = VirtualVolume::new(&DatasetConfig::default()).unwrap();
    let block: ndarray::Array4<f32> = volume.codec().decode(&body).unwrap();
    assert_eq!(block.shape(), &[128, 96, 64, 3]);
    assert_eq!(block[[0, 0, 0, 0]], 0.0);
}

#[tokio::test]
async fn test_chunk_rejects_channel_group() {
    let (status, _, body) = get("/s0/0/0/0/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("channel group"));
}

#[tokio::test]
async fn test_chunk_rejects_negative_index() {
    let (status, _, _) = get("/s0/-1/0/0/0").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_cors_header() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/attributes.json")
                .header(header::ORIGIN, "https://neuroglancer-demo.appspot.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
