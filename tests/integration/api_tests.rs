//! API integration tests for the gallery endpoints.
//!
//! Tests verify:
//! - Submitting doodles and seeing them in the gallery
//! - Validation happens before any store call
//! - Delete semantics (not found, idempotence, duplicate names)
//! - Upstream failures map to 500 and the server keeps serving

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use doodle_gallery::{create_router, GalleryService, RouterConfig};

use super::test_utils::{
    body_json, body_string, delete_request, get_request, is_timestamp_name, submit_request,
    MockBlobStore,
};

const FOLDER: &str = "folder-1";

fn router(store: &MockBlobStore) -> axum::Router {
    let gallery = GalleryService::new(store.clone(), FOLDER);
    create_router(gallery, RouterConfig::default().with_tracing(false))
}

// =============================================================================
// Submit
// =============================================================================

#[tokio::test]
async fn test_submit_then_gallery_shows_card() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let response = app
        .clone()
        .oneshot(submit_request(
            json!({"imageData": "data:image/png;base64,AAAA"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Saved and uploaded successfully!");
    let link = body["driveLink"].as_str().unwrap().to_string();

    let objects = store.objects();
    assert_eq!(objects.len(), 1);
    assert!(is_timestamp_name(&objects[0].name), "{}", objects[0].name);
    assert_eq!(objects[0].view_link, link);

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(&format!("src=\"{}\"", link)));
    assert!(html.contains(&format!("alt=\"{}\"", objects[0].name)));
    assert!(!html.contains("No doodles yet!"));
}

#[tokio::test]
async fn test_submit_store_receives_decoded_bytes() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let response = app
        .oneshot(submit_request(
            json!({"imageData": "data:image/png;base64,AAAA"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let uploads = store.uploads();
    assert_eq!(uploads.len(), 1);
    let (metadata, bytes) = &uploads[0];
    assert_eq!(&bytes[..], &[0u8, 0, 0]);
    assert_eq!(metadata.parents, vec![FOLDER.to_string()]);
    assert_eq!(metadata.mime_type, "image/png");
}

#[tokio::test]
async fn test_submit_missing_image_data() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let response = app.oneshot(submit_request(json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_request");
    assert_eq!(body["status"], 400);
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_submit_empty_or_invalid_image_data() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let response = app
        .clone()
        .oneshot(submit_request(json!({"imageData": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(submit_request(
            json!({"imageData": "data:image/png;base64,!!!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_submit_without_json_payload() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let requests = [
        // No content type, no body
        Request::builder()
            .method("POST")
            .uri("/submit")
            .body(Body::empty())
            .unwrap(),
        // JSON content type, empty body
        Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "application/json")
            .body(Body::empty())
            .unwrap(),
        // Not JSON at all
        Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "text/plain")
            .body(Body::from("data:image/png;base64,AAAA"))
            .unwrap(),
    ];

    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_request");
        assert_eq!(body["message"], "Missing imageData");
    }

    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_submit_malformed_json_body() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let mistyped = app
        .clone()
        .oneshot(submit_request(json!({"imageData": 5})))
        .await
        .unwrap();
    assert_eq!(mistyped.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(mistyped).await["error"], "invalid_request");

    let truncated = Request::builder()
        .method("POST")
        .uri("/submit")
        .header("content-type", "application/json")
        .body(Body::from("{\"imageData\":"))
        .unwrap();
    let response = app.oneshot(truncated).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);

    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_submit_upstream_failure() {
    let store = MockBlobStore::new();
    store.set_failing(true);
    let app = router(&store);

    let response = app
        .oneshot(submit_request(json!({"imageData": "AAAA"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], "upstream_error");
    // Store internals are not leaked to the client
    assert!(!body["message"]
        .as_str()
        .unwrap()
        .contains("backend unavailable"));
    assert_eq!(store.create_calls(), 1);
}

#[tokio::test]
async fn test_submit_body_limit() {
    let store = MockBlobStore::new();
    let gallery = GalleryService::new(store.clone(), FOLDER);
    let app = create_router(
        gallery,
        RouterConfig::default()
            .with_body_limit(64)
            .with_tracing(false),
    );

    let big = "A".repeat(1024);
    let response = app
        .oneshot(submit_request(json!({ "imageData": big })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(store.total_calls(), 0);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_existing() {
    let store = MockBlobStore::new().with_object("a", "doodle-1.png");
    let app = router(&store);

    let response = app
        .oneshot(delete_request("/delete/doodle-1.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Deleted successfully!");
    assert!(store.objects().is_empty());
}

#[tokio::test]
async fn test_delete_not_found() {
    let store = MockBlobStore::new().with_object("a", "doodle-1.png");
    let app = router(&store);

    let response = app
        .oneshot(delete_request("/delete/doodle-2.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.delete_calls(), 0);
    assert_eq!(store.objects().len(), 1);
}

#[tokio::test]
async fn test_delete_rejects_bad_names_before_store() {
    let store = MockBlobStore::new();
    let app = router(&store);

    for uri in [
        "/delete/doodle-1.jpg",
        "/delete/..doodle.png",
        "/delete/..%2Fsecret.png",
        "/delete/doodle-1",
    ] {
        let response = app.clone().oneshot(delete_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body_string(response).await, "Invalid filename");
    }

    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_delete_twice() {
    let store = MockBlobStore::new().with_object("a", "doodle-1.png");
    let app = router(&store);

    let first = app
        .clone()
        .oneshot(delete_request("/delete/doodle-1.png"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(delete_request("/delete/doodle-1.png"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.delete_calls(), 1);
}

#[tokio::test]
async fn test_delete_duplicate_name_removes_oldest() {
    let store = MockBlobStore::new()
        .with_object("older", "doodle-1.png")
        .with_object("newer", "doodle-1.png");
    let app = router(&store);

    let response = app
        .oneshot(delete_request("/delete/doodle-1.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let remaining = store.objects();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "newer");
}

#[tokio::test]
async fn test_delete_upstream_failure() {
    let store = MockBlobStore::new().with_object("a", "doodle-1.png");
    store.set_failing(true);
    let app = router(&store);

    let response = app
        .oneshot(delete_request("/delete/doodle-1.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Failed to delete doodle");
}

// =============================================================================
// Gallery
// =============================================================================

#[tokio::test]
async fn test_gallery_empty_folder() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_string(response).await;
    assert!(html.contains("No doodles yet!"));
    assert_eq!(html.matches("class=\"card\"").count(), 0);
}

#[tokio::test]
async fn test_gallery_skips_non_png_objects() {
    let store = MockBlobStore::new()
        .with_object("a", "doodle-1.png")
        .with_object("b", "readme.txt")
        .with_object("c", "doodle-2.png");
    let app = router(&store);

    let html = body_string(app.oneshot(get_request("/")).await.unwrap()).await;
    assert_eq!(html.matches("class=\"card\"").count(), 2);
    assert!(!html.contains("readme.txt"));
}

#[tokio::test]
async fn test_gallery_requeries_every_time() {
    let store = MockBlobStore::new();
    let app = router(&store);

    let _ = app.clone().oneshot(get_request("/")).await.unwrap();
    let _ = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn test_gallery_upstream_failure_then_recovery() {
    let store = MockBlobStore::new().with_object("a", "doodle-1.png");
    store.set_failing(true);
    let app = router(&store);

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Failed to fetch doodles");

    store.set_failing(false);
    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Misc Endpoints
// =============================================================================

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = router(&MockBlobStore::new());
    let response = app.oneshot(get_request("/test")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Server is alive!");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = router(&MockBlobStore::new());
    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_draw_page() {
    let store = MockBlobStore::new();
    let app = router(&store);
    let response = app.oneshot(get_request("/draw")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("<canvas"));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_cors_preflight_allows_delete() {
    let app = router(&MockBlobStore::new());
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/delete/doodle-1.png")
        .header("origin", "https://example.com")
        .header("access-control-request-method", "DELETE")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
