//! HTTP server for the frag chunk store.
//!
//! Exposes document writes and reads over JSON. Chunk bytes travel as
//! base64 and are decoded here before they reach the pipelines.

pub mod codec;
pub mod config;
pub mod dto;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{Limits, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::FragServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use frag_crypto::ContentHasher;
    use frag_types::ChunkKey;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn call_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = call(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_write(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/write")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(AppState::in_memory());
        let (status, body) = call_json(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn ready_endpoint() {
        let app = build_router(AppState::in_memory());
        let (status, _) = call(&app, get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn write_then_read_hello_world() {
        let app = build_router(AppState::in_memory());
        let (status, body) = call_json(
            &app,
            post_write(json!({"doc_id": "a", "chunks_b64": ["SGVsbG8sIA==", "V29ybGQh"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["doc_id"], "a");
        assert_eq!(body["full_hash"], ContentHasher::digest(b"Hello, World!").to_hex());
        assert_eq!(body["fragments"][0], ContentHasher::digest(b"Hello, ").to_hex());
        assert_eq!(body["fragments"][1], ContentHasher::digest(b"World!").to_hex());
        assert_eq!(body["chunks_written"], 2);

        let (status, body) = call_json(&app, get("/read/a")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"doc_id": "a", "text": "Hello, World!"}));
    }

    #[tokio::test]
    async fn rewrite_replaces_content() {
        let app = build_router(AppState::in_memory());
        call(&app, post_write(json!({"doc_id": "a", "chunks_b64": ["SGVsbG8sIA", "V29ybGQh"]}))).await;
        let (status, body) = call_json(
            &app,
            post_write(json!({"doc_id": "a", "chunks_b64": ["Qnll"], "mime": "text/markdown"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "updated");

        let (_, body) = call_json(&app, get("/read/a")).await;
        assert_eq!(body["text"], "Bye");

        let (status, stat) = call_json(&app, get("/stat/a")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stat["mime"], "text/markdown");
        assert_eq!(stat["fragments"].as_array().unwrap().len(), 1);
        assert!(stat["updated"].as_i64().unwrap() >= stat["created"].as_i64().unwrap());
    }

    #[tokio::test]
    async fn unknown_document_is_404() {
        let app = build_router(AppState::in_memory());
        let (status, body) = call_json(&app, get("/read/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(call(&app, get("/stat/nope")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(call(&app, get("/raw/nope")).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_base64_is_400_and_writes_nothing() {
        let state = AppState::in_memory();
        let app = build_router(state.clone());
        let (status, body) = call_json(
            &app,
            post_write(json!({"doc_id": "a", "chunks_b64": ["QQ==", "%%%"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("chunk 1"));
        assert_eq!(call(&app, get("/stat/a")).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_write_body_is_400_json() {
        let app = build_router(AppState::in_memory());
        let (status, body) = call_json(&app, post_write(json!({"doc_id": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().contains("chunks_b64"));

        let not_json = Request::builder()
            .method("POST")
            .uri("/write")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call_json(&app, not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn empty_id_and_empty_chunk_are_400() {
        let app = build_router(AppState::in_memory());
        let (status, _) = call(&app, post_write(json!({"doc_id": "", "chunks_b64": ["QQ=="]}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&app, post_write(json!({"doc_id": "a", "chunks_b64": [""]}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn binary_document_is_422_on_read_but_served_raw() {
        let app = build_router(AppState::in_memory());
        // 0xff 0xfe
        let (status, _) = call(
            &app,
            post_write(json!({"doc_id": "bin", "chunks_b64": ["//4="], "mime": "application/octet-stream"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, get("/read/bin")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let response = app.clone().oneshot(get("/raw/bin")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), &[0xff, 0xfe]);
    }

    #[tokio::test]
    async fn missing_chunk_is_500() {
        let state = AppState::in_memory();
        let app = build_router(state.clone());
        call(&app, post_write(json!({"doc_id": "a", "chunks_b64": ["QQ=="]}))).await;

        // Same index, empty chunk store.
        let empty_chunks = std::sync::Arc::new(frag_store::InMemoryChunkStore::new());
        let vault = frag_pipeline::ChunkVault::new(empty_chunks, state.vault.index().clone());
        let app = build_router(AppState::new(vault, Limits::default()));
        let (status, _) = call(&app, get("/read/a")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn shared_chunks_are_stored_once() {
        let state = AppState::in_memory();
        let app = build_router(state.clone());
        call(&app, post_write(json!({"doc_id": "a", "chunks_b64": ["c2hhcmVk", "QQ=="]}))).await;
        let (_, body) =
            call_json(&app, post_write(json!({"doc_id": "b", "chunks_b64": ["c2hhcmVk"]}))).await;
        assert_eq!(body["chunks_written"], 0);
        assert_eq!(body["chunks_skipped"], 1);

        let key = ChunkKey::for_digest(&ContentHasher::digest(b"shared"));
        assert!(state.vault.chunks().exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let state = AppState::in_memory();
        let state = AppState {
            limits: Limits { max_body_bytes: 64 },
            ..state
        };
        let app = build_router(state);
        let big = "QUFB".repeat(64);
        let (status, body) =
            call_json(&app, post_write(json!({"doc_id": "a", "chunks_b64": [big]}))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], "error");
    }
}
