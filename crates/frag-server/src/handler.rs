use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use frag_pipeline::WriteRequest;
use frag_types::DocumentId;
use tracing::{info, warn};

use crate::codec;
use crate::dto::{
    ErrorResponse, HealthResponse, ReadResponse, StatResponse, WriteBody, WriteResponse,
};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

fn parse_id(raw: String) -> ServerResult<DocumentId> {
    DocumentId::new(raw).map_err(|e| ServerError::BadRequest(e.to_string()))
}

/// `POST /write`: decode the chunks and run the write pipeline.
pub async fn write_handler(
    State(state): State<AppState>,
    body: Result<Json<WriteBody>, JsonRejection>,
) -> ServerResult<Json<WriteResponse>> {
    let Json(body) = body.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ServerError::TooLarge(e.body_text()),
        _ => ServerError::BadRequest(e.body_text()),
    })?;
    let doc_id = parse_id(body.doc_id)?;
    let chunks = codec::decode_chunks(&body.chunks_b64)?;
    let mut request = WriteRequest::new(doc_id, chunks);
    if let Some(mime) = body.mime {
        request = request.with_mime(mime);
    }
    let receipt = state.vault.write(request).await?;
    Ok(Json(receipt.into()))
}

/// `GET /read/:doc_id`: the document as UTF-8 text.
pub async fn read_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> ServerResult<Json<ReadResponse>> {
    let id = parse_id(doc_id)?;
    let document = state.vault.read(&id).await?;
    let text = match document.text() {
        Ok(t) => t.to_owned(),
        Err(_) => return Err(ServerError::NotText(id.into_inner())),
    };
    info!(doc_id = %id, bytes = document.len(), "document served");
    Ok(Json(ReadResponse { doc_id: id, text }))
}

/// `GET /raw/:doc_id`: the document bytes under their stored MIME type.
pub async fn raw_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> ServerResult<Response> {
    let id = parse_id(doc_id)?;
    let document = state.vault.read(&id).await?;
    let content_type = HeaderValue::from_str(&document.mime).unwrap_or_else(|_| {
        warn!(doc_id = %id, mime = %document.mime, "stored MIME type is not a valid header");
        HeaderValue::from_static("application/octet-stream")
    });
    Ok(([(header::CONTENT_TYPE, content_type)], document.bytes).into_response())
}

/// `GET /stat/:doc_id`: the index row only.
pub async fn stat_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> ServerResult<Json<StatResponse>> {
    let id = parse_id(doc_id)?;
    let record = state.vault.stat(&id).await?;
    Ok(Json(record.into()))
}

/// Liveness.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness: the index must answer.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    match state.vault.ping().await {
        Ok(()) => Json(HealthResponse::ok()).into_response(),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            let body = ErrorResponse {
                status: "unavailable".into(),
                error: e.to_string(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}
