//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{DownloadQuery, ErrorResponse, HealthResponse, ListQuery, ListResponse, UploadResponse},
    ServiceError,
};
use tracing::warn;

use super::state::AppState;

/// Response header naming the mode a downloaded object was stored under.
pub const ENCRYPTION_MODE_HEADER: HeaderName = HeaderName::from_static("x-encryption-mode");

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err))).into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    error_response(ServiceError::BadRequest(message.into()))
}

/// Fields collected from an upload form.
#[derive(Default)]
struct UploadForm {
    method: Option<String>,
    key_id: Option<String>,
    file_name: Option<String>,
    file: Option<Vec<u8>>,
}

/// `POST /upload`: protect and store an uploaded file.
///
/// Multipart fields: `method` (`caller`/`customer` or `provider`/`sse-kms`),
/// `file`, and an optional `key_id` overriding the configured provider key.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut form = UploadForm::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                let status = e.status();
                let err = ErrorResponse::new("bad_request", e.body_text());
                return (status, Json(err)).into_response();
            }
        };
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(str::to_owned);
                match field.bytes().await {
                    Ok(bytes) => form.file = Some(bytes.to_vec()),
                    Err(e) => {
                        let status = e.status();
                        let err = ErrorResponse::new("bad_request", e.body_text());
                        return (status, Json(err)).into_response();
                    }
                }
            }
            "method" | "key_id" => {
                let value = match field.text().await {
                    Ok(v) => v,
                    Err(e) => return bad_request(e.body_text()),
                };
                if name == "method" {
                    form.method = Some(value);
                } else {
                    form.key_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let Some(data) = form.file else {
        return bad_request("file required");
    };
    let file_name = form.file_name.unwrap_or_default();
    let method = form.method.unwrap_or_default();

    let receipt = match state
        .vault
        .upload(&file_name, data, &method, form.key_id.as_deref())
        .await
    {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, method = %method, "upload rejected");
            return error_response(e.into());
        }
    };

    let body = UploadResponse {
        location: format!("s3://{}/{}", state.bucket, receipt.storage_key),
        storage_key: receipt.storage_key,
        mode: receipt.mode.label().into(),
        original_name: receipt.original_name,
        size: receipt.size,
        ciphertext_preview: receipt.ciphertext_preview,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// `GET /download?key=<storage_key>`: fetch an object and return its plaintext.
pub async fn download(State(state): State<AppState>, Query(q): Query<DownloadQuery>) -> Response {
    if q.key.trim().is_empty() {
        return bad_request("key required");
    }

    let object = match state.vault.download(&q.key).await {
        Ok(o) => o,
        Err(e) => return error_response(e.into()),
    };

    let file_name: String = object
        .name
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
            (ENCRYPTION_MODE_HEADER, object.mode.label().to_owned()),
        ],
        object.plaintext,
    )
        .into_response()
}

/// `GET /list?prefix=<p>&max=<n>`: list storage keys under a prefix.
pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Response {
    let max = q
        .max
        .unwrap_or(state.list_max_keys)
        .clamp(1, state.list_max_keys);

    match state.vault.list(&q.prefix, max).await {
        Ok(keys) => {
            let body = ListResponse {
                prefix: q.prefix,
                keys,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// `GET /health`: liveness check.
///
/// The process refuses to start without a valid key, so a running server
/// always reports the key as loaded.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        key_loaded: true,
        bucket: state.bucket.as_str().to_owned(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}
