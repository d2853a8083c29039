//! Signed blob access for the local storage provider.
//!
//! These routes are the targets of the URLs minted by
//! `LocalObjectStorage`. Every request is checked against its signature
//! before the filesystem is touched.

use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::StatusCode;
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::info;

use ziply_core::error::AppError;
use ziply_core::traits::ObjectStorage;
use ziply_storage::keys::sanitize_file_name;
use ziply_storage::providers::LocalObjectStorage;
use ziply_storage::providers::local::mime_from_key;

use crate::dto::request::BlobQuery;
use crate::dto::response::MessageResponse;
use crate::error::ApiResult;
use crate::extractors::BearerToken;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// GET /api/blobs/{*key}
///
/// Streams a blob. With `download` set the response is an attachment named
/// after it; otherwise only images are served inline.
pub async fn get_blob(
    State(state): State<AppState>,
    Path(key): Path<String>,
    query: Result<Query<BlobQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let local = local_provider(&state)?;
    let Query(query) = query.map_err(|_| AppError::forbidden("Missing or malformed signature"))?;

    let download = query.download.as_deref();
    local.verify(
        "GET",
        &key,
        query.expires,
        download.unwrap_or_default(),
        &query.signature,
    )?;

    let (file, len) = local.open(&key).await?;
    let mime = mime_from_key(&key);

    let disposition = match download {
        Some(name) => attachment(name),
        None if mime.starts_with("image/") => "inline".to_string(),
        None => attachment(&key),
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .header(header::CONTENT_LENGTH, len)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"))
        .header(header::CACHE_CONTROL, HeaderValue::from_static("private, no-store"))
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// PUT /api/blobs/{*key}
///
/// Accepts a direct upload authorized by an upload grant. The bearer token
/// must equal the URL signature, and the request content type must be the
/// one the grant was issued for.
pub async fn put_blob(
    State(state): State<AppState>,
    Path(key): Path<String>,
    query: Result<Query<BlobQuery>, QueryRejection>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let local = local_provider(&state)?;
    let Query(query) = query.map_err(|_| AppError::forbidden("Missing or malformed signature"))?;

    let signed_type = query.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
    local.verify("PUT", &key, query.expires, signed_type, &query.signature)?;

    if token != query.signature {
        return Err(AppError::forbidden("Upload token does not match").into());
    }

    let sent_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    if !sent_type.eq_ignore_ascii_case(signed_type) {
        return Err(AppError::forbidden("Content type does not match the upload grant").into());
    }

    let size = body.len();
    local.upload(&key, body, signed_type).await?;
    info!(key = %key, bytes = size, "Direct upload stored");

    Ok(Json(MessageResponse::new("Uploaded")))
}

fn local_provider(state: &AppState) -> Result<&Arc<LocalObjectStorage>, AppError> {
    state
        .storage
        .local()
        .ok_or_else(|| AppError::not_found("Blob routes are not served by this storage provider"))
}

fn attachment(name: &str) -> String {
    let fallback = sanitize_file_name(name);
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(name)
    )
}
