//! Share creation, viewing, download, and owner deletion handlers.

use axum::Json;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;

use ziply_core::error::AppError;
use ziply_entity::share::{CreatedShare, DownloadLink, ShareView, UploadGrant};
use ziply_service::share::{CreateShareInput, FileSource, InlineFile};

use crate::dto::request::{CreateShareRequest, DeleteShareRequest, UploadUrlRequest, parse_flag};
use crate::dto::response::MessageResponse;
use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /api/share/upload-url
pub async fn request_upload_url(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UploadUrlRequest>,
) -> ApiResult<Json<UploadGrant>> {
    let grant = state
        .share_service
        .request_upload_grant(&req.file_name, &req.file_type)
        .await?;
    Ok(Json(grant))
}

/// POST /api/share
///
/// Accepts either a JSON body (text, link, or a file uploaded through an
/// upload grant) or `multipart/form-data` carrying the file bytes.
pub async fn create_share(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<(StatusCode, Json<CreatedShare>)> {
    let input = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e.body_text())))?;
        read_multipart(multipart).await?
    } else {
        let ApiJson(req) = ApiJson::<CreateShareRequest>::from_request(request, &state).await?;
        req.into_input()
    };

    let created = state.share_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/share/{id}
pub async fn get_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ShareView>> {
    let view = state.access_service.get(&id).await?;
    Ok(Json(view))
}

/// GET /api/share/download/{id}
pub async fn download_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DownloadLink>> {
    let link = state.access_service.get_download_url(&id).await?;
    Ok(Json(link))
}

/// DELETE /api/share/{id}
pub async fn delete_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<DeleteShareRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.share_service.delete(&id, &req.owner_key).await?;
    Ok(Json(MessageResponse::new("Share deleted")))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("multipart/form-data"))
}

/// Collect the form fields of a server-mediated upload.
async fn read_multipart(mut multipart: Multipart) -> Result<CreateShareInput, AppError> {
    let mut input = CreateShareInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {}", e.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("file").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {}", e.body_text())))?;
            input.file = Some(FileSource::Inline(InlineFile {
                file_name,
                content_type,
                data,
            }));
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {}", e.body_text())))?;
        match name.as_str() {
            "type" => input.kind = Some(text),
            "content" => input.content = Some(text),
            "duration" => input.duration = Some(text),
            "burnOnRead" => input.burn_on_read = parse_flag(&text),
            "shortId" if !text.is_empty() => input.short_id = Some(text),
            _ => {}
        }
    }

    Ok(input)
}
