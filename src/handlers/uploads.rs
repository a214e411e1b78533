use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};

use crate::error::AppError;
use crate::schemas::UploadResponse;
use crate::services::uploads::public_url;
use crate::validation::MultipartForm;
use crate::AppState;

const FILE_FIELD: &str = "file";
const FORWARDED_PROTO: &str = "x-forwarded-proto";

#[utoipa::path(
    post,
    path = "/uploads",
    request_body(content = crate::schemas::UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part, or not a multipart body")
    ),
    tag = "Uploads"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    MultipartForm(mut multipart): MultipartForm,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let name = state.uploads.save(original_name.as_deref(), &bytes).await?;
        let origin = request_origin(state.config.public_base_url.as_deref(), &headers);
        return Ok(Json(UploadResponse {
            url: public_url(&origin, &name),
        }));
    }

    Err(AppError::BadRequest("No file received".to_string()))
}

/// Scheme and host the client used, unless a public base URL is configured.
pub fn request_origin(public_base_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}
