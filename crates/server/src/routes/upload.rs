use actix_multipart::Multipart;
use actix_web::web::Bytes;
use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use futures_util::{pin_mut, Stream, StreamExt};
use std::fmt::Display;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::file_handler::{check_file_size, validate_file_type};
use crate::state::AppState;
use crate::types::UploadResponse;

pub const UPLOAD_FAILED: &str = "Error saving uploaded file.";

/// Store one file from the multipart field `file`
#[post("/upload-file")]
pub async fn upload_file(
    mut payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    while let Some(field) = payload.next().await {
        let field =
            field.map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?;

        let content_disposition = field.content_disposition();
        if content_disposition.get_name() != Some("file") {
            continue;
        }

        let filename = content_disposition
            .get_filename()
            .unwrap_or_default()
            .to_string();

        let extension = validate_file_type(&filename, &state.config.allowed_extensions)
            .map_err(|e| ApiError::from_service(e, UPLOAD_FAILED))?;

        // The client filename never reaches the filesystem
        let stored_as = format!("{}{}", Uuid::new_v4(), extension);
        let filepath = state.config.upload_dir.join(&stored_as);

        let size = store_upload(field, &filepath, state.config.max_upload_bytes).await?;

        info!("Stored upload {} as {} ({} bytes)", filename, stored_as, size);

        return Ok(HttpResponse::Ok().json(UploadResponse {
            message: format!("File '{}' uploaded successfully.", filename),
            filename,
            stored_as,
            size,
            uploaded_at: Utc::now(),
        }));
    }

    Err(ApiError::bad_request("No file uploaded."))
}

/// Stream `chunks` into `path`, returning the byte count
///
/// Nothing is left at `path` when any step fails.
async fn store_upload<S, E>(chunks: S, path: &Path, max_bytes: u64) -> Result<u64, ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    let result = write_chunks(chunks, path, max_bytes).await;
    if result.is_err() {
        discard(path).await;
    }
    result
}

async fn write_chunks<S, E>(chunks: S, path: &Path, max_bytes: u64) -> Result<u64, ApiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    pin_mut!(chunks);

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| ApiError::from_service(e.into(), UPLOAD_FAILED))?;

    let mut size: u64 = 0;
    while let Some(chunk) = chunks.next().await {
        let data = chunk.map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?;

        size += data.len() as u64;
        check_file_size(size, max_bytes).map_err(|e| ApiError::from_service(e, UPLOAD_FAILED))?;

        file.write_all(&data)
            .await
            .map_err(|e| ApiError::from_service(e.into(), UPLOAD_FAILED))?;
    }

    file.flush()
        .await
        .map_err(|e| ApiError::from_service(e.into(), UPLOAD_FAILED))?;

    Ok(size)
}

/// Remove a partially written upload
async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial upload {}: {}", path.display(), e),
    }
}
