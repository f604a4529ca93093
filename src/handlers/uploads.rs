use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::inventory_receipt;
use crate::errors::ServiceError;
use crate::handlers::items::ItemResponse;
use crate::services::inventory::{ReceiptUpload, UpdateItemInput};
use crate::AppState;

const PHOTO_FIELD: &str = "photo";
const RECEIPTS_FIELD: &str = "receipts";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub id: i32,
    pub item_id: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<inventory_receipt::Model> for ReceiptResponse {
    fn from(m: inventory_receipt::Model) -> Self {
        Self {
            id: m.id,
            item_id: m.item_id,
            filename: m.filename,
            original_name: m.original_name,
            mime_type: m.mime_type,
            size_bytes: m.size_bytes,
            uploaded_at: m.uploaded_at,
        }
    }
}

fn photo_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Upload or replace an item's photo (multipart field "photo", image types
/// only). The stored filename is a fresh UUID; a replaced photo file is
/// removed best-effort once the record points at the new one.
#[utoipa::path(
    post,
    path = "/api/v1/items/{itemId}/photo",
    params(("itemId" = String, Path, description = "Caller-assigned item key")),
    responses(
        (status = 200, description = "Photo stored and item updated", body = ItemResponse),
        (status = 400, description = "No usable photo in the request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "uploads"
)]
pub async fn upload_item_photo(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let inventory = &state.services.inventory;
    let existing = inventory
        .get_item(&item_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Item with ID \"{}\" not found", item_id)))?;
    let previous_photo = existing.photo_filename;

    let max_bytes = state.config.max_upload_bytes();
    let mut stored: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::UploadError(format!("Malformed multipart request: {}", e)))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let ext = photo_extension(&content_type).ok_or_else(|| {
            ServiceError::UploadError(format!(
                "Unsupported photo content type \"{}\"",
                content_type
            ))
        })?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::UploadError(format!("Failed to read photo: {}", e)))?;
        if bytes.len() > max_bytes {
            return Err(ServiceError::UploadError(format!(
                "Photo exceeds the {} MB limit",
                state.config.max_upload_size_mb
            )));
        }

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let dir = inventory.photos_dir();
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), &bytes).await?;
        info!(%item_id, %filename, size = bytes.len(), "photo stored");

        stored = Some(filename);
        break;
    }

    let filename = stored.ok_or_else(|| {
        ServiceError::UploadError("No photo uploaded or processing failed".to_string())
    })?;

    let item = inventory
        .update_item(
            &item_id,
            UpdateItemInput {
                photo_filename: Some(filename),
                ..Default::default()
            },
        )
        .await?;

    if let Some(old) = previous_photo {
        let path = inventory.photos_dir().join(&old);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), "failed to remove replaced photo: {}", e);
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "Photo updated successfully",
        "data": ItemResponse::from(item),
    })))
}

/// Upload one or more PDF receipts (multipart field "receipts").
#[utoipa::path(
    post,
    path = "/api/v1/items/{itemId}/receipts",
    params(("itemId" = String, Path, description = "Caller-assigned item key")),
    responses(
        (status = 201, description = "Receipts stored; metadata returned"),
        (status = 400, description = "No usable receipts in the request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "uploads"
)]
pub async fn upload_item_receipts(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let inventory = &state.services.inventory;
    inventory
        .get_item(&item_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Item with ID \"{}\" not found", item_id)))?;

    let max_bytes = state.config.max_upload_bytes();
    let max_files = state.config.max_receipt_files;
    let dir = inventory.receipts_dir();
    tokio::fs::create_dir_all(&dir).await?;

    let mut uploads: Vec<ReceiptUpload> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::UploadError(format!("Malformed multipart request: {}", e)))?
    {
        if field.name() != Some(RECEIPTS_FIELD) {
            continue;
        }
        if uploads.len() >= max_files {
            return Err(ServiceError::UploadError(format!(
                "At most {} receipt files per request",
                max_files
            )));
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if content_type != "application/pdf" {
            return Err(ServiceError::UploadError(format!(
                "Receipts must be PDF files, got \"{}\"",
                content_type
            )));
        }
        let original_name = field
            .file_name()
            .map(str::to_owned)
            .unwrap_or_else(|| "receipt.pdf".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::UploadError(format!("Failed to read receipt: {}", e)))?;
        if bytes.len() > max_bytes {
            return Err(ServiceError::UploadError(format!(
                "Receipt \"{}\" exceeds the {} MB limit",
                original_name, state.config.max_upload_size_mb
            )));
        }

        let filename = format!("{}.pdf", Uuid::new_v4());
        tokio::fs::write(dir.join(&filename), &bytes).await?;
        info!(%item_id, %filename, size = bytes.len(), "receipt stored");

        uploads.push(ReceiptUpload {
            filename,
            original_name,
            mime_type: content_type,
            size_bytes: bytes.len() as i64,
        });
    }

    if uploads.is_empty() {
        return Err(ServiceError::UploadError(
            "No receipt files uploaded".to_string(),
        ));
    }

    let saved: Vec<ReceiptResponse> = inventory
        .save_receipts(&item_id, uploads)
        .await?
        .into_iter()
        .map(ReceiptResponse::from)
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("{} receipt(s) uploaded", saved.len()),
            "data": saved,
        })),
    ))
}

/// List receipt metadata for an item, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/items/{itemId}/receipts",
    params(("itemId" = String, Path, description = "Caller-assigned item key")),
    responses(
        (status = 200, description = "Receipt metadata returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "uploads"
)]
pub async fn list_item_receipts(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let inventory = &state.services.inventory;
    inventory
        .get_item(&item_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Item with ID \"{}\" not found", item_id)))?;

    let receipts: Vec<ReceiptResponse> = inventory
        .receipts_for_item(&item_id)
        .await?
        .into_iter()
        .map(ReceiptResponse::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": receipts,
    })))
}
