use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{inventory_history, inventory_item, ItemStatus};
use crate::errors::ServiceError;
use crate::AppState;

/// API shape of an inventory item (camelCase, status as its display string).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i32,
    pub item_id: String,
    pub item_name: String,
    pub serial_number: Option<String>,
    pub photo_filename: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub checked_out_by: Option<String>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub last_action_by: Option<String>,
}

impl From<inventory_item::Model> for ItemResponse {
    fn from(m: inventory_item::Model) -> Self {
        Self {
            id: m.id,
            item_id: m.item_id,
            item_name: m.item_name,
            serial_number: m.serial_number,
            photo_filename: m.photo_filename,
            status: m.status.as_str().to_string(),
            created_at: m.created_at,
            updated_at: m.updated_at,
            checked_out_by: m.checked_out_by,
            checked_out_at: m.checked_out_at,
            last_action_by: m.last_action_by,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: i32,
    pub item_id: String,
    pub action: String,
    pub user_id: Option<String>,
    pub serial_number: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<inventory_history::Model> for HistoryEntryResponse {
    fn from(m: inventory_history::Model) -> Self {
        let action = match m.action {
            crate::entities::HistoryAction::Created => "created",
            crate::entities::HistoryAction::Checkin => "checkin",
            crate::entities::HistoryAction::Checkout => "checkout",
        };
        Self {
            id: m.id,
            item_id: m.item_id,
            action: action.to_string(),
            user_id: m.user_id,
            serial_number: m.serial_number,
            timestamp: m.timestamp,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1))]
    pub item_id: String,
    #[validate(length(min = 1))]
    pub item_name: String,
    #[serde(default)]
    pub serial_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListItemsQuery {
    /// Matches item id, name, or serial number
    pub search: Option<String>,
    /// "Available" or "Checked Out"
    pub status: Option<String>,
}

/// List items with optional search and status filtering.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(ListItemsQuery),
    responses(
        (status = 200, description = "Item list with aggregate stats"),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(ItemStatus::parse(raw).ok_or_else(|| {
            ServiceError::InvalidInput(format!(
                "Invalid status filter \"{}\"; expected \"Available\" or \"Checked Out\"",
                raw
            ))
        })?),
    };

    let inventory = &state.services.inventory;
    let items = inventory.list_items(query.search.as_deref(), status).await?;
    let stats = inventory.stats().await?;

    let items: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
    let count = items.len();

    Ok(Json(json!({
        "success": true,
        "data": {
            "items": items,
            "stats": stats,
            "count": count,
        }
    })))
}

/// Fetch one item by its caller-assigned key.
#[utoipa::path(
    get,
    path = "/api/v1/items/{itemId}",
    params(("itemId" = String, Path, description = "Caller-assigned item key")),
    responses(
        (status = 200, description = "Item returned", body = ItemResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .inventory
        .get_item(&item_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Item with ID \"{}\" not found", item_id)))?;

    Ok(Json(json!({
        "success": true,
        "data": ItemResponse::from(item),
    })))
}

/// Create a new item (status starts as Available).
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item key already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;

    let item = state
        .services
        .inventory
        .create_item(crate::services::inventory::CreateItemInput {
            item_id: payload.item_id,
            item_name: payload.item_name,
            serial_number: payload.serial_number,
        })
        .await?;

    let message = format!("Item \"{}\" created successfully", item.item_id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": message,
            "data": ItemResponse::from(item),
        })),
    ))
}

/// Edit an item's descriptive fields (never status or checkout fields).
#[utoipa::path(
    put,
    path = "/api/v1/items/{itemId}",
    params(("itemId" = String, Path, description = "Caller-assigned item key")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .inventory
        .update_item(
            &item_id,
            crate::services::inventory::UpdateItemInput {
                item_name: payload.item_name,
                serial_number: payload.serial_number,
                photo_filename: None,
            },
        )
        .await?;

    let message = format!("Item \"{}\" updated successfully", item.item_id);
    Ok(Json(json!({
        "success": true,
        "message": message,
        "data": ItemResponse::from(item),
    })))
}

/// Delete an item and everything attached to it.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{itemId}",
    params(("itemId" = String, Path, description = "Caller-assigned item key")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.inventory.delete_item(&item_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Item \"{}\" deleted successfully", item_id),
    })))
}

/// Fetch an item together with its history log, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/items/{itemId}/history",
    params(("itemId" = String, Path, description = "Caller-assigned item key")),
    responses(
        (status = 200, description = "Item and its history"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item_history(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let inventory = &state.services.inventory;
    let item = inventory
        .get_item(&item_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Item with ID \"{}\" not found", item_id)))?;

    let history: Vec<HistoryEntryResponse> = inventory
        .item_history(&item_id)
        .await?
        .into_iter()
        .map(HistoryEntryResponse::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "item": ItemResponse::from(item),
            "history": history,
        }
    })))
}
