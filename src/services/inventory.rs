//! CRUD facade over inventory items plus the peripheral read models
//! (history, receipts, stats, CSV export). Status and checkout fields are
//! never touched here; those belong to [`crate::services::checkout`].

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{inventory_history, inventory_item, inventory_receipt, HistoryAction, ItemStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Aggregate counts shown on the dashboard and in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: u64,
    pub available_items: u64,
    pub checked_out_items: u64,
}

/// Input for creating a new item.
#[derive(Debug, Clone)]
pub struct CreateItemInput {
    pub item_id: String,
    pub item_name: String,
    pub serial_number: Option<String>,
}

/// Partial edit of an item's descriptive fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
    pub item_name: Option<String>,
    pub serial_number: Option<String>,
    pub photo_filename: Option<String>,
}

impl UpdateItemInput {
    pub fn is_empty(&self) -> bool {
        self.item_name.is_none() && self.serial_number.is_none() && self.photo_filename.is_none()
    }
}

/// Metadata of one uploaded receipt file, recorded after the bytes hit disk.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

/// Service for managing inventory item records.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: EventSender,
    uploads_dir: PathBuf,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            event_sender,
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.uploads_dir.join("receipts")
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.uploads_dir.join("photos")
    }

    /// List items, optionally filtered by a search term (matched against item
    /// id, name, and serial number) and/or status, newest activity first.
    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        search: Option<&str>,
        status: Option<ItemStatus>,
    ) -> Result<Vec<inventory_item::Model>, ServiceError> {
        let mut query = inventory_item::Entity::find();

        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", term);
            query = query.filter(
                Condition::any()
                    .add(inventory_item::Column::ItemId.like(pattern.clone()))
                    .add(inventory_item::Column::ItemName.like(pattern.clone()))
                    .add(inventory_item::Column::SerialNumber.like(pattern)),
            );
        }
        if let Some(status) = status {
            query = query.filter(inventory_item::Column::Status.eq(status));
        }

        let items = query
            .order_by(inventory_item::Column::UpdatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await?;
        Ok(items)
    }

    /// Point lookup by the caller-assigned item key.
    pub async fn get_item(
        &self,
        item_id: &str,
    ) -> Result<Option<inventory_item::Model>, ServiceError> {
        let item_id = item_id.trim();
        if item_id.is_empty() {
            return Err(ServiceError::ValidationError(
                "Item ID is required".to_string(),
            ));
        }
        inventory_item::Entity::find()
            .filter(inventory_item::Column::ItemId.eq(item_id))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Create a new item in `Available` state. Rejects when the key already
    /// exists (idempotency guard, not an upsert). The insert and its
    /// `created` history entry commit together.
    #[instrument(skip(self), fields(item_id = %input.item_id))]
    pub async fn create_item(
        &self,
        input: CreateItemInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        let item_id = input.item_id.trim().to_owned();
        let item_name = input.item_name.trim().to_owned();
        if item_id.is_empty() || item_name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Item ID and Item Name are required".to_string(),
            ));
        }
        let serial_number = input
            .serial_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        if self.get_item(&item_id).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Item with ID \"{}\" already exists",
                item_id
            )));
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let item = inventory_item::ActiveModel {
            item_id: Set(item_id.clone()),
            item_name: Set(item_name),
            serial_number: Set(serial_number.clone()),
            photo_filename: Set(None),
            status: Set(ItemStatus::Available),
            created_at: Set(now),
            updated_at: Set(now),
            checked_out_by: Set(None),
            checked_out_at: Set(None),
            last_action_by: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        inventory_history::ActiveModel {
            item_id: Set(item_id.clone()),
            action: Set(HistoryAction::Created),
            user_id: Set(None),
            serial_number: Set(serial_number),
            timestamp: Set(now),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        if let Err(e) = self
            .event_sender
            .send(Event::ItemCreated {
                item_id: item_id.clone(),
            })
            .await
        {
            warn!("Failed to publish item.created event: {}", e);
        }
        info!(%item_id, "item created");

        Ok(item)
    }

    /// Edit descriptive fields only. Returns the updated record, or NotFound
    /// when the key is unknown.
    #[instrument(skip(self, updates))]
    pub async fn update_item(
        &self,
        item_id: &str,
        updates: UpdateItemInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        let existing = self
            .get_item(item_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item \"{}\" not found", item_id)))?;

        if updates.is_empty() {
            return Err(ServiceError::InvalidInput(
                "No updatable fields supplied".to_string(),
            ));
        }

        let mut model: inventory_item::ActiveModel = existing.into();
        if let Some(name) = updates.item_name {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(ServiceError::ValidationError(
                    "Item name cannot be empty".to_string(),
                ));
            }
            model.item_name = Set(name);
        }
        if let Some(serial) = updates.serial_number {
            let serial = serial.trim().to_owned();
            model.serial_number = Set(if serial.is_empty() { None } else { Some(serial) });
        }
        if let Some(photo) = updates.photo_filename {
            model.photo_filename = Set(Some(photo));
        }
        model.updated_at = Set(Utc::now());

        let item = model.update(self.db.as_ref()).await?;

        if let Err(e) = self
            .event_sender
            .send(Event::ItemUpdated {
                item_id: item.item_id.clone(),
            })
            .await
        {
            warn!("Failed to publish item.updated event: {}", e);
        }

        Ok(item)
    }

    /// Delete an item, cascading to its history and receipt metadata, then
    /// remove receipt and photo files from disk best-effort. Administrative
    /// operation with no undo.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: &str) -> Result<(), ServiceError> {
        let existing = self
            .get_item(item_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item \"{}\" not found", item_id)))?;

        let receipts = self.receipts_for_item(item_id).await?;

        let txn = self.db.begin().await?;
        inventory_receipt::Entity::delete_many()
            .filter(inventory_receipt::Column::ItemId.eq(item_id))
            .exec(&txn)
            .await?;
        inventory_history::Entity::delete_many()
            .filter(inventory_history::Column::ItemId.eq(item_id))
            .exec(&txn)
            .await?;
        inventory_item::Entity::delete_many()
            .filter(inventory_item::Column::ItemId.eq(item_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        // Files are removed only after the rows are gone; a leftover file is
        // harmless, a dangling row is not.
        for receipt in receipts {
            let path = self.receipts_dir().join(&receipt.filename);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), "failed to remove receipt file: {}", e);
            }
        }
        if let Some(photo) = existing.photo_filename {
            let path = self.photos_dir().join(&photo);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), "failed to remove photo file: {}", e);
            }
        }

        if let Err(e) = self
            .event_sender
            .send(Event::ItemDeleted {
                item_id: item_id.to_owned(),
            })
            .await
        {
            warn!("Failed to publish item.deleted event: {}", e);
        }
        info!(%item_id, "item deleted");

        Ok(())
    }

    /// Aggregate item counts by status.
    pub async fn stats(&self) -> Result<InventoryStats, ServiceError> {
        let db = self.db.as_ref();
        let total_items = inventory_item::Entity::find().count(db).await?;
        let available_items = inventory_item::Entity::find()
            .filter(inventory_item::Column::Status.eq(ItemStatus::Available))
            .count(db)
            .await?;
        let checked_out_items = inventory_item::Entity::find()
            .filter(inventory_item::Column::Status.eq(ItemStatus::CheckedOut))
            .count(db)
            .await?;

        Ok(InventoryStats {
            total_items,
            available_items,
            checked_out_items,
        })
    }

    /// History entries for one item, newest first.
    pub async fn item_history(
        &self,
        item_id: &str,
    ) -> Result<Vec<inventory_history::Model>, ServiceError> {
        let entries = inventory_history::Entity::find()
            .filter(inventory_history::Column::ItemId.eq(item_id))
            .order_by(inventory_history::Column::Timestamp, Order::Desc)
            .order_by(inventory_history::Column::Id, Order::Desc)
            .all(self.db.as_ref())
            .await?;
        Ok(entries)
    }

    /// Receipt metadata for one item, newest first.
    pub async fn receipts_for_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<inventory_receipt::Model>, ServiceError> {
        let receipts = inventory_receipt::Entity::find()
            .filter(inventory_receipt::Column::ItemId.eq(item_id))
            .order_by(inventory_receipt::Column::UploadedAt, Order::Desc)
            .order_by(inventory_receipt::Column::Id, Order::Desc)
            .all(self.db.as_ref())
            .await?;
        Ok(receipts)
    }

    /// Record metadata rows for receipt files already written to disk.
    #[instrument(skip(self, files))]
    pub async fn save_receipts(
        &self,
        item_id: &str,
        files: Vec<ReceiptUpload>,
    ) -> Result<Vec<inventory_receipt::Model>, ServiceError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let mut saved = Vec::with_capacity(files.len());
        for file in files {
            let row = inventory_receipt::ActiveModel {
                item_id: Set(item_id.to_owned()),
                filename: Set(file.filename),
                original_name: Set(file.original_name),
                mime_type: Set(file.mime_type),
                size_bytes: Set(file.size_bytes),
                uploaded_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            saved.push(row);
        }
        txn.commit().await?;

        Ok(saved)
    }

    /// Export all items as CSV, newest activity first.
    pub async fn export_csv(&self) -> Result<String, ServiceError> {
        let items = self.list_items(None, None).await?;

        let mut rows = vec![[
            "Item ID",
            "Item Name",
            "Serial Number",
            "Status",
            "Created At",
            "Updated At",
            "Checked Out By",
            "Checked Out At",
        ]
        .map(csv_quote)
        .join(",")];

        for item in items {
            let row = [
                item.item_id.as_str(),
                item.item_name.as_str(),
                item.serial_number.as_deref().unwrap_or(""),
                item.status.as_str(),
                &item.created_at.to_rfc3339(),
                &item.updated_at.to_rfc3339(),
                item.checked_out_by.as_deref().unwrap_or(""),
                &item
                    .checked_out_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default(),
            ]
            .map(csv_quote)
            .join(",");
            rows.push(row);
        }

        Ok(rows.join("\n"))
    }
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quote_escapes_embedded_quotes() {
        assert_eq!(csv_quote("plain"), "\"plain\"");
        assert_eq!(csv_quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateItemInput::default().is_empty());
        assert!(!UpdateItemInput {
            item_name: Some("Drill".into()),
            ..Default::default()
        }
        .is_empty());
    }
}
