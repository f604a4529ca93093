//! Check-in/check-out state engine.
//!
//! The only invariant-bearing logic in the system: given a requested action
//! and the item's current record, decide whether the transition is legal and,
//! if so, apply it as a single atomic conditional update plus exactly one
//! history entry. Wrong-state requests and lost update races are ordinary
//! negative outcomes, not faults.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{inventory_history, inventory_item, HistoryAction, ItemStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Requested transition. Any other value fails deserialization before it
/// reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckAction {
    Checkin,
    Checkout,
}

impl CheckAction {
    fn history_action(self) -> HistoryAction {
        match self {
            CheckAction::Checkin => HistoryAction::Checkin,
            CheckAction::Checkout => HistoryAction::Checkout,
        }
    }

    /// The status the item must currently have for this action to be legal.
    fn expected_status(self) -> ItemStatus {
        match self {
            CheckAction::Checkin => ItemStatus::CheckedOut,
            CheckAction::Checkout => ItemStatus::Available,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOutRequest {
    pub item_id: String,
    pub serial_number: String,
    pub action: CheckAction,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Why a structurally valid request was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// `checkin` requested but the item is already available.
    AlreadyAvailable,
    /// `checkout` requested but the item is already checked out.
    AlreadyCheckedOut,
    /// The conditional update matched zero rows: a concurrent request won.
    FailedToApply,
}

/// Exactly one of these is produced per call. Rejections carry the current
/// item record so the caller can render the state that won.
#[derive(Debug)]
pub enum TransitionOutcome {
    Completed {
        item: inventory_item::Model,
        message: String,
    },
    NotFound {
        suggested_item_id: String,
    },
    Rejected {
        reason: RejectionReason,
        message: String,
        item: inventory_item::Model,
    },
}

/// The check-in/check-out state engine. Holds an injected persistence handle;
/// no module-level connection state.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl CheckoutService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Process a check-in or check-out request.
    ///
    /// Missing required fields are the caller's bug and surface as a
    /// validation error. Unknown item, wrong current state, and a lost update
    /// race are normal outcomes reported through [`TransitionOutcome`].
    #[instrument(skip(self), fields(item_id = %request.item_id, action = ?request.action))]
    pub async fn process(
        &self,
        request: CheckInOutRequest,
    ) -> Result<TransitionOutcome, ServiceError> {
        let item_id = request.item_id.trim();
        let serial_number = request.serial_number.trim();
        if item_id.is_empty() || serial_number.is_empty() {
            return Err(ServiceError::ValidationError(
                "Item ID and Serial Number are required".to_string(),
            ));
        }
        let user_id = request
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let Some(current) = self.find_item(item_id).await? else {
            info!(%item_id, "check-in/out requested for unknown item");
            return Ok(TransitionOutcome::NotFound {
                suggested_item_id: item_id.to_owned(),
            });
        };

        let expected = request.action.expected_status();
        if current.status != expected {
            let (reason, message) = match request.action {
                CheckAction::Checkout => (
                    RejectionReason::AlreadyCheckedOut,
                    match &current.checked_out_by {
                        Some(holder) => {
                            format!("Item \"{}\" is already checked out by {}", item_id, holder)
                        }
                        None => format!("Item \"{}\" is already checked out", item_id),
                    },
                ),
                CheckAction::Checkin => (
                    RejectionReason::AlreadyAvailable,
                    format!("Item \"{}\" is already available", item_id),
                ),
            };
            return Ok(TransitionOutcome::Rejected {
                reason,
                message,
                item: current,
            });
        }

        let now = Utc::now();
        let applied = self
            .apply_transition(
                item_id,
                serial_number,
                request.action,
                user_id.as_deref(),
                now,
            )
            .await?;

        if !applied {
            // Another request observed the same "legal" prior state and won
            // the conditional update. Report the state that won.
            warn!(%item_id, "conditional update affected zero rows; concurrent request won");
            return match self.find_item(item_id).await? {
                Some(item) => Ok(TransitionOutcome::Rejected {
                    reason: RejectionReason::FailedToApply,
                    message: format!(
                        "Failed to {} item \"{}\"",
                        match request.action {
                            CheckAction::Checkin => "check in",
                            CheckAction::Checkout => "check out",
                        },
                        item_id
                    ),
                    item,
                }),
                // Item deleted out from under us between lookup and update.
                None => Ok(TransitionOutcome::NotFound {
                    suggested_item_id: item_id.to_owned(),
                }),
            };
        }

        let event = match request.action {
            CheckAction::Checkout => Event::ItemCheckedOut {
                item_id: item_id.to_owned(),
                user_id: user_id.clone(),
            },
            CheckAction::Checkin => Event::ItemCheckedIn {
                item_id: item_id.to_owned(),
                user_id: user_id.clone(),
            },
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!("Failed to publish transition event: {}", e);
        }

        let item = self.find_item(item_id).await?.ok_or_else(|| {
            ServiceError::InternalError(format!(
                "item \"{}\" disappeared after a successful transition",
                item_id
            ))
        })?;

        let message = match request.action {
            CheckAction::Checkout => format!("Item \"{}\" successfully checked out", item_id),
            CheckAction::Checkin => format!("Item \"{}\" successfully checked in", item_id),
        };
        info!(%item_id, status = item.status.as_str(), "transition applied");

        Ok(TransitionOutcome::Completed { item, message })
    }

    async fn find_item(
        &self,
        item_id: &str,
    ) -> Result<Option<inventory_item::Model>, ServiceError> {
        inventory_item::Entity::find()
            .filter(inventory_item::Column::ItemId.eq(item_id))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Apply the transition as one transaction: a conditional update guarded
    /// by both item key and expected prior status, then the history append.
    /// Returns false when the update matched zero rows; nothing is written in
    /// that case.
    async fn apply_transition(
        &self,
        item_id: &str,
        serial_number: &str,
        action: CheckAction,
        user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;

        let update = match action {
            CheckAction::Checkout => inventory_item::ActiveModel {
                status: Set(ItemStatus::CheckedOut),
                checked_out_by: Set(user_id.map(str::to_owned)),
                checked_out_at: Set(Some(now)),
                last_action_by: Set(user_id.map(str::to_owned)),
                serial_number: Set(Some(serial_number.to_owned())),
                updated_at: Set(now),
                ..Default::default()
            },
            CheckAction::Checkin => inventory_item::ActiveModel {
                status: Set(ItemStatus::Available),
                checked_out_by: Set(None),
                checked_out_at: Set(None),
                last_action_by: Set(user_id.map(str::to_owned)),
                serial_number: Set(Some(serial_number.to_owned())),
                updated_at: Set(now),
                ..Default::default()
            },
        };

        let result = inventory_item::Entity::update_many()
            .set(update)
            .filter(inventory_item::Column::ItemId.eq(item_id))
            .filter(inventory_item::Column::Status.eq(action.expected_status()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        inventory_history::ActiveModel {
            item_id: Set(item_id.to_owned()),
            action: Set(action.history_action()),
            user_id: Set(user_id.map(str::to_owned)),
            serial_number: Set(Some(serial_number.to_owned())),
            timestamp: Set(now),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(true)
    }
}
