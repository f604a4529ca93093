use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an inventory item. The string values match what is
/// stored in the database and shown to API clients.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ItemStatus {
    #[sea_orm(string_value = "Available")]
    Available,
    #[sea_orm(string_value = "Checked Out")]
    #[serde(rename = "Checked Out")]
    CheckedOut,
}

impl ItemStatus {
    /// Parse the API/database representation ("Available" / "Checked Out").
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Available" => Some(Self::Available),
            "Checked Out" => Some(Self::CheckedOut),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::CheckedOut => "Checked Out",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub item_id: String,
    pub item_name: String,
    pub serial_number: Option<String>,
    pub photo_filename: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub checked_out_by: Option<String>,
    pub checked_out_at: Option<DateTimeUtc>,
    pub last_action_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_history::Entity")]
    History,
    #[sea_orm(has_many = "super::inventory_receipt::Entity")]
    Receipts,
}

impl Related<super::inventory_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::inventory_receipt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
