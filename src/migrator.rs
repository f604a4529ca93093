#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_inventory_items_table::Migration),
            Box::new(m20240101_000002_create_inventory_history_table::Migration),
            Box::new(m20240101_000003_create_inventory_receipts_table::Migration),
        ]
    }
}

mod m20240101_000001_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ItemId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryItems::ItemName).string().not_null())
                        .col(ColumnDef::new(InventoryItems::SerialNumber).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::PhotoFilename)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Status)
                                .string()
                                .not_null()
                                .default("Available"),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CheckedOutBy)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CheckedOutAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::LastActionBy)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_status")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_updated_at")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::UpdatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
        ItemId,
        ItemName,
        SerialNumber,
        PhotoFilename,
        Status,
        CreatedAt,
        UpdatedAt,
        CheckedOutBy,
        CheckedOutAt,
        LastActionBy,
    }
}

mod m20240101_000002_create_inventory_history_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_inventory_history_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryHistory::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryHistory::ItemId)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryHistory::Action).string().not_null())
                        .col(ColumnDef::new(InventoryHistory::UserId).string().null())
                        .col(
                            ColumnDef::new(InventoryHistory::SerialNumber)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryHistory::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryHistory::Notes).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_history_item_id")
                        .table(InventoryHistory::Table)
                        .col(InventoryHistory::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryHistory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryHistory {
        Table,
        Id,
        ItemId,
        Action,
        UserId,
        SerialNumber,
        Timestamp,
        Notes,
    }
}

mod m20240101_000003_create_inventory_receipts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_inventory_receipts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryReceipts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryReceipts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryReceipts::ItemId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReceipts::Filename)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReceipts::OriginalName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReceipts::MimeType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReceipts::SizeBytes)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryReceipts::UploadedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_receipts_item_id")
                        .table(InventoryReceipts::Table)
                        .col(InventoryReceipts::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryReceipts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryReceipts {
        Table,
        Id,
        ItemId,
        Filename,
        OriginalName,
        MimeType,
        SizeBytes,
        UploadedAt,
    }
}
