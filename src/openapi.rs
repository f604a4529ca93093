use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Toolroom API",
        description = "Check-in/check-out inventory tracking for shared equipment",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        handlers::items::list_items,
        handlers::items::get_item,
        handlers::items::create_item,
        handlers::items::update_item,
        handlers::items::delete_item,
        handlers::items::get_item_history,
        handlers::checkout::process_check_in_out,
        handlers::uploads::upload_item_photo,
        handlers::uploads::upload_item_receipts,
        handlers::uploads::list_item_receipts,
        handlers::reports::get_stats,
        handlers::reports::export_csv,
    ),
    components(schemas(
        handlers::items::ItemResponse,
        handlers::items::HistoryEntryResponse,
        handlers::items::CreateItemRequest,
        handlers::items::UpdateItemRequest,
        handlers::uploads::ReceiptResponse,
        crate::services::checkout::CheckInOutRequest,
        crate::services::checkout::CheckAction,
        crate::services::inventory::InventoryStats,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "items", description = "Inventory item CRUD and history"),
        (name = "checkout", description = "Check-in/check-out transitions"),
        (name = "uploads", description = "Photos and PDF receipts"),
        (name = "reports", description = "Statistics and CSV export"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated OpenAPI document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
