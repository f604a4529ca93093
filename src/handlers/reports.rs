use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::errors::ServiceError;
use crate::AppState;

/// Inventory statistics for the dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Aggregate item counts", body = crate::services::inventory::InventoryStats),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let stats = state.services.inventory.stats().await?;

    Ok(Json(json!({
        "success": true,
        "data": stats,
    })))
}

/// Export the full inventory as CSV.
#[utoipa::path(
    get,
    path = "/api/v1/export/csv",
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let csv = state.services.inventory.export_csv().await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=inventory-export.csv",
            ),
        ],
        csv,
    ))
}
