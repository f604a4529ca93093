use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::errors::ServiceError;
use crate::handlers::items::ItemResponse;
use crate::services::checkout::{CheckInOutRequest, RejectionReason, TransitionOutcome};
use crate::AppState;

impl RejectionReason {
    fn code(self) -> &'static str {
        match self {
            RejectionReason::AlreadyAvailable => "already_available",
            RejectionReason::AlreadyCheckedOut => "already_checked_out",
            RejectionReason::FailedToApply => "failed_to_apply",
        }
    }
}

/// Process a check-in or check-out request.
///
/// Exactly one of four responses: success with the updated item, 404 with a
/// registration hint, 409 with the current item and a reason code, or an
/// error envelope for validation/storage faults.
#[utoipa::path(
    post,
    path = "/api/v1/checkin-checkout",
    request_body = CheckInOutRequest,
    responses(
        (status = 200, description = "Transition applied; updated item returned", body = ItemResponse),
        (status = 400, description = "Missing required fields", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown item; response carries requiresRegistration and suggestedItemId"),
        (status = 409, description = "Transition rejected (wrong current state or lost update race)"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "checkout"
)]
pub async fn process_check_in_out(
    State(state): State<AppState>,
    Json(payload): Json<CheckInOutRequest>,
) -> Result<Response, ServiceError> {
    let outcome = state.services.checkout.process(payload).await?;

    let response = match outcome {
        TransitionOutcome::Completed { item, message } => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": message,
                "data": ItemResponse::from(item),
            })),
        ),
        TransitionOutcome::NotFound { suggested_item_id } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "message": format!(
                    "Item ID \"{}\" not found. Would you like to register this item?",
                    suggested_item_id
                ),
                "requiresRegistration": true,
                "suggestedItemId": suggested_item_id,
            })),
        ),
        TransitionOutcome::Rejected {
            reason,
            message,
            item,
        } => (
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "message": message,
                "reason": reason.code(),
                "data": ItemResponse::from(item),
            })),
        ),
    };

    Ok(response.into_response())
}
