//! Toolroom API Library
//!
//! Check-in/check-out inventory tracking for shared equipment: item CRUD,
//! a two-state checkout engine with an append-only history log, photo and
//! PDF receipt uploads, statistics, and CSV export.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use handlers::AppServices;

/// Shared application state, explicitly constructed at startup and injected
/// into every handler. No module-level singletons.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: AppServices,
}

/// All `/api/v1` routes.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/items/:item_id",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .route(
            "/items/:item_id/history",
            get(handlers::items::get_item_history),
        )
        .route(
            "/items/:item_id/photo",
            post(handlers::uploads::upload_item_photo),
        )
        .route(
            "/items/:item_id/receipts",
            get(handlers::uploads::list_item_receipts).post(handlers::uploads::upload_item_receipts),
        )
        .route(
            "/checkin-checkout",
            post(handlers::checkout::process_check_in_out),
        )
        .route("/stats", get(handlers::reports::get_stats))
        .route("/export/csv", get(handlers::reports::export_csv))
}

/// Assemble the full application router: liveness, health, the v1 API,
/// Swagger UI, static serving of uploaded files, request tracing, and a body
/// limit sized for uploads. CORS and compression are layered on by the
/// binary, which owns that configuration.
pub fn app_router(state: AppState) -> Router {
    let uploads_dir = state.config.uploads_dir.clone();
    // One extra megabyte of headroom for multipart framing
    let body_limit = state.config.max_upload_bytes() + 1024 * 1024;

    Router::new()
        .route("/", get(|| async { "toolroom-api up" }))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
