use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use toolroom_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Test harness: the full application router over an in-memory SQLite
/// database and a throwaway uploads directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _uploads: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().expect("create uploads tempdir");

        let mut cfg = AppConfig::new("sqlite::memory:", "127.0.0.1", 18_080);
        // A single connection keeps the in-memory database shared across the
        // whole pool.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.uploads_dir = uploads.path().to_string_lossy().into_owned();

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(
            db_arc.clone(),
            event_sender.clone(),
            cfg.uploads_dir.clone(),
        );
        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };
        let router = toolroom_api::app_router(state.clone());

        Self {
            router,
            state,
            _uploads: uploads,
        }
    }

    /// Issue one request against the router.
    pub async fn request(&self, method: Method, uri: &str, json: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match json {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("dispatch request")
    }

    /// Issue a fully custom request (multipart uploads and the like).
    #[allow(dead_code)]
    pub async fn request_raw(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("dispatch request")
    }
}

#[allow(dead_code)]
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
