pub mod checkout;
pub mod health;
pub mod items;
pub mod reports;
pub mod uploads;

use std::path::PathBuf;
use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{CheckoutService, InventoryService};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub inventory: Arc<InventoryService>,
    pub checkout: Arc<CheckoutService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, uploads_dir: impl Into<PathBuf>) -> Self {
        let uploads_dir = uploads_dir.into();
        let inventory = Arc::new(InventoryService::new(
            db.clone(),
            event_sender.clone(),
            uploads_dir,
        ));
        let checkout = Arc::new(CheckoutService::new(db, event_sender));

        Self {
            inventory,
            checkout,
        }
    }
}
