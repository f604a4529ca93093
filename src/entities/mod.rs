pub mod inventory_history;
pub mod inventory_item;
pub mod inventory_receipt;

pub use inventory_history::HistoryAction;
pub use inventory_item::ItemStatus;
