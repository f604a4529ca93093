pub mod checkout;
pub mod inventory;

pub use checkout::CheckoutService;
pub use inventory::InventoryService;
