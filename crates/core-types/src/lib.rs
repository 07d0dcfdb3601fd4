//! # Henhouse Core Types
//!
//! The shared vocabulary of the workspace: feed products, purchase records,
//! inventory items, flocks, egg sale settings and notifications, plus the
//! nutrient catalog that defines which nutrient keys a feed profile carries.
//! `performance` holds the flock health notes, monthly revenue and annual
//! goals the farm tracks alongside its feed records.
//!
//! This is a Layer 0 crate. It holds data and validation only; every derived
//! value is computed by `stock`, `analytics` or `ledger`.

pub mod calendar;
pub mod enums;
pub mod error;
pub mod nutrients;
pub mod performance;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use calendar::Calendar;
pub use enums::{FeedSortKey, InventoryStatus, NotificationKind, SortDirection, StockAdjustment};
pub use error::CoreError;
pub use nutrients::{NutrientCatalog, NutrientDef, nutrient_key};
pub use performance::{AnnualGoals, FlockDetail, FlockDetailUpdate, RevenueRecord};
pub use structs::{
    EggSettings, Feed, Flock, InventoryItem, NewFeed, NewInventoryItem, NewPurchase,
    Notification, Purchase, StockAlert,
};

/// Identity type shared by every record. Allocated by the state container.
pub type RecordId = u64;
