//! # Henhouse Stock
//!
//! Inventory health: which threshold rule turns a stock level into a
//! `normal` / `warning` / `critical` status, how many days of feed remain,
//! and how a stock adjustment changes the level.
//!
//! ## Public API
//!
//! - `StockPolicy`: The trait every threshold rule implements.
//! - `MinLevelPolicy` / `OptimalLevelPolicy`: The two concrete rules.
//! - `policy_for`: Builds the rule selected in the configuration.
//! - `refresh_item` / `apply_adjustment` / `days_remaining`: Level arithmetic.

pub mod error;
pub mod levels;
pub mod policies;

pub use error::StockError;
pub use levels::{apply_adjustment, days_remaining, refresh_item};
pub use policies::{MinLevelPolicy, OptimalLevelPolicy, policy_for};

use core_types::{InventoryItem, InventoryStatus};

/// The core trait that all inventory threshold rules implement.
///
/// A policy is a pure function of the item's current stock and thresholds.
/// The state container holds exactly one policy and applies it to every item,
/// so all statuses in a dashboard are comparable.
pub trait StockPolicy: std::fmt::Debug + Send + Sync {
    /// Classifies the item's current stock level.
    fn classify(&self, item: &InventoryItem) -> InventoryStatus;

    /// A short name for logs and summaries.
    fn name(&self) -> &'static str;
}
