use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock health of an inventory item, derived from its level against thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    Normal,
    Warning,
    Critical,
}

impl InventoryStatus {
    /// The lowercase label used in notification messages and exports.
    pub fn label(&self) -> &'static str {
        match self {
            InventoryStatus::Normal => "normal",
            InventoryStatus::Warning => "warning",
            InventoryStatus::Critical => "critical",
        }
    }

    /// Whether this status should raise an alert.
    pub fn is_alert(&self) -> bool {
        matches!(self, InventoryStatus::Warning | InventoryStatus::Critical)
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    System,
    Inventory,
    Production,
}

/// A change to an inventory item's stock level.
///
/// `Subtract` never drives stock below zero; the result is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "quantity", rename_all = "snake_case")]
pub enum StockAdjustment {
    Add(Decimal),
    Subtract(Decimal),
    Set(Decimal),
}

impl StockAdjustment {
    pub fn quantity(&self) -> Decimal {
        match self {
            StockAdjustment::Add(q) | StockAdjustment::Subtract(q) | StockAdjustment::Set(q) => *q,
        }
    }
}

/// The field a feed listing is ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSortKey {
    Name,
    UnitCost,
    Unit,
    /// Order by the percentage of a nutrient key; feeds lacking it sort as 0.
    Nutrient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}
