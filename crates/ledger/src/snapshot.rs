use core_types::{
    AnnualGoals, Calendar, EggSettings, Feed, Flock, FlockDetail, InventoryItem, NutrientCatalog,
    Notification, Purchase, RevenueRecord, StockAlert,
};
use serde::{Deserialize, Serialize};

/// A complete copy of every record in a `FarmState`.
///
/// Derived inventory fields are included for readability but are recomputed
/// whenever a snapshot is loaded back into a state container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub calendar: Calendar,
    pub catalog: NutrientCatalog,
    pub egg_settings: EggSettings,
    pub feeds: Vec<Feed>,
    pub purchases: Vec<Purchase>,
    pub inventory: Vec<InventoryItem>,
    pub flocks: Vec<Flock>,
    #[serde(default)]
    pub flock_details: Vec<FlockDetail>,
    #[serde(default)]
    pub revenue: Vec<RevenueRecord>,
    #[serde(default)]
    pub annual_goals: AnnualGoals,
    /// Newest first.
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Unread stock alerts, including those no longer in `notifications`.
    #[serde(default)]
    pub pending_alerts: Vec<StockAlert>,
}
