use crate::StockPolicy;
use configuration::ThresholdPolicy;
use core_types::{InventoryItem, InventoryStatus};
use rust_decimal_macros::dec;

/// Classifies stock against the item's minimum level.
///
/// Critical at or below half the minimum, warning at or below the minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinLevelPolicy;

impl StockPolicy for MinLevelPolicy {
    fn classify(&self, item: &InventoryItem) -> InventoryStatus {
        if item.current_stock <= item.min_level * dec!(0.5) {
            InventoryStatus::Critical
        } else if item.current_stock <= item.min_level {
            InventoryStatus::Warning
        } else {
            InventoryStatus::Normal
        }
    }

    fn name(&self) -> &'static str {
        "min_level"
    }
}

/// Classifies stock against the item's optimal level.
///
/// Critical at or below 30% of optimal, warning at or below 50%.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalLevelPolicy;

impl StockPolicy for OptimalLevelPolicy {
    fn classify(&self, item: &InventoryItem) -> InventoryStatus {
        if item.current_stock <= item.optimal_level * dec!(0.3) {
            InventoryStatus::Critical
        } else if item.current_stock <= item.optimal_level * dec!(0.5) {
            InventoryStatus::Warning
        } else {
            InventoryStatus::Normal
        }
    }

    fn name(&self) -> &'static str {
        "optimal_level"
    }
}

/// Builds the policy selected in the configuration.
pub fn policy_for(policy: ThresholdPolicy) -> Box<dyn StockPolicy> {
    match policy {
        ThresholdPolicy::MinLevel => Box::new(MinLevelPolicy),
        ThresholdPolicy::OptimalLevel => Box::new(OptimalLevelPolicy),
    }
}
