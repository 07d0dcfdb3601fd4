use chrono::Month;
use core_types::{EggSettings, RecordId};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One feed's slice of a month's feed cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCostShare {
    pub feed_id: RecordId,
    pub name: String,
    /// Cost attributed to this feed in the month.
    pub value: Decimal,
    /// `value` as a percentage of the month's total, one decimal place.
    pub percent: Decimal,
}

/// How much of each nutrient a single feed supplied in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedNutrientShare {
    pub feed_id: RecordId,
    pub name: String,
    /// Nutrient key to the feed's percentage of that nutrient's monthly total.
    pub shares: BTreeMap<String, Decimal>,
}

/// A row of the twelve-month nutrition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNutritionRow {
    pub month: Month,
    pub nutrients: BTreeMap<String, Decimal>,
    pub total_cost: Decimal,
}

/// Egg economics for one month.
///
/// Every figure is derived from the month's feed cost and the egg settings,
/// and each one guards its own division so the report never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggEconomicsReport {
    pub total_cost: Decimal,
    pub revenue: Decimal,
    /// Feed cost per egg sold. 0 when no eggs are sold.
    pub egg_unit_cost: Decimal,
    /// Eggs that must be sold at the current price to cover feed cost.
    pub break_even_eggs: u64,
    pub profit: Decimal,
    /// Profit as a percentage of revenue. 0 when there is no revenue.
    pub profit_margin: Decimal,
}

impl EggEconomicsReport {
    pub fn calculate(total_cost: Decimal, settings: &EggSettings) -> Self {
        let revenue = settings.revenue();
        let profit = revenue.saturating_sub(total_cost);

        let egg_unit_cost = if settings.egg_count == 0 {
            Decimal::ZERO
        } else {
            saturating_div(total_cost, Decimal::from(settings.egg_count))
        };

        let break_even_eggs = if settings.egg_price <= Decimal::ZERO {
            0
        } else {
            saturating_div(total_cost, settings.egg_price)
                .ceil()
                .to_u64()
                .unwrap_or(u64::MAX)
        };

        let profit_margin = if revenue.is_zero() {
            Decimal::ZERO
        } else {
            saturating_div(profit, revenue).saturating_mul(Decimal::ONE_HUNDRED)
        };

        Self {
            total_cost,
            revenue,
            egg_unit_cost,
            break_even_eggs,
            profit,
            profit_margin,
        }
    }
}

/// `lhs / rhs`, clamped to the `Decimal` range instead of overflowing.
///
/// `rhs` must be non-zero.
pub(crate) fn saturating_div(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_div(rhs).unwrap_or_else(|| {
        if lhs.is_sign_negative() == rhs.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}
