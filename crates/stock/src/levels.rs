use crate::StockPolicy;
use crate::error::StockError;
use core_types::{InventoryItem, InventoryStatus, StockAdjustment};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Whole days of stock left at the given daily usage.
///
/// Returns `None` when nothing is consumed, since the stock never runs out.
pub fn days_remaining(current_stock: Decimal, daily_usage: Decimal) -> Option<u32> {
    if daily_usage <= Decimal::ZERO {
        return None;
    }
    let days = current_stock
        .checked_div(daily_usage)
        .map_or(Some(u32::MAX), |days| days.floor().to_u32());
    Some(days.unwrap_or(u32::MAX))
}

/// Computes the stock level after `adjustment`.
///
/// Subtracting more than is on hand leaves the stock at zero; adding past
/// `Decimal::MAX` leaves it there.
pub fn apply_adjustment(
    current_stock: Decimal,
    adjustment: StockAdjustment,
) -> Result<Decimal, StockError> {
    let quantity = adjustment.quantity();
    if quantity.is_sign_negative() {
        return Err(StockError::NegativeAdjustment(quantity));
    }

    let next = match adjustment {
        StockAdjustment::Add(q) => current_stock.saturating_add(q),
        StockAdjustment::Subtract(q) => (current_stock - q).max(Decimal::ZERO),
        StockAdjustment::Set(q) => q,
    };
    Ok(next)
}

/// Recomputes the derived fields of `item` and returns its previous status.
pub fn refresh_item(item: &mut InventoryItem, policy: &dyn StockPolicy) -> InventoryStatus {
    let previous = item.status;
    item.days_remaining = days_remaining(item.current_stock, item.daily_usage);
    item.status = policy.classify(item);
    if item.status != previous {
        tracing::debug!(
            item = %item.name,
            from = %previous,
            to = %item.status,
            policy = policy.name(),
            "Inventory status changed."
        );
    }
    previous
}
