use crate::RecordId;
use crate::enums::{InventoryStatus, NotificationKind};
use crate::error::CoreError;
use crate::nutrients::NutrientCatalog;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A purchasable feed product and its nutrient profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub id: RecordId,
    pub name: String,
    /// Cost of one `unit` of this feed.
    pub unit_cost: Decimal,
    pub unit: String,
    /// Nutrient key to percentage content. Keys mirror the nutrient catalog.
    pub nutrients: BTreeMap<String, Decimal>,
}

impl Feed {
    /// The percentage of `key` in this feed, 0 when the feed does not carry it.
    pub fn nutrient(&self, key: &str) -> Decimal {
        self.nutrients.get(key).copied().unwrap_or(Decimal::ZERO)
    }
}

/// The user-supplied fields of a feed, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeed {
    pub name: String,
    pub unit_cost: Decimal,
    pub unit: String,
    #[serde(default)]
    pub nutrients: BTreeMap<String, Decimal>,
}

impl NewFeed {
    /// Validates the fields and aligns the nutrient map with `catalog`.
    ///
    /// Catalog keys missing from the profile are filled with 0. Keys the
    /// catalog does not know are rejected.
    pub fn normalize(mut self, catalog: &NutrientCatalog) -> Result<Self, CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "feed name".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if self.unit_cost.is_sign_negative() {
            return Err(CoreError::InvalidInput(
                "unit cost".to_string(),
                format!("{} is negative", self.unit_cost),
            ));
        }
        for (key, value) in &self.nutrients {
            if !catalog.contains(key) {
                return Err(CoreError::UnknownNutrient(key.clone()));
            }
            if value.is_sign_negative() {
                return Err(CoreError::InvalidInput(
                    format!("nutrient '{}'", key),
                    format!("{} is negative", value),
                ));
            }
        }
        for key in catalog.keys() {
            self.nutrients
                .entry(key.to_string())
                .or_insert(Decimal::ZERO);
        }
        Ok(self)
    }

    pub fn into_feed(self, id: RecordId) -> Feed {
        Feed {
            id,
            name: self.name,
            unit_cost: self.unit_cost,
            unit: self.unit,
            nutrients: self.nutrients,
        }
    }
}

/// A recorded acquisition of a feed, weighted into the diet by `feeding_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: RecordId,
    pub feed_id: RecordId,
    /// Quantity in the feed's unit.
    pub quantity: Decimal,
    /// Share of the diet this purchase represents, 0..=100.
    pub feeding_ratio: Decimal,
    pub purchase_date: NaiveDate,
}

impl Purchase {
    /// `quantity × feeding_ratio / 100`, the weight used for cost and nutrition.
    pub fn weighted_quantity(&self) -> Decimal {
        self.quantity.saturating_mul(self.feeding_ratio) / dec!(100)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub feed_id: RecordId,
    pub quantity: Decimal,
    pub feeding_ratio: Decimal,
    pub purchase_date: NaiveDate,
}

impl NewPurchase {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        if self.feeding_ratio.is_sign_negative() || self.feeding_ratio > dec!(100) {
            return Err(CoreError::InvalidInput(
                "feeding ratio".to_string(),
                format!("{} is outside 0..=100", self.feeding_ratio),
            ));
        }
        Ok(())
    }

    pub fn into_purchase(self, id: RecordId) -> Purchase {
        Purchase {
            id,
            feed_id: self.feed_id,
            quantity: self.quantity,
            feeding_ratio: self.feeding_ratio,
            purchase_date: self.purchase_date,
        }
    }
}

/// A stocked feed with its thresholds and derived health.
///
/// `days_remaining` and `status` are derived; they are recomputed by the
/// state container after every mutation and on every sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: RecordId,
    pub name: String,
    pub current_stock: Decimal,
    pub min_level: Decimal,
    pub optimal_level: Decimal,
    pub unit: String,
    pub daily_usage: Decimal,
    /// `None` when nothing is consumed per day.
    pub days_remaining: Option<u32>,
    pub status: InventoryStatus,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    pub current_stock: Decimal,
    pub min_level: Decimal,
    pub optimal_level: Decimal,
    pub unit: String,
    pub daily_usage: Decimal,
}

impl NewInventoryItem {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "inventory item name".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let levels = [
            ("current stock", self.current_stock),
            ("minimum level", self.min_level),
            ("optimal level", self.optimal_level),
            ("daily usage", self.daily_usage),
        ];
        for (field, value) in levels {
            if value.is_sign_negative() {
                return Err(CoreError::InvalidInput(
                    field.to_string(),
                    format!("{} is negative", value),
                ));
            }
        }
        Ok(())
    }

    /// Builds the item with placeholder derived fields; callers recompute them.
    pub fn into_item(self, id: RecordId, today: NaiveDate) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            current_stock: self.current_stock,
            min_level: self.min_level,
            optimal_level: self.optimal_level,
            unit: self.unit,
            daily_usage: self.daily_usage,
            days_remaining: None,
            status: InventoryStatus::Normal,
            last_updated: today,
        }
    }
}

/// The egg sale settings used by the economics calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggSettings {
    /// Eggs sold per month.
    pub egg_count: u64,
    /// Sale price of one egg.
    pub egg_price: Decimal,
}

impl EggSettings {
    pub fn revenue(&self) -> Decimal {
        Decimal::from(self.egg_count).saturating_mul(self.egg_price)
    }
}

impl Default for EggSettings {
    fn default() -> Self {
        Self {
            egg_count: 5000,
            egg_price: dec!(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub kind: NotificationKind,
    pub message: String,
    pub date: NaiveDate,
    pub read: bool,
}

/// An unread stock alert, keyed by the item and the status it was raised for.
///
/// Kept apart from the notification entries so that alerts pushed out of the
/// capped log are still recognised as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
    pub notification_id: RecordId,
    pub item_id: RecordId,
    pub status: InventoryStatus,
}

/// A group of laying hens housed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flock {
    pub id: RecordId,
    pub name: String,
    pub bird_count: u32,
    pub age_weeks: u32,
}
