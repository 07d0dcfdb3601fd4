use crate::RecordId;
use crate::error::CoreError;
use chrono::Month;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Health and performance notes for one flock. At most one per flock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockDetail {
    pub id: RecordId,
    pub flock_id: RecordId,
    /// Free-text assessment, e.g. "good" or "under observation".
    pub health_status: String,
    /// Percentage of birds lost, 0..=100.
    pub mortality_rate: Decimal,
    /// Feed consumed per unit of eggs produced.
    pub feed_conversion_ratio: Decimal,
    pub notes: String,
}

impl FlockDetail {
    /// A blank detail record, before any update is merged in.
    pub fn new(id: RecordId, flock_id: RecordId) -> Self {
        Self {
            id,
            flock_id,
            health_status: "good".to_string(),
            mortality_rate: Decimal::ZERO,
            feed_conversion_ratio: Decimal::ZERO,
            notes: String::new(),
        }
    }

    /// Overwrites the fields `update` sets and leaves the rest alone.
    pub fn merge(&mut self, update: FlockDetailUpdate) {
        if let Some(health_status) = update.health_status {
            self.health_status = health_status.trim().to_string();
        }
        if let Some(mortality_rate) = update.mortality_rate {
            self.mortality_rate = mortality_rate;
        }
        if let Some(ratio) = update.feed_conversion_ratio {
            self.feed_conversion_ratio = ratio;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }
}

/// A partial change to a `FlockDetail`. `None` fields are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlockDetailUpdate {
    pub health_status: Option<String>,
    pub mortality_rate: Option<Decimal>,
    pub feed_conversion_ratio: Option<Decimal>,
    pub notes: Option<String>,
}

impl FlockDetailUpdate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self
            .health_status
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            return Err(CoreError::InvalidInput(
                "health status".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let out_of_range = |rate: &Decimal| rate.is_sign_negative() || *rate > dec!(100);
        if let Some(rate) = self.mortality_rate.filter(out_of_range) {
            return Err(CoreError::InvalidInput(
                "mortality rate".to_string(),
                format!("{rate} is outside 0..=100"),
            ));
        }
        if let Some(ratio) = self.feed_conversion_ratio.filter(Decimal::is_sign_negative) {
            return Err(CoreError::InvalidInput(
                "feed conversion ratio".to_string(),
                format!("{ratio} is negative"),
            ));
        }
        Ok(())
    }
}

/// Revenue booked for one month of the calendar year, by source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub month: Month,
    pub eggs: Decimal,
    pub meat: Decimal,
    pub fertilizer: Decimal,
}

impl RevenueRecord {
    pub fn total(&self) -> Decimal {
        self.eggs
            .saturating_add(self.meat)
            .saturating_add(self.fertilizer)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let sources = [
            ("egg revenue", self.eggs),
            ("meat revenue", self.meat),
            ("fertilizer revenue", self.fertilizer),
        ];
        for (field, value) in sources {
            if value.is_sign_negative() {
                return Err(CoreError::InvalidInput(
                    field.to_string(),
                    format!("{value} is negative"),
                ));
            }
        }
        Ok(())
    }
}

/// Targets for the year. Production and cost figures are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualGoals {
    pub revenue: Decimal,
    pub profit: Decimal,
    pub production_increase: Decimal,
    pub cost_reduction: Decimal,
}

impl AnnualGoals {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.revenue.is_sign_negative() {
            return Err(CoreError::InvalidInput(
                "revenue goal".to_string(),
                format!("{} is negative", self.revenue),
            ));
        }
        let percentages = [
            ("production increase goal", self.production_increase),
            ("cost reduction goal", self.cost_reduction),
        ];
        for (field, value) in percentages {
            if value.is_sign_negative() || value > dec!(100) {
                return Err(CoreError::InvalidInput(
                    field.to_string(),
                    format!("{value} is outside 0..=100"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for AnnualGoals {
    fn default() -> Self {
        Self {
            revenue: dec!(2400000),
            profit: dec!(720000),
            production_increase: dec!(8),
            cost_reduction: dec!(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_merge_only_the_fields_they_set() {
        let mut detail = FlockDetail::new(7, 1);
        detail.merge(FlockDetailUpdate {
            mortality_rate: Some(dec!(0.5)),
            notes: Some("Laying above average".to_string()),
            ..Default::default()
        });
        detail.merge(FlockDetailUpdate {
            health_status: Some(" under observation ".to_string()),
            ..Default::default()
        });

        assert_eq!(detail.health_status, "under observation");
        assert_eq!(detail.mortality_rate, dec!(0.5));
        assert_eq!(detail.notes, "Laying above average");
        assert_eq!(detail.feed_conversion_ratio, Decimal::ZERO);
    }

    #[test]
    fn detail_updates_are_range_checked() {
        let too_many_deaths = FlockDetailUpdate {
            mortality_rate: Some(dec!(120)),
            ..Default::default()
        };
        assert!(too_many_deaths.validate().is_err());

        let blank = FlockDetailUpdate {
            health_status: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let negative_ratio = FlockDetailUpdate {
            feed_conversion_ratio: Some(dec!(-1.8)),
            ..Default::default()
        };
        assert!(negative_ratio.validate().is_err());
        assert!(FlockDetailUpdate::default().validate().is_ok());
    }

    #[test]
    fn revenue_total_sums_every_source() {
        let january = RevenueRecord {
            month: Month::January,
            eggs: dec!(145000),
            meat: dec!(28000),
            fertilizer: dec!(12000),
        };
        assert_eq!(january.total(), dec!(185000));
        assert!(january.validate().is_ok());

        let refund = RevenueRecord {
            meat: dec!(-1),
            ..january
        };
        assert!(refund.validate().is_err());
    }

    #[test]
    fn goals_default_and_validate() {
        let goals = AnnualGoals::default();
        assert_eq!(goals.revenue, dec!(2400000));
        assert!(goals.validate().is_ok());

        let impossible = AnnualGoals {
            cost_reduction: dec!(150),
            ..goals
        };
        assert!(impossible.validate().is_err());
    }
}
