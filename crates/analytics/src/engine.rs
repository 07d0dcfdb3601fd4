use crate::report::{
    EggEconomicsReport, FeedCostShare, FeedNutrientShare, MonthlyNutritionRow, saturating_div,
};
use chrono::Month;
use core_types::{Calendar, EggSettings, Feed, NutrientCatalog, Purchase, RecordId};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap};

/// Decimal places kept for cost and nutrient shares.
const SHARE_DP: u32 = 1;
/// Decimal places kept for weighted nutrient percentages.
const NUTRIENT_DP: u32 = 2;

/// A stateless calculator for deriving farm metrics from purchase records.
///
/// It borrows the record collections it reads and never mutates them, so
/// every query is recomputed from the current records on demand.
#[derive(Debug, Clone, Copy)]
pub struct FarmMetrics<'a> {
    feeds: &'a [Feed],
    purchases: &'a [Purchase],
    catalog: &'a NutrientCatalog,
    calendar: Calendar,
}

impl<'a> FarmMetrics<'a> {
    pub fn new(
        feeds: &'a [Feed],
        purchases: &'a [Purchase],
        catalog: &'a NutrientCatalog,
        calendar: Calendar,
    ) -> Self {
        Self {
            feeds,
            purchases,
            catalog,
            calendar,
        }
    }

    /// Purchases dated within `month` of the calendar year, in record order.
    pub fn monthly_purchases(&self, month: Month) -> Vec<&'a Purchase> {
        self.purchases
            .iter()
            .filter(|p| self.calendar.contains(month, p.purchase_date))
            .collect()
    }

    /// Total feed cost of `month`.
    ///
    /// Each purchase contributes `unit_cost × quantity × feeding_ratio / 100`.
    /// Purchases whose feed no longer exists contribute nothing. Totals too
    /// large for a `Decimal` saturate at `Decimal::MAX`.
    pub fn total_cost(&self, month: Month) -> Decimal {
        let feeds = self.feed_index();
        self.monthly_purchases(month)
            .into_iter()
            .filter_map(|p| purchase_cost(&feeds, p))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Each feed's share of the month's cost, largest first.
    ///
    /// Empty when the month has no cost, so callers never divide by zero.
    pub fn feed_cost_percentage(&self, month: Month) -> Vec<FeedCostShare> {
        let feeds = self.feed_index();
        let mut per_feed: BTreeMap<RecordId, Decimal> = BTreeMap::new();
        for purchase in self.monthly_purchases(month) {
            if let Some(cost) = purchase_cost(&feeds, purchase) {
                let entry = per_feed.entry(purchase.feed_id).or_default();
                *entry = entry.saturating_add(cost);
            }
        }

        let total = per_feed
            .values()
            .copied()
            .fold(Decimal::ZERO, Decimal::saturating_add);
        if total.is_zero() {
            return Vec::new();
        }

        let mut shares: Vec<FeedCostShare> = per_feed
            .into_iter()
            .filter_map(|(feed_id, value)| {
                let feed = feeds.get(&feed_id)?;
                Some(FeedCostShare {
                    feed_id,
                    name: feed.name.clone(),
                    value,
                    percent: round(percentage(value, total), SHARE_DP),
                })
            })
            .collect();
        shares.sort_by(|a, b| b.value.cmp(&a.value).then(a.feed_id.cmp(&b.feed_id)));
        shares
    }

    /// Weighted-average nutrient content of the month's feed mix.
    ///
    /// For each visible nutrient: Σ(nutrient% × weighted quantity) divided by
    /// Σ(weighted quantity) over all of the month's purchases. A purchase
    /// whose feed is gone adds weight but no nutrient. Every visible key maps
    /// to 0 when the month carries no weight.
    pub fn nutrition_contribution(&self, month: Month) -> BTreeMap<String, Decimal> {
        let feeds = self.feed_index();
        let purchases = self.monthly_purchases(month);
        let keys: Vec<&str> = self.catalog.visible_keys().collect();

        let total_weight = purchases
            .iter()
            .map(|p| p.weighted_quantity())
            .fold(Decimal::ZERO, Decimal::saturating_add);
        if total_weight.is_zero() {
            return keys
                .into_iter()
                .map(|k| (k.to_string(), Decimal::ZERO))
                .collect();
        }

        let mut weighted: BTreeMap<String, Decimal> = keys
            .iter()
            .map(|k| (k.to_string(), Decimal::ZERO))
            .collect();
        for purchase in &purchases {
            let Some(feed) = feeds.get(&purchase.feed_id) else {
                tracing::debug!(
                    purchase_id = purchase.id,
                    feed_id = purchase.feed_id,
                    "Purchase references a missing feed; it adds no nutrients."
                );
                continue;
            };
            let weight = purchase.weighted_quantity();
            for (key, amount) in weighted.iter_mut() {
                *amount = amount.saturating_add(feed.nutrient(key).saturating_mul(weight));
            }
        }

        weighted
            .into_iter()
            .map(|(key, amount)| (key, round(saturating_div(amount, total_weight), NUTRIENT_DP)))
            .collect()
    }

    /// For each feed bought in `month`, its share of every visible nutrient.
    ///
    /// A feed's share of a nutrient is its weighted amount of that nutrient
    /// over the month's total amount of it, as a percentage with one decimal.
    /// Nutrients nobody supplied are reported as 0. Feeds are ordered by id.
    pub fn nutrient_share_by_feed(&self, month: Month) -> Vec<FeedNutrientShare> {
        let feeds = self.feed_index();
        let keys: Vec<&str> = self.catalog.visible_keys().collect();

        let mut amounts: BTreeMap<RecordId, BTreeMap<&str, Decimal>> = BTreeMap::new();
        let mut totals: HashMap<&str, Decimal> = HashMap::new();
        for purchase in self.monthly_purchases(month) {
            let Some(feed) = feeds.get(&purchase.feed_id) else {
                continue;
            };
            let weight = purchase.weighted_quantity();
            let per_feed = amounts.entry(feed.id).or_default();
            for &key in &keys {
                let amount = feed.nutrient(key).saturating_mul(weight);
                let slot = per_feed.entry(key).or_default();
                *slot = slot.saturating_add(amount);
                let total = totals.entry(key).or_default();
                *total = total.saturating_add(amount);
            }
        }

        amounts
            .into_iter()
            .filter_map(|(feed_id, per_feed)| {
                let feed = feeds.get(&feed_id)?;
                let shares = keys
                    .iter()
                    .map(|&key| {
                        let total = totals.get(key).copied().unwrap_or_default();
                        let amount = per_feed.get(key).copied().unwrap_or_default();
                        let share = if total > Decimal::ZERO {
                            round(percentage(amount, total), SHARE_DP)
                        } else {
                            Decimal::ZERO
                        };
                        (key.to_string(), share)
                    })
                    .collect();
                Some(FeedNutrientShare {
                    feed_id,
                    name: feed.name.clone(),
                    shares,
                })
            })
            .collect()
    }

    /// Nutrition mix and feed cost for each month of the calendar year.
    pub fn monthly_nutrition_table(&self) -> Vec<MonthlyNutritionRow> {
        Calendar::months()
            .map(|month| MonthlyNutritionRow {
                month,
                nutrients: self.nutrition_contribution(month),
                total_cost: self.total_cost(month),
            })
            .collect()
    }

    /// Egg economics for the calendar's current month.
    pub fn egg_economics(&self, settings: &EggSettings) -> EggEconomicsReport {
        EggEconomicsReport::calculate(self.total_cost(self.calendar.current_month), settings)
    }

    fn feed_index(&self) -> HashMap<RecordId, &'a Feed> {
        self.feeds.iter().map(|f| (f.id, f)).collect()
    }
}

/// Cost of a single purchase, or `None` when its feed is missing.
fn purchase_cost(feeds: &HashMap<RecordId, &Feed>, purchase: &Purchase) -> Option<Decimal> {
    let feed = feeds.get(&purchase.feed_id)?;
    Some(feed.unit_cost.saturating_mul(purchase.weighted_quantity()))
}

/// `part` as a percentage of a non-zero `whole`.
fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    saturating_div(part, whole).saturating_mul(Decimal::ONE_HUNDRED)
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn feed(id: RecordId, name: &str, cost: Decimal, protein: Decimal, fiber: Decimal) -> Feed {
        Feed {
            id,
            name: name.to_string(),
            unit_cost: cost,
            unit: "kg".to_string(),
            nutrients: BTreeMap::from([
                ("protein".to_string(), protein),
                ("fiber".to_string(), fiber),
            ]),
        }
    }

    fn purchase(
        id: RecordId,
        feed_id: RecordId,
        quantity: Decimal,
        ratio: Decimal,
        month: u32,
        day: u32,
    ) -> Purchase {
        Purchase {
            id,
            feed_id,
            quantity,
            feeding_ratio: ratio,
            purchase_date: NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
        }
    }

    fn catalog() -> NutrientCatalog {
        let mut catalog = NutrientCatalog::with_builtins();
        for key in ["fat", "calcium", "umami", "amino"] {
            catalog.toggle_visibility(key).unwrap();
        }
        catalog
    }

    fn sample() -> (Vec<Feed>, Vec<Purchase>) {
        let feeds = vec![
            feed(1, "Layer mash", dec!(5000), dec!(18), dec!(8)),
            feed(2, "Hay", dec!(3000), dec!(12), dec!(22)),
        ];
        let purchases = vec![
            purchase(101, 1, dec!(500), dec!(20), 1, 15),
            purchase(102, 2, dec!(300), dec!(30), 1, 20),
            purchase(103, 2, dec!(800), dec!(40), 2, 10),
        ];
        (feeds, purchases)
    }

    fn calendar() -> Calendar {
        Calendar::new(2025, Month::January)
    }

    #[test]
    fn total_cost_weights_by_feeding_ratio() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        // 5000 × 500 × 0.20 + 3000 × 300 × 0.30
        assert_eq!(metrics.total_cost(Month::January), dec!(770000));
        assert_eq!(metrics.total_cost(Month::February), dec!(960000));
        assert_eq!(metrics.total_cost(Month::March), Decimal::ZERO);
    }

    #[test]
    fn purchases_from_other_years_are_ignored() {
        let (feeds, mut purchases) = sample();
        purchases.push(Purchase {
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ..purchase(104, 1, dec!(100), dec!(100), 1, 1)
        });
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        assert_eq!(metrics.monthly_purchases(Month::January).len(), 2);
    }

    #[test]
    fn missing_feeds_are_skipped_silently() {
        let (feeds, mut purchases) = sample();
        purchases.push(purchase(105, 99, dec!(1000), dec!(50), 1, 28));
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        assert_eq!(metrics.total_cost(Month::January), dec!(770000));
        assert_eq!(metrics.feed_cost_percentage(Month::January).len(), 2);
    }

    #[test]
    fn purchases_of_missing_feeds_dilute_nutrition() {
        let feeds = vec![feed(1, "Layer mash", dec!(5000), dec!(18), dec!(8))];
        let purchases = vec![
            purchase(101, 1, dec!(100), dec!(100), 1, 5),
            purchase(102, 99, dec!(100), dec!(100), 1, 6),
        ];
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        // The dangling purchase carries half the weight and no nutrients.
        let nutrition = metrics.nutrition_contribution(Month::January);
        assert_eq!(nutrition["protein"], dec!(9));
        assert_eq!(nutrition["fiber"], dec!(4));
    }

    #[test]
    fn unsupplied_nutrients_have_a_zero_share() {
        let feeds = vec![
            feed(1, "Layer mash", dec!(5000), dec!(18), Decimal::ZERO),
            feed(2, "Hay", dec!(3000), dec!(12), Decimal::ZERO),
        ];
        let purchases = vec![
            purchase(101, 1, dec!(100), dec!(100), 1, 5),
            purchase(102, 2, dec!(100), dec!(100), 1, 6),
        ];
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        let shares = metrics.nutrient_share_by_feed(Month::January);
        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|s| s.shares["fiber"].is_zero()));
        assert_eq!(shares[0].shares["protein"], dec!(60));
    }

    #[test]
    fn oversized_costs_saturate() {
        let huge = Decimal::from(10_u64.pow(19)) * Decimal::TEN;
        let feeds = vec![feed(1, "Layer mash", huge, dec!(18), dec!(8))];
        let purchases = vec![
            purchase(101, 1, huge, dec!(100), 1, 5),
            purchase(102, 1, huge, dec!(100), 1, 6),
        ];
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        assert_eq!(metrics.total_cost(Month::January), Decimal::MAX);
        let shares = metrics.feed_cost_percentage(Month::January);
        assert_eq!(shares[0].percent, dec!(100));
        assert_eq!(metrics.nutrition_contribution(Month::January)["protein"], dec!(18));
    }

    #[test]
    fn cost_percentages_are_sorted_and_sum_to_one_hundred() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        let shares = metrics.feed_cost_percentage(Month::January);
        assert_eq!(shares[0].name, "Layer mash");
        assert_eq!(shares[0].value, dec!(500000));
        assert_eq!(shares[0].percent, dec!(64.9));
        assert_eq!(shares[1].percent, dec!(35.1));

        let sum: Decimal = shares.iter().map(|s| s.percent).sum();
        assert!((sum - dec!(100)).abs() <= dec!(0.1));
    }

    #[test]
    fn cost_percentages_are_empty_without_cost() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        assert!(metrics.feed_cost_percentage(Month::June).is_empty());
    }

    #[test]
    fn nutrition_is_a_weighted_average_over_visible_keys() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        // Weights: 500 × 0.2 = 100 of layer mash, 300 × 0.3 = 90 of hay.
        let nutrition = metrics.nutrition_contribution(Month::January);
        assert_eq!(nutrition.len(), 2);
        // (18 × 100 + 12 × 90) / 190 = 15.157...
        assert_eq!(nutrition["protein"], dec!(15.16));
        // (8 × 100 + 22 × 90) / 190 = 14.631...
        assert_eq!(nutrition["fiber"], dec!(14.63));
    }

    #[test]
    fn nutrition_is_zero_for_an_empty_month() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        let nutrition = metrics.nutrition_contribution(Month::May);
        assert_eq!(nutrition.len(), 2);
        assert!(nutrition.values().all(|v| v.is_zero()));
    }

    #[test]
    fn nutrient_shares_split_each_nutrient_between_feeds() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        let shares = metrics.nutrient_share_by_feed(Month::January);
        assert_eq!(shares.len(), 2);
        // Protein: 1800 from layer mash, 1080 from hay.
        assert_eq!(shares[0].shares["protein"], dec!(62.5));
        assert_eq!(shares[1].shares["protein"], dec!(37.5));
    }

    #[test]
    fn egg_economics_uses_the_current_month() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        let settings = EggSettings {
            egg_count: 50000,
            egg_price: dec!(30),
        };
        let report = metrics.egg_economics(&settings);
        assert_eq!(report.total_cost, dec!(770000));
        assert_eq!(report.profit, dec!(730000));
    }

    #[test]
    fn monthly_table_covers_the_whole_year() {
        let (feeds, purchases) = sample();
        let catalog = catalog();
        let metrics = FarmMetrics::new(&feeds, &purchases, &catalog, calendar());

        let table = metrics.monthly_nutrition_table();
        assert_eq!(table.len(), 12);
        assert_eq!(table[1].month, Month::February);
        assert_eq!(table[1].total_cost, dec!(960000));
        assert_eq!(table[1].nutrients["protein"], dec!(12));
    }
}
