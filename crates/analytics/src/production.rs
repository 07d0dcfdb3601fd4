use core_types::{Feed, FeedSortKey, Flock, SortDirection};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Hens across all flocks.
pub fn total_hens(flocks: &[Flock]) -> u64 {
    flocks.iter().map(|f| u64::from(f.bird_count)).sum()
}

/// Expected eggs per day: total hens at the given lay rate, rounded to the nearest egg.
pub fn daily_egg_production(flocks: &[Flock], lay_rate: Decimal) -> u64 {
    let eggs = Decimal::from(total_hens(flocks)).saturating_mul(lay_rate);
    eggs.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

/// Feeds ordered by `key`. Ties keep their original order.
pub fn sorted_feeds<'a>(
    feeds: &'a [Feed],
    key: &FeedSortKey,
    direction: SortDirection,
) -> Vec<&'a Feed> {
    let mut sorted: Vec<&Feed> = feeds.iter().collect();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &Feed, b: &Feed, key: &FeedSortKey) -> Ordering {
    match key {
        FeedSortKey::Name => a.name.cmp(&b.name),
        FeedSortKey::UnitCost => a.unit_cost.cmp(&b.unit_cost),
        FeedSortKey::Unit => a.unit.cmp(&b.unit),
        FeedSortKey::Nutrient(nutrient) => a.nutrient(nutrient).cmp(&b.nutrient(nutrient)),
    }
}
