use crate::error::ExportError;
use ledger::FarmState;
use std::collections::HashMap;
use std::io::Write;

/// Writes every feed as a CSV row, one column per catalog nutrient.
pub fn write_feeds_csv<W: Write>(state: &FarmState, writer: W) -> Result<(), ExportError> {
    let catalog = state.catalog();
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![
        "id".to_string(),
        "name".to_string(),
        "unit_cost".to_string(),
        "unit".to_string(),
    ];
    header.extend(catalog.iter().map(|n| format!("{} (%)", n.label)));
    csv.write_record(&header)?;

    for feed in state.feeds() {
        let mut row = vec![
            feed.id.to_string(),
            feed.name.clone(),
            feed.unit_cost.to_string(),
            feed.unit.clone(),
        ];
        row.extend(catalog.keys().map(|key| feed.nutrient(key).to_string()));
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Writes the purchase history as CSV.
///
/// `total` is the undiscounted `unit_cost × quantity`; the feeding ratio is
/// listed alongside it. Purchases whose feed no longer exists are left out.
pub fn write_purchases_csv<W: Write>(state: &FarmState, writer: W) -> Result<(), ExportError> {
    let feeds: HashMap<_, _> = state.feeds().iter().map(|f| (f.id, f)).collect();
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record([
        "id",
        "feed_id",
        "feed_name",
        "quantity",
        "unit_cost",
        "total",
        "feeding_ratio",
        "purchase_date",
    ])?;

    for purchase in state.purchases() {
        let Some(feed) = feeds.get(&purchase.feed_id) else {
            tracing::debug!(
                purchase_id = purchase.id,
                feed_id = purchase.feed_id,
                "Skipping purchase with a missing feed."
            );
            continue;
        };
        csv.write_record([
            purchase.id.to_string(),
            purchase.feed_id.to_string(),
            feed.name.clone(),
            purchase.quantity.to_string(),
            feed.unit_cost.to_string(),
            feed.unit_cost
                .saturating_mul(purchase.quantity)
                .normalize()
                .to_string(),
            purchase.feeding_ratio.to_string(),
            purchase.purchase_date.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Writes the twelve-month nutrition table: visible nutrients and feed cost per month.
///
/// Computed values are written in their shortest form (`18`, not `18.00`).
pub fn write_nutrition_csv<W: Write>(state: &FarmState, writer: W) -> Result<(), ExportError> {
    let catalog = state.catalog();
    let keys: Vec<&str> = catalog.visible_keys().collect();
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["month".to_string()];
    header.extend(keys.iter().map(|k| format!("{} (%)", catalog.label(k))));
    header.push("total_cost".to_string());
    csv.write_record(&header)?;

    for row in state.monthly_nutrition_table() {
        let mut record = vec![row.month.name().to_string()];
        record.extend(keys.iter().map(|k| {
            let value = row.nutrients.get(*k).copied().unwrap_or_default();
            value.normalize().to_string()
        }));
        record.push(row.total_cost.normalize().to_string());
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Month, NaiveDate};
    use configuration::Config;
    use core_types::{Calendar, NewFeed, NewPurchase};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn state() -> FarmState {
        let mut state = FarmState::new(&Config::default(), Calendar::new(2025, Month::January));
        let feed = state
            .add_feed(NewFeed {
                name: "Layer mash".to_string(),
                unit_cost: dec!(5000),
                unit: "kg".to_string(),
                nutrients: BTreeMap::from([("protein".to_string(), dec!(18))]),
            })
            .unwrap();
        state
            .add_purchase(NewPurchase {
                feed_id: feed,
                quantity: dec!(500),
                feeding_ratio: dec!(20),
                purchase_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            })
            .unwrap();
        state
    }

    fn render(write: impl Fn(&FarmState, &mut Vec<u8>) -> Result<(), ExportError>) -> Vec<String> {
        let mut buffer = Vec::new();
        write(&state(), &mut buffer).unwrap();
        String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn feeds_have_a_column_per_nutrient() {
        let lines = render(|s, w| write_feeds_csv(s, w));
        assert_eq!(
            lines[0],
            "id,name,unit_cost,unit,Protein (%),Fat (%),Fiber (%),Calcium (%),Umami (%),Amino acids (%)"
        );
        assert_eq!(lines[1], "1,Layer mash,5000,kg,18,0,0,0,0,0");
    }

    #[test]
    fn purchases_list_the_undiscounted_total() {
        let lines = render(|s, w| write_purchases_csv(s, w));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2,1,Layer mash,500,5000,2500000,20,2025-01-15");
    }

    #[test]
    fn nutrition_table_has_twelve_months() {
        let lines = render(|s, w| write_nutrition_csv(s, w));
        assert_eq!(lines.len(), 13);
        assert!(lines[1].starts_with("January,18"));
        assert!(lines[1].ends_with(",500000"));
        assert!(lines[2].starts_with("February,0"));
    }
}
