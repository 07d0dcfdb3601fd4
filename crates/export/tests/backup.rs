use chrono::{Month, NaiveDate};
use configuration::{Config, ThresholdPolicy};
use core_types::{Calendar, InventoryStatus, NewFeed, NewInventoryItem, NewPurchase};
use export::{ExportError, backup_json, load_backup, restore_json, save_backup};
use ledger::FarmState;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn populated() -> FarmState {
    let mut state = FarmState::new(&Config::default(), Calendar::new(2025, Month::March));
    state.add_custom_nutrient("Vitamin D").unwrap();
    let feed = state
        .add_feed(NewFeed {
            name: "Layer mash".to_string(),
            unit_cost: dec!(5000),
            unit: "kg".to_string(),
            nutrients: BTreeMap::from([
                ("protein".to_string(), dec!(18)),
                ("vitamin_d".to_string(), dec!(0.5)),
            ]),
        })
        .unwrap();
    state
        .add_purchase(NewPurchase {
            feed_id: feed,
            quantity: dec!(500),
            feeding_ratio: dec!(20),
            purchase_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        })
        .unwrap();
    state
        .add_inventory_item(NewInventoryItem {
            name: "Oyster shell".to_string(),
            current_stock: dec!(100),
            min_level: dec!(400),
            optimal_level: dec!(1000),
            unit: "kg".to_string(),
            daily_usage: dec!(20),
        })
        .unwrap();
    state.add_flock("Barn A", 3000, 40).unwrap();
    state
}

#[test]
fn backup_restores_an_equal_state() {
    let original = populated();
    let json = backup_json(&original).unwrap();

    let restored = restore_json(&Config::default(), &json).unwrap();

    assert_eq!(restored.snapshot(), original.snapshot());
    assert_eq!(restored.total_cost(Month::March), dec!(500000));
    assert_eq!(restored.unread_count(), 1);
    assert!(restored.catalog().contains("vitamin_d"));
}

#[test]
fn restored_ids_continue_after_the_backup() {
    let json = backup_json(&populated()).unwrap();
    let mut restored = restore_json(&Config::default(), &json).unwrap();

    let flock = restored.add_flock("Barn B", 1000, 20).unwrap();

    assert!(restored.feeds().iter().all(|f| f.id < flock));
    assert!(restored.inventory().iter().all(|i| i.id < flock));
}

#[test]
fn restore_recomputes_status_under_the_configured_policy() {
    let json = backup_json(&populated()).unwrap();
    let mut config = Config::default();
    config.inventory.policy = ThresholdPolicy::OptimalLevel;

    let restored = restore_json(&config, &json).unwrap();

    // 100 kg against an optimal level of 1000 is below the 30% mark.
    assert_eq!(restored.inventory()[0].status, InventoryStatus::Critical);
    assert_eq!(restored.inventory()[0].days_remaining, Some(5));
}

#[test]
fn unknown_versions_are_rejected() {
    let json = backup_json(&populated()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["version"] = serde_json::json!(99);

    let result = restore_json(&Config::default(), &value.to_string());

    assert!(matches!(result, Err(ExportError::UnsupportedVersion(99))));
}

#[test]
fn malformed_backups_are_json_errors() {
    let result = restore_json(&Config::default(), "{ \"version\": 1 }");
    assert!(matches!(result, Err(ExportError::Json(_))));
}

#[test]
fn backups_round_trip_through_a_file() {
    let dir = std::env::temp_dir().join(format!("henhouse-backup-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("farm.json");
    let original = populated();

    save_backup(&original, &path).unwrap();
    let restored = load_backup(&Config::default(), &path).unwrap();

    assert_eq!(restored.snapshot(), original.snapshot());
    std::fs::remove_dir_all(&dir).unwrap();
}
