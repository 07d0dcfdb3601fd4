//! Terminal tables for the CLI.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::{Feed, InventoryStatus};
use ledger::FarmState;
use rust_decimal::Decimal;

fn new_table<I, T>(header: I) -> Table
where
    I: IntoIterator<Item = T>,
    T: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn amount(value: Decimal) -> Cell {
    number(value.normalize())
}

pub fn print_report(state: &FarmState) {
    let month = state.calendar().current_month;
    let catalog = state.catalog();
    println!("== {} {} ==", month.name(), state.calendar().year);

    let shares = state.feed_cost_percentage(month);
    if shares.is_empty() {
        println!("No feed purchases this month.");
    } else {
        let mut table = new_table(["Feed", "Cost", "Share (%)"]);
        for share in &shares {
            table.add_row(vec![
                Cell::new(&share.name),
                amount(share.value),
                amount(share.percent),
            ]);
        }
        println!("{table}");
    }

    let contribution = state.nutrition_contribution(month);
    let mut table = new_table(["Nutrient", "Ration (%)"]);
    for (key, value) in &contribution {
        table.add_row(vec![Cell::new(catalog.label(key)), amount(*value)]);
    }
    println!("{table}");

    let by_feed = state.nutrient_share_by_feed(month);
    if !by_feed.is_empty() {
        let keys: Vec<&str> = catalog.visible_keys().collect();
        let mut header = vec!["Feed".to_string()];
        header.extend(keys.iter().map(|k| format!("{} share (%)", catalog.label(k))));
        let mut table = new_table(header);
        for feed in &by_feed {
            let mut row = vec![Cell::new(&feed.name)];
            row.extend(
                keys.iter()
                    .map(|k| amount(feed.shares.get(*k).copied().unwrap_or_default())),
            );
            table.add_row(row);
        }
        println!("{table}");
    }

    let eggs = state.egg_economics();
    let mut table = new_table(["Egg economics", ""]);
    table
        .add_row(vec![Cell::new("Feed cost"), amount(eggs.total_cost)])
        .add_row(vec![Cell::new("Revenue"), amount(eggs.revenue)])
        .add_row(vec![Cell::new("Feed cost per egg"), amount(eggs.egg_unit_cost)])
        .add_row(vec![Cell::new("Break-even eggs"), number(eggs.break_even_eggs)])
        .add_row(vec![Cell::new("Profit"), amount(eggs.profit)])
        .add_row(vec![Cell::new("Profit margin (%)"), amount(eggs.profit_margin)]);
    println!("{table}");

    println!(
        "Hens: {}  Expected eggs per day: {}",
        state.total_hens(),
        state.daily_egg_production()
    );
}

pub fn print_nutrition_table(state: &FarmState) {
    let catalog = state.catalog();
    let keys: Vec<&str> = catalog.visible_keys().collect();

    let mut header = vec!["Month".to_string()];
    header.extend(keys.iter().map(|k| format!("{} (%)", catalog.label(k))));
    header.push("Feed cost".to_string());

    let mut table = new_table(header);
    for row in state.monthly_nutrition_table() {
        let mut cells = vec![Cell::new(row.month.name())];
        cells.extend(
            keys.iter()
                .map(|k| amount(row.nutrients.get(*k).copied().unwrap_or_default())),
        );
        cells.push(amount(row.total_cost));
        table.add_row(cells);
    }
    println!("{table}");
}

pub fn print_feeds(state: &FarmState, feeds: &[&Feed]) {
    let catalog = state.catalog();
    let keys: Vec<&str> = catalog.visible_keys().collect();

    let mut header = vec!["Id".to_string(), "Name".to_string(), "Unit cost".to_string()];
    header.extend(keys.iter().map(|k| format!("{} (%)", catalog.label(k))));

    let mut table = new_table(header);
    for feed in feeds {
        let mut row = vec![
            number(feed.id),
            Cell::new(&feed.name),
            Cell::new(format!("{} / {}", feed.unit_cost.normalize(), feed.unit)),
        ];
        row.extend(keys.iter().map(|k| amount(feed.nutrient(k))));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_inventory(state: &FarmState) {
    let mut table = new_table(["Id", "Item", "Stock", "Min", "Optimal", "Days left", "Status"]);
    for item in state.inventory() {
        let color = match item.status {
            InventoryStatus::Normal => Color::Green,
            InventoryStatus::Warning => Color::Yellow,
            InventoryStatus::Critical => Color::Red,
        };
        let days = item
            .days_remaining
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        table.add_row(vec![
            number(item.id),
            Cell::new(&item.name),
            Cell::new(format!("{} {}", item.current_stock.normalize(), item.unit)),
            amount(item.min_level),
            amount(item.optimal_level),
            number(days),
            Cell::new(item.status).fg(color),
        ]);
    }
    println!("{table}");
    println!("Stock policy: {}", state.policy_name());
}

pub fn print_flocks(state: &FarmState) {
    let mut table = new_table([
        "Id",
        "Flock",
        "Birds",
        "Age (weeks)",
        "Health",
        "Mortality (%)",
        "FCR",
        "Notes",
    ]);
    for flock in state.flocks() {
        let mut row = vec![
            number(flock.id),
            Cell::new(&flock.name),
            number(flock.bird_count),
            number(flock.age_weeks),
        ];
        match state.flock_detail(flock.id) {
            Some(detail) => row.extend([
                Cell::new(&detail.health_status),
                amount(detail.mortality_rate),
                amount(detail.feed_conversion_ratio),
                Cell::new(&detail.notes),
            ]),
            None => row.extend(["-", "-", "-", ""].map(Cell::new)),
        }
        table.add_row(row);
    }
    println!("{table}");
    println!(
        "Hens: {}  Expected eggs per day: {}",
        state.total_hens(),
        state.daily_egg_production()
    );
}

pub fn print_progress(state: &FarmState) {
    let mut table = new_table(["Month", "Eggs", "Meat", "Fertilizer", "Total"]);
    for record in state.revenue_records() {
        table.add_row(vec![
            Cell::new(record.month.name()),
            amount(record.eggs),
            amount(record.meat),
            amount(record.fertilizer),
            amount(record.total()),
        ]);
    }
    println!("{table}");

    let goals = state.annual_goals();
    let mut table = new_table(["Annual goal", "Target", ""]);
    table
        .add_row(vec![
            Cell::new("Revenue"),
            amount(goals.revenue),
            Cell::new(format!(
                "{} so far ({}%)",
                state.annual_revenue().normalize(),
                state.revenue_goal_progress().normalize()
            )),
        ])
        .add_row(vec![Cell::new("Profit"), amount(goals.profit), Cell::new("")])
        .add_row(vec![
            Cell::new("Production increase (%)"),
            amount(goals.production_increase),
            Cell::new(""),
        ])
        .add_row(vec![
            Cell::new("Cost reduction (%)"),
            amount(goals.cost_reduction),
            Cell::new(""),
        ]);
    println!("{table}");
}

pub fn print_notifications(state: &FarmState) {
    let mut table = new_table(["Id", "Date", "Kind", "Message", ""]);
    for note in state.notifications() {
        table.add_row(vec![
            number(note.id),
            Cell::new(note.date),
            Cell::new(format!("{:?}", note.kind)),
            Cell::new(&note.message),
            Cell::new(if note.read { "" } else { "new" }),
        ]);
    }
    println!("{table}");
    println!("{} unread", state.unread_count());
}
