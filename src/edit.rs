//! Commands that change the farm data file.

use chrono::{Month, NaiveDate};
use clap::{Args, Subcommand};
use core_types::{
    AnnualGoals, EggSettings, FlockDetailUpdate, NewFeed, NewInventoryItem, NewPurchase, RecordId,
    RevenueRecord,
};
use ledger::FarmState;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Subcommand)]
pub enum EditCommand {
    /// Add, update or delete a feed.
    #[command(subcommand)]
    Feed(FeedCommand),
    /// Record or delete a feed purchase.
    #[command(subcommand)]
    Purchase(PurchaseCommand),
    /// Start tracking stock of an item.
    Stock(StockArgs),
    /// Add a flock, or update its size and age.
    #[command(subcommand)]
    Flock(FlockCommand),
    /// Set the monthly egg count and price.
    Eggs {
        #[arg(long)]
        count: u64,
        #[arg(long)]
        price: Decimal,
    },
    /// Add, remove or show/hide a nutrient.
    #[command(subcommand)]
    Nutrient(NutrientCommand),
    /// Select the month egg economics are evaluated for.
    Month {
        #[arg(value_parser = crate::parse_month)]
        month: Month,
        /// Also move every monthly figure to this year.
        #[arg(long)]
        year: Option<i32>,
    },
    /// Record one month's revenue, replacing any earlier figures for it.
    Revenue(RevenueArgs),
    /// Change the annual goals; goals left out keep their current value.
    Goals(GoalsArgs),
}

#[derive(Subcommand)]
pub enum FeedCommand {
    Add(FeedArgs),
    Update {
        #[arg(long)]
        id: RecordId,
        #[command(flatten)]
        feed: FeedArgs,
    },
    Delete {
        #[arg(long)]
        id: RecordId,
    },
}

#[derive(Args)]
pub struct FeedArgs {
    #[arg(long)]
    name: String,

    /// Cost per unit.
    #[arg(long)]
    cost: Decimal,

    #[arg(long, default_value = "kg")]
    unit: String,

    /// A nutrient percentage as key=value, e.g. protein=18. Repeatable;
    /// nutrients left out are recorded as 0.
    #[arg(long = "nutrient", value_parser = parse_nutrient)]
    nutrients: Vec<(String, Decimal)>,
}

impl FeedArgs {
    fn into_new_feed(self) -> NewFeed {
        NewFeed {
            name: self.name,
            unit_cost: self.cost,
            unit: self.unit,
            nutrients: self.nutrients.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}

#[derive(Subcommand)]
pub enum PurchaseCommand {
    Add {
        #[arg(long)]
        feed: RecordId,
        #[arg(long)]
        quantity: Decimal,
        /// Percentage of the purchase used as feed (0-100).
        #[arg(long, default_value = "100")]
        ratio: Decimal,
        /// Purchase date as YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,
    },
    Delete {
        #[arg(long)]
        id: RecordId,
    },
}

#[derive(Args)]
pub struct StockArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    stock: Decimal,
    #[arg(long)]
    min: Decimal,
    #[arg(long)]
    optimal: Decimal,
    #[arg(long)]
    daily_usage: Decimal,
    #[arg(long, default_value = "kg")]
    unit: String,
}

#[derive(Subcommand)]
pub enum FlockCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        birds: u32,
        #[arg(long)]
        age_weeks: u32,
    },
    Update {
        #[arg(long)]
        id: RecordId,
        #[arg(long)]
        birds: u32,
        #[arg(long)]
        age_weeks: u32,
    },
    /// Record health and performance notes for a flock.
    Detail(FlockDetailArgs),
}

#[derive(Args)]
pub struct FlockDetailArgs {
    /// The flock id.
    #[arg(long)]
    id: RecordId,
    #[arg(long)]
    health: Option<String>,
    /// Percentage of birds lost.
    #[arg(long)]
    mortality: Option<Decimal>,
    /// Feed conversion ratio.
    #[arg(long)]
    fcr: Option<Decimal>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
pub struct RevenueArgs {
    #[arg(value_parser = crate::parse_month)]
    month: Month,
    #[arg(long, default_value = "0")]
    eggs: Decimal,
    #[arg(long, default_value = "0")]
    meat: Decimal,
    #[arg(long, default_value = "0")]
    fertilizer: Decimal,
}

#[derive(Args)]
pub struct GoalsArgs {
    #[arg(long)]
    revenue: Option<Decimal>,
    #[arg(long)]
    profit: Option<Decimal>,
    /// Target production increase, in percent.
    #[arg(long)]
    production_increase: Option<Decimal>,
    /// Target cost reduction, in percent.
    #[arg(long)]
    cost_reduction: Option<Decimal>,
}

impl GoalsArgs {
    fn apply_to(self, goals: AnnualGoals) -> AnnualGoals {
        AnnualGoals {
            revenue: self.revenue.unwrap_or(goals.revenue),
            profit: self.profit.unwrap_or(goals.profit),
            production_increase: self.production_increase.unwrap_or(goals.production_increase),
            cost_reduction: self.cost_reduction.unwrap_or(goals.cost_reduction),
        }
    }
}

#[derive(Subcommand)]
pub enum NutrientCommand {
    /// Add a custom nutrient; existing feeds get 0 for it.
    Add { name: String },
    /// Remove a custom nutrient from the catalog and every feed.
    Remove { key: String },
    /// Show or hide a nutrient in reports.
    Toggle { key: String },
}

fn parse_nutrient(value: &str) -> Result<(String, Decimal), String> {
    let (key, amount) = value
        .split_once('=')
        .ok_or_else(|| format!("'{value}' is not key=value"))?;
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("'{amount}' is not a number: {e}"))?;
    Ok((key.trim().to_string(), amount))
}

/// Applies one edit to `state` and returns a line describing the result.
pub fn apply(state: &mut FarmState, command: EditCommand) -> anyhow::Result<String> {
    let message = match command {
        EditCommand::Feed(FeedCommand::Add(args)) => {
            let id = state.add_feed(args.into_new_feed())?;
            format!("Added feed {id}.")
        }
        EditCommand::Feed(FeedCommand::Update { id, feed }) => {
            state.update_feed(id, feed.into_new_feed())?;
            format!("Updated feed {id}.")
        }
        EditCommand::Feed(FeedCommand::Delete { id }) => {
            let feed = state.delete_feed(id)?;
            format!("Deleted feed {} ({}).", feed.id, feed.name)
        }
        EditCommand::Purchase(PurchaseCommand::Add {
            feed,
            quantity,
            ratio,
            date,
        }) => {
            let id = state.add_purchase(NewPurchase {
                feed_id: feed,
                quantity,
                feeding_ratio: ratio,
                purchase_date: date,
            })?;
            format!("Added purchase {id}.")
        }
        EditCommand::Purchase(PurchaseCommand::Delete { id }) => {
            state.delete_purchase(id)?;
            format!("Deleted purchase {id}.")
        }
        EditCommand::Stock(args) => {
            let id = state.add_inventory_item(NewInventoryItem {
                name: args.name,
                current_stock: args.stock,
                min_level: args.min,
                optimal_level: args.optimal,
                unit: args.unit,
                daily_usage: args.daily_usage,
            })?;
            match state.inventory_item(id) {
                Some(item) => format!("Tracking {} as item {id} ({}).", item.name, item.status),
                None => format!("Tracking item {id}."),
            }
        }
        EditCommand::Flock(FlockCommand::Add {
            name,
            birds,
            age_weeks,
        }) => {
            let id = state.add_flock(&name, birds, age_weeks)?;
            format!("Added flock {id}.")
        }
        EditCommand::Flock(FlockCommand::Update {
            id,
            birds,
            age_weeks,
        }) => {
            state.update_flock(id, birds, age_weeks)?;
            format!("Updated flock {id}.")
        }
        EditCommand::Flock(FlockCommand::Detail(args)) => {
            state.update_flock_detail(
                args.id,
                FlockDetailUpdate {
                    health_status: args.health,
                    mortality_rate: args.mortality,
                    feed_conversion_ratio: args.fcr,
                    notes: args.notes,
                },
            )?;
            format!("Updated details of flock {}.", args.id)
        }
        EditCommand::Eggs { count, price } => {
            state.update_egg_settings(EggSettings {
                egg_count: count,
                egg_price: price,
            })?;
            format!("Egg settings: {count} eggs at {price}.")
        }
        EditCommand::Nutrient(NutrientCommand::Add { name }) => {
            let key = state.add_custom_nutrient(&name)?;
            format!("Added nutrient '{key}'.")
        }
        EditCommand::Nutrient(NutrientCommand::Remove { key }) => {
            state.delete_nutrient(&key)?;
            format!("Removed nutrient '{key}'.")
        }
        EditCommand::Nutrient(NutrientCommand::Toggle { key }) => {
            let visible = state.toggle_nutrient_visibility(&key)?;
            let shown = if visible { "shown" } else { "hidden" };
            format!("Nutrient '{key}' is now {shown}.")
        }
        EditCommand::Month { month, year } => {
            if let Some(year) = year {
                state.set_year(year)?;
            }
            state.set_month(month);
            format!("Selected {} {}.", month.name(), state.calendar().year)
        }
        EditCommand::Revenue(args) => {
            let record = RevenueRecord {
                month: args.month,
                eggs: args.eggs,
                meat: args.meat,
                fertilizer: args.fertilizer,
            };
            state.record_revenue(record)?;
            format!("Recorded {} revenue of {}.", args.month.name(), record.total())
        }
        EditCommand::Goals(args) => {
            let goals = args.apply_to(*state.annual_goals());
            state.update_annual_goals(goals)?;
            format!(
                "Annual goals: revenue {}, profit {}.",
                goals.revenue, goals.profit
            )
        }
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;
    use configuration::Config;
    use core_types::Calendar;

    #[test]
    fn nutrient_pairs_parse() {
        assert_eq!(
            parse_nutrient("protein = 18.5"),
            Ok(("protein".to_string(), Decimal::new(185, 1)))
        );
        assert!(parse_nutrient("protein").is_err());
        assert!(parse_nutrient("protein=lots").is_err());
    }

    #[test]
    fn edits_reach_the_state() {
        let mut state = FarmState::new(&Config::default(), Calendar::new(2025, Month::January));

        apply(
            &mut state,
            EditCommand::Feed(FeedCommand::Add(FeedArgs {
                name: "Layer mash".to_string(),
                cost: Decimal::from(5000),
                unit: "kg".to_string(),
                nutrients: vec![("protein".to_string(), Decimal::from(18))],
            })),
        )
        .unwrap();
        apply(
            &mut state,
            EditCommand::Purchase(PurchaseCommand::Add {
                feed: 1,
                quantity: Decimal::from(500),
                ratio: Decimal::from(20),
                date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            }),
        )
        .unwrap();

        assert_eq!(state.total_cost(Month::January), Decimal::from(500000));
        assert!(apply(&mut state, EditCommand::Feed(FeedCommand::Delete { id: 1 })).is_err());
    }

    #[test]
    fn month_edits_can_move_the_year() {
        let mut state = FarmState::new(&Config::default(), Calendar::new(2025, Month::December));

        let message = apply(
            &mut state,
            EditCommand::Month {
                month: Month::January,
                year: Some(2026),
            },
        )
        .unwrap();

        assert_eq!(message, "Selected January 2026.");
        assert_eq!(state.calendar(), Calendar::new(2026, Month::January));
    }

    #[test]
    fn goal_edits_keep_unset_goals() {
        let mut state = FarmState::new(&Config::default(), Calendar::new(2025, Month::January));

        apply(
            &mut state,
            EditCommand::Goals(GoalsArgs {
                revenue: Some(Decimal::from(3000000)),
                profit: None,
                production_increase: None,
                cost_reduction: None,
            }),
        )
        .unwrap();

        let goals = state.annual_goals();
        assert_eq!(goals.revenue, Decimal::from(3000000));
        assert_eq!(goals.profit, AnnualGoals::default().profit);
    }

    #[test]
    fn revenue_and_flock_detail_edits_reach_the_state() {
        let mut state = FarmState::new(&Config::default(), Calendar::new(2025, Month::January));
        let flock = state.add_flock("House A", 2500, 42).unwrap();

        apply(
            &mut state,
            EditCommand::Flock(FlockCommand::Detail(FlockDetailArgs {
                id: flock,
                health: Some("good".to_string()),
                mortality: Some(Decimal::new(5, 1)),
                fcr: None,
                notes: None,
            })),
        )
        .unwrap();
        let message = apply(
            &mut state,
            EditCommand::Revenue(RevenueArgs {
                month: Month::January,
                eggs: Decimal::from(145000),
                meat: Decimal::from(28000),
                fertilizer: Decimal::from(12000),
            }),
        )
        .unwrap();

        assert_eq!(message, "Recorded January revenue of 185000.");
        assert_eq!(state.flock_detail(flock).unwrap().mortality_rate, Decimal::new(5, 1));
        assert_eq!(state.annual_revenue(), Decimal::from(185000));
    }
}
