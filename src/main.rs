mod edit;
mod render;

use anyhow::{Context, bail};
use chrono::{Month, Utc};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use configuration::{Config, ThresholdPolicy, init_logging, load_config};
use core_types::{Calendar, FeedSortKey, RecordId, SortDirection, StockAdjustment};
use export::ExportError;
use ledger::FarmState;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// The main entry point for the henhouse farm ledger.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; HENHOUSE__* variables may come from the shell.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = load_config().context("Failed to load configuration")?;
    if let Some(policy) = cli.policy {
        config.inventory.policy = policy;
    }
    // The guard must live until exit so buffered log lines reach the file.
    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(?config, "Configuration loaded.");

    match cli.command {
        Commands::Init { force } => handle_init(&config, &cli.data, force),
        Commands::Report(args) => {
            let mut state = open_farm(&config, &cli.data)?;
            if let Some(year) = args.year {
                state.set_year(year)?;
            }
            if let Some(month) = args.month {
                state.set_month(month);
            }
            render::print_report(&state);
            Ok(())
        }
        Commands::Nutrition => {
            let state = open_farm(&config, &cli.data)?;
            render::print_nutrition_table(&state);
            Ok(())
        }
        Commands::Feeds(args) => {
            let state = open_farm(&config, &cli.data)?;
            let key = match args.sort_by_nutrient {
                Some(nutrient) => FeedSortKey::Nutrient(nutrient),
                None => args.sort.into(),
            };
            let direction = if args.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            render::print_feeds(&state, &state.sorted_feeds(&key, direction));
            Ok(())
        }
        Commands::Inventory => {
            let mut state = open_farm(&config, &cli.data)?;
            let summary = state.sync()?;
            render::print_inventory(&state);
            if summary.alerts_raised > 0 {
                save_farm(&state, &cli.data)?;
            }
            Ok(())
        }
        Commands::Flocks => {
            let state = open_farm(&config, &cli.data)?;
            render::print_flocks(&state);
            Ok(())
        }
        Commands::Progress => {
            let state = open_farm(&config, &cli.data)?;
            render::print_progress(&state);
            Ok(())
        }
        Commands::Adjust(args) => handle_adjust(&config, &cli.data, args),
        Commands::Notifications(args) => handle_notifications(&config, &cli.data, args),
        Commands::Export(args) => handle_export(&config, &cli.data, args),
        Commands::Edit(command) => {
            let mut state = open_farm(&config, &cli.data)?;
            let message = edit::apply(&mut state, command)?;
            save_farm(&state, &cli.data)?;
            println!("{message}");
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Feed cost, nutrition and inventory tracking for a laying-hen farm.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The farm data file (a JSON backup).
    #[arg(long, global = true, default_value = "farm.json")]
    data: PathBuf,

    /// Overrides the configured stock-status policy.
    #[arg(long, global = true, value_enum)]
    policy: Option<ThresholdPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty farm data file for the current year and month.
    Init {
        /// Overwrite an existing data file.
        #[arg(long)]
        force: bool,
    },
    /// Show cost, nutrition and egg economics for one month.
    Report(ReportArgs),
    /// Show nutrition and feed cost for every month of the year.
    Nutrition,
    /// List feeds, optionally sorted.
    Feeds(FeedsArgs),
    /// Recompute stock levels, raise alerts and list inventory.
    Inventory,
    /// List flocks with their health and performance details.
    Flocks,
    /// Show recorded monthly revenue against the annual goals.
    Progress,
    /// Change the stock of one inventory item.
    Adjust(AdjustArgs),
    /// List notifications, optionally marking them read.
    Notifications(NotificationsArgs),
    /// Write a CSV report or a JSON backup.
    Export(ExportArgs),
    #[command(flatten)]
    Edit(edit::EditCommand),
}

#[derive(Args)]
struct ReportArgs {
    /// The month to report on (a number or a name); defaults to the saved month.
    #[arg(long, value_parser = parse_month)]
    month: Option<Month>,

    /// The year to report on; defaults to the saved year.
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortColumn {
    Name,
    UnitCost,
    Unit,
}

impl From<SortColumn> for FeedSortKey {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => FeedSortKey::Name,
            SortColumn::UnitCost => FeedSortKey::UnitCost,
            SortColumn::Unit => FeedSortKey::Unit,
        }
    }
}

#[derive(Args)]
struct FeedsArgs {
    #[arg(long, value_enum, default_value = "name")]
    sort: SortColumn,

    /// Sort by a nutrient key instead (e.g. "protein").
    #[arg(long, conflicts_with = "sort")]
    sort_by_nutrient: Option<String>,

    #[arg(long)]
    descending: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("change").required(true).args(["add", "subtract", "set"])))]
struct AdjustArgs {
    /// The inventory item id.
    #[arg(long)]
    item: RecordId,

    /// Add this quantity to the current stock.
    #[arg(long)]
    add: Option<Decimal>,

    /// Remove this quantity; stock never drops below zero.
    #[arg(long)]
    subtract: Option<Decimal>,

    /// Replace the current stock with this quantity.
    #[arg(long)]
    set: Option<Decimal>,
}

impl AdjustArgs {
    fn adjustment(&self) -> Option<StockAdjustment> {
        self.add
            .map(StockAdjustment::Add)
            .or(self.subtract.map(StockAdjustment::Subtract))
            .or(self.set.map(StockAdjustment::Set))
    }
}

#[derive(Args)]
struct NotificationsArgs {
    /// Mark one notification as read.
    #[arg(long, conflicts_with = "mark_all_read")]
    mark_read: Option<RecordId>,

    /// Mark every notification as read.
    #[arg(long)]
    mark_all_read: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Feeds,
    Purchases,
    Nutrition,
    Backup,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(value_enum)]
    kind: ExportKind,

    /// Where to write the export.
    #[arg(long)]
    out: PathBuf,
}

fn parse_month(value: &str) -> Result<Month, String> {
    if let Ok(number) = value.parse::<u8>() {
        return Month::try_from(number).map_err(|_| format!("{number} is not a month (1-12)"));
    }
    value
        .parse::<Month>()
        .map_err(|_| format!("'{value}' is not a month name"))
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn open_farm(config: &Config, path: &Path) -> anyhow::Result<FarmState> {
    if !path.exists() {
        bail!(
            "No farm data at {}. Run `henhouse init` to create one.",
            path.display()
        );
    }
    export::load_backup(config, path)
        .with_context(|| format!("Failed to load farm data from {}", path.display()))
}

fn save_farm(state: &FarmState, path: &Path) -> anyhow::Result<()> {
    export::save_backup(state, path)
        .with_context(|| format!("Failed to save farm data to {}", path.display()))
}

fn handle_init(config: &Config, path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite it.", path.display());
    }
    let state = FarmState::new(config, Calendar::containing(Utc::now().date_naive()));
    save_farm(&state, path)?;
    println!("Empty farm written to {}", path.display());
    Ok(())
}

fn handle_adjust(config: &Config, path: &Path, args: AdjustArgs) -> anyhow::Result<()> {
    let Some(adjustment) = args.adjustment() else {
        bail!("One of --add, --subtract or --set is required.");
    };
    let mut state = open_farm(config, path)?;
    let status = state.adjust_inventory(args.item, adjustment)?;
    save_farm(&state, path)?;

    if let Some(item) = state.inventory_item(args.item) {
        println!(
            "{}: {} {} ({})",
            item.name, item.current_stock, item.unit, status
        );
    }
    Ok(())
}

fn handle_notifications(
    config: &Config,
    path: &Path,
    args: NotificationsArgs,
) -> anyhow::Result<()> {
    let mut state = open_farm(config, path)?;
    let mut changed = false;

    if let Some(id) = args.mark_read {
        state.mark_notification_read(id)?;
        changed = true;
    }
    if args.mark_all_read {
        let marked = state.mark_all_notifications_read();
        println!("Marked {marked} notification(s) as read.");
        changed = marked > 0;
    }
    if changed {
        save_farm(&state, path)?;
    }

    render::print_notifications(&state);
    Ok(())
}

fn handle_export(config: &Config, path: &Path, args: ExportArgs) -> anyhow::Result<()> {
    let state = open_farm(config, path)?;

    match args.kind {
        ExportKind::Backup => save_farm(&state, &args.out)?,
        ExportKind::Feeds => write_csv(&args.out, |w| export::write_feeds_csv(&state, w))?,
        ExportKind::Purchases => write_csv(&args.out, |w| export::write_purchases_csv(&state, w))?,
        ExportKind::Nutrition => write_csv(&args.out, |w| export::write_nutrition_csv(&state, w))?,
    }

    println!("Export written to {}", args.out.display());
    Ok(())
}

fn write_csv(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<(), ExportError>,
) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write(BufWriter::new(file)).with_context(|| format!("Failed to write {}", path.display()))
}
