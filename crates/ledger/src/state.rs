use crate::error::LedgerError;
use crate::snapshot::FarmSnapshot;
use analytics::{
    EggEconomicsReport, FarmMetrics, FeedCostShare, FeedNutrientShare, MonthlyNutritionRow,
};
use chrono::{Month, NaiveDate, Utc};
use configuration::Config;
use core_types::{
    AnnualGoals, Calendar, CoreError, EggSettings, Feed, FeedSortKey, Flock, FlockDetail,
    FlockDetailUpdate, InventoryItem, InventoryStatus, NewFeed, NewInventoryItem, NewPurchase,
    Notification, NutrientCatalog, Purchase, RecordId, RevenueRecord, SortDirection,
    StockAdjustment,
};
use events::NotificationLog;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashSet};
use stock::StockPolicy;

/// What a `sync` pass found and emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub warning: usize,
    pub critical: usize,
    pub alerts_raised: usize,
}

/// The single owner of every farm record.
///
/// All changes go through the named operations below. Each mutating
/// operation finishes by recomputing the derived inventory fields, so the
/// records a caller reads are always consistent with each other. Queries
/// delegate to `FarmMetrics` and are recomputed on every call.
#[derive(Debug)]
pub struct FarmState {
    feeds: Vec<Feed>,
    purchases: Vec<Purchase>,
    inventory: Vec<InventoryItem>,
    flocks: Vec<Flock>,
    flock_details: Vec<FlockDetail>,
    /// One record per month, in calendar order.
    revenue: Vec<RevenueRecord>,
    annual_goals: AnnualGoals,
    catalog: NutrientCatalog,
    egg_settings: EggSettings,
    calendar: Calendar,
    notifications: NotificationLog,
    policy: Box<dyn StockPolicy>,
    lay_rate: Decimal,
    next_id: RecordId,
}

impl FarmState {
    /// Creates an empty state with the built-in nutrient catalog.
    pub fn new(config: &Config, calendar: Calendar) -> Self {
        Self {
            feeds: Vec::new(),
            purchases: Vec::new(),
            inventory: Vec::new(),
            flocks: Vec::new(),
            flock_details: Vec::new(),
            revenue: Vec::new(),
            annual_goals: AnnualGoals::default(),
            catalog: NutrientCatalog::with_builtins(),
            egg_settings: EggSettings::default(),
            calendar,
            notifications: NotificationLog::new(config.notifications.cap),
            policy: stock::policy_for(config.inventory.policy),
            lay_rate: config.production.lay_rate,
            next_id: 1,
        }
    }

    /// Rebuilds a state container from a snapshot.
    ///
    /// Ids are preserved and must be unique per record kind. Feed profiles are
    /// re-aligned with the snapshot's catalog and every derived inventory
    /// field is recomputed under the configured policy. No alerts are emitted.
    pub fn from_snapshot(config: &Config, snapshot: FarmSnapshot) -> Result<Self, LedgerError> {
        check_unique("feed", snapshot.feeds.iter().map(|f| f.id))?;
        check_unique("purchase", snapshot.purchases.iter().map(|p| p.id))?;
        check_unique("inventory item", snapshot.inventory.iter().map(|i| i.id))?;
        check_unique("flock", snapshot.flocks.iter().map(|f| f.id))?;
        check_unique("flock detail", snapshot.flock_details.iter().map(|d| d.id))?;
        check_unique(
            "flock detail for flock",
            snapshot.flock_details.iter().map(|d| d.flock_id),
        )?;
        if let Some(detail) = snapshot
            .flock_details
            .iter()
            .find(|d| !snapshot.flocks.iter().any(|f| f.id == d.flock_id))
        {
            return Err(LedgerError::FlockNotFound(detail.flock_id));
        }
        let mut months = HashSet::new();
        if let Some(record) = snapshot.revenue.iter().find(|r| !months.insert(r.month)) {
            return Err(LedgerError::DuplicateRevenueMonth(record.month));
        }

        let catalog = snapshot.catalog;
        let feeds = snapshot
            .feeds
            .into_iter()
            .map(|feed| {
                let id = feed.id;
                let new_feed = NewFeed {
                    name: feed.name,
                    unit_cost: feed.unit_cost,
                    unit: feed.unit,
                    nutrients: feed.nutrients,
                };
                Ok(new_feed.normalize(&catalog)?.into_feed(id))
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let max_id = feeds
            .iter()
            .map(|f| f.id)
            .chain(snapshot.purchases.iter().map(|p| p.id))
            .chain(snapshot.inventory.iter().map(|i| i.id))
            .chain(snapshot.flocks.iter().map(|f| f.id))
            .chain(snapshot.flock_details.iter().map(|d| d.id))
            .max()
            .unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or(LedgerError::IdsExhausted)?;

        let mut revenue = snapshot.revenue;
        revenue.sort_by_key(|r| r.month.number_from_month());

        let mut state = Self {
            feeds,
            purchases: snapshot.purchases,
            inventory: snapshot.inventory,
            flocks: snapshot.flocks,
            flock_details: snapshot.flock_details,
            revenue,
            annual_goals: snapshot.annual_goals,
            catalog,
            egg_settings: snapshot.egg_settings,
            calendar: snapshot.calendar,
            notifications: NotificationLog::from_entries(
                snapshot.notifications,
                snapshot.pending_alerts,
                config.notifications.cap,
            )?,
            policy: stock::policy_for(config.inventory.policy),
            lay_rate: config.production.lay_rate,
            next_id,
        };
        state.recompute();
        tracing::info!(
            feeds = state.feeds.len(),
            purchases = state.purchases.len(),
            inventory = state.inventory.len(),
            "Farm state restored from snapshot."
        );
        Ok(state)
    }

    /// A copy of every record, suitable for backup.
    pub fn snapshot(&self) -> FarmSnapshot {
        FarmSnapshot {
            calendar: self.calendar,
            catalog: self.catalog.clone(),
            egg_settings: self.egg_settings,
            feeds: self.feeds.clone(),
            purchases: self.purchases.clone(),
            inventory: self.inventory.clone(),
            flocks: self.flocks.clone(),
            flock_details: self.flock_details.clone(),
            revenue: self.revenue.clone(),
            annual_goals: self.annual_goals,
            notifications: self.notifications.iter().cloned().collect(),
            pending_alerts: self.notifications.pending_alerts().to_vec(),
        }
    }

    // --- Queries ---

    /// The analytics view over the current records.
    pub fn metrics(&self) -> FarmMetrics<'_> {
        FarmMetrics::new(&self.feeds, &self.purchases, &self.catalog, self.calendar)
    }

    pub fn total_cost(&self, month: Month) -> Decimal {
        self.metrics().total_cost(month)
    }

    pub fn monthly_purchases(&self, month: Month) -> Vec<&Purchase> {
        self.metrics().monthly_purchases(month)
    }

    pub fn feed_cost_percentage(&self, month: Month) -> Vec<FeedCostShare> {
        self.metrics().feed_cost_percentage(month)
    }

    pub fn nutrition_contribution(&self, month: Month) -> BTreeMap<String, Decimal> {
        self.metrics().nutrition_contribution(month)
    }

    pub fn nutrient_share_by_feed(&self, month: Month) -> Vec<FeedNutrientShare> {
        self.metrics().nutrient_share_by_feed(month)
    }

    pub fn monthly_nutrition_table(&self) -> Vec<MonthlyNutritionRow> {
        self.metrics().monthly_nutrition_table()
    }

    /// Egg economics for the selected month.
    pub fn egg_economics(&self) -> EggEconomicsReport {
        self.metrics().egg_economics(&self.egg_settings)
    }

    pub fn egg_unit_cost(&self) -> Decimal {
        self.egg_economics().egg_unit_cost
    }

    pub fn break_even_eggs(&self) -> u64 {
        self.egg_economics().break_even_eggs
    }

    pub fn profit(&self) -> Decimal {
        self.egg_economics().profit
    }

    pub fn profit_margin(&self) -> Decimal {
        self.egg_economics().profit_margin
    }

    pub fn sorted_feeds(&self, key: &FeedSortKey, direction: SortDirection) -> Vec<&Feed> {
        analytics::sorted_feeds(&self.feeds, key, direction)
    }

    pub fn total_hens(&self) -> u64 {
        analytics::total_hens(&self.flocks)
    }

    pub fn daily_egg_production(&self) -> u64 {
        analytics::daily_egg_production(&self.flocks, self.lay_rate)
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    pub fn feed(&self, id: RecordId) -> Option<&Feed> {
        self.feeds.iter().find(|f| f.id == id)
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn inventory_item(&self, id: RecordId) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.id == id)
    }

    pub fn flocks(&self) -> &[Flock] {
        &self.flocks
    }

    pub fn flock_details(&self) -> &[FlockDetail] {
        &self.flock_details
    }

    pub fn flock_detail(&self, flock_id: RecordId) -> Option<&FlockDetail> {
        self.flock_details.iter().find(|d| d.flock_id == flock_id)
    }

    /// Recorded monthly revenue, in calendar order.
    pub fn revenue_records(&self) -> &[RevenueRecord] {
        &self.revenue
    }

    /// Revenue recorded across every month of the year.
    pub fn annual_revenue(&self) -> Decimal {
        self.revenue
            .iter()
            .map(RevenueRecord::total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Annual revenue as a percentage of the revenue goal, one decimal place.
    /// 0 when the goal is 0.
    pub fn revenue_goal_progress(&self) -> Decimal {
        let goal = self.annual_goals.revenue;
        if goal.is_zero() {
            return Decimal::ZERO;
        }
        self.annual_revenue()
            .checked_div(goal)
            .unwrap_or(Decimal::MAX)
            .saturating_mul(Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn annual_goals(&self) -> &AnnualGoals {
        &self.annual_goals
    }

    pub fn catalog(&self) -> &NutrientCatalog {
        &self.catalog
    }

    pub fn egg_settings(&self) -> &EggSettings {
        &self.egg_settings
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Notifications, newest first.
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    // --- Feeds ---

    pub fn add_feed(&mut self, feed: NewFeed) -> Result<RecordId, LedgerError> {
        let feed = feed.normalize(&self.catalog)?;
        let id = self.allocate_id()?;
        tracing::info!(feed_id = id, name = %feed.name, "Feed added.");
        self.feeds.push(feed.into_feed(id));
        self.recompute();
        Ok(id)
    }

    /// Replaces every field of feed `id` except its identity.
    pub fn update_feed(&mut self, id: RecordId, feed: NewFeed) -> Result<(), LedgerError> {
        let feed = feed.normalize(&self.catalog)?;
        let slot = self
            .feeds
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(LedgerError::FeedNotFound(id))?;
        *slot = feed.into_feed(id);
        tracing::info!(feed_id = id, "Feed updated.");
        self.recompute();
        Ok(())
    }

    /// Deletes a feed that no purchase references.
    pub fn delete_feed(&mut self, id: RecordId) -> Result<Feed, LedgerError> {
        let index = self
            .feeds
            .iter()
            .position(|f| f.id == id)
            .ok_or(LedgerError::FeedNotFound(id))?;

        let references = self.purchases.iter().filter(|p| p.feed_id == id).count();
        if references > 0 {
            tracing::warn!(
                feed_id = id,
                purchases = references,
                "Refusing to delete a feed that purchases reference."
            );
            return Err(LedgerError::FeedInUse {
                feed_id: id,
                purchases: references,
            });
        }

        let feed = self.feeds.remove(index);
        tracing::info!(feed_id = id, name = %feed.name, "Feed deleted.");
        self.recompute();
        Ok(feed)
    }

    // --- Purchases ---

    pub fn add_purchase(&mut self, purchase: NewPurchase) -> Result<RecordId, LedgerError> {
        purchase.validate()?;
        if self.feed(purchase.feed_id).is_none() {
            return Err(LedgerError::FeedNotFound(purchase.feed_id));
        }
        let id = self.allocate_id()?;
        tracing::info!(
            purchase_id = id,
            feed_id = purchase.feed_id,
            quantity = %purchase.quantity,
            "Purchase recorded."
        );
        self.purchases.push(purchase.into_purchase(id));
        self.recompute();
        Ok(id)
    }

    pub fn delete_purchase(&mut self, id: RecordId) -> Result<Purchase, LedgerError> {
        let index = self
            .purchases
            .iter()
            .position(|p| p.id == id)
            .ok_or(LedgerError::PurchaseNotFound(id))?;
        let purchase = self.purchases.remove(index);
        tracing::info!(purchase_id = id, "Purchase deleted.");
        self.recompute();
        Ok(purchase)
    }

    // --- Inventory ---

    pub fn add_inventory_item(&mut self, item: NewInventoryItem) -> Result<RecordId, LedgerError> {
        item.validate()?;
        let id = self.allocate_id()?;
        let today = today();
        let mut item = item.into_item(id, today);
        stock::refresh_item(&mut item, self.policy.as_ref());
        if item.status.is_alert() {
            self.notifications.notify_stock_alert(&item, today)?;
        }
        tracing::info!(
            item_id = id,
            name = %item.name,
            status = %item.status,
            "Inventory item added."
        );
        self.inventory.push(item);
        self.recompute();
        Ok(id)
    }

    /// Applies a stock adjustment and returns the item's new status.
    ///
    /// A change into `warning` or `critical` raises a stock alert unless an
    /// equivalent alert is still unread.
    pub fn adjust_inventory(
        &mut self,
        id: RecordId,
        adjustment: StockAdjustment,
    ) -> Result<InventoryStatus, LedgerError> {
        let today = today();
        let item = self
            .inventory
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(LedgerError::InventoryItemNotFound(id))?;

        item.current_stock = stock::apply_adjustment(item.current_stock, adjustment)?;
        item.last_updated = today;
        let previous = stock::refresh_item(item, self.policy.as_ref());
        let status = item.status;
        tracing::info!(
            item_id = id,
            ?adjustment,
            stock = %item.current_stock,
            %status,
            "Inventory adjusted."
        );

        if status != previous && status.is_alert() {
            self.notifications.notify_stock_alert(item, today)?;
        }
        self.recompute();
        Ok(status)
    }

    /// Recomputes every derived field and raises alerts for items that need one.
    pub fn sync(&mut self) -> Result<SyncSummary, LedgerError> {
        self.recompute();

        let today = today();
        let mut summary = SyncSummary::default();
        for item in &self.inventory {
            match item.status {
                InventoryStatus::Warning => summary.warning += 1,
                InventoryStatus::Critical => summary.critical += 1,
                InventoryStatus::Normal => continue,
            }
            if self.notifications.notify_stock_alert(item, today)?.is_some() {
                summary.alerts_raised += 1;
            }
        }
        tracing::info!(
            warning = summary.warning,
            critical = summary.critical,
            alerts_raised = summary.alerts_raised,
            "Sync complete."
        );
        Ok(summary)
    }

    // --- Settings ---

    pub fn update_egg_settings(&mut self, settings: EggSettings) -> Result<(), LedgerError> {
        if settings.egg_price.is_sign_negative() {
            return Err(CoreError::InvalidInput(
                "egg price".to_string(),
                format!("{} is negative", settings.egg_price),
            )
            .into());
        }
        self.egg_settings = settings;
        tracing::info!(
            egg_count = settings.egg_count,
            egg_price = %settings.egg_price,
            "Egg settings updated."
        );
        self.recompute();
        Ok(())
    }

    /// Selects the month the egg economics are evaluated for.
    pub fn set_month(&mut self, month: Month) {
        self.calendar.current_month = month;
        self.recompute();
    }

    /// Moves every monthly query to `year`. The selected month is kept.
    pub fn set_year(&mut self, year: i32) -> Result<(), LedgerError> {
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(CoreError::InvalidInput(
                "year".to_string(),
                format!("{year} is outside the supported range"),
            )
            .into());
        }
        if year != self.calendar.year {
            tracing::info!(from = self.calendar.year, to = year, "Calendar year changed.");
        }
        self.calendar.year = year;
        self.recompute();
        Ok(())
    }

    // --- Flocks ---

    pub fn add_flock(
        &mut self,
        name: &str,
        bird_count: u32,
        age_weeks: u32,
    ) -> Result<RecordId, LedgerError> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "flock name".to_string(),
                "must not be empty".to_string(),
            )
            .into());
        }
        let id = self.allocate_id()?;
        self.flocks.push(Flock {
            id,
            name: name.trim().to_string(),
            bird_count,
            age_weeks,
        });
        self.recompute();
        Ok(id)
    }

    pub fn update_flock(
        &mut self,
        id: RecordId,
        bird_count: u32,
        age_weeks: u32,
    ) -> Result<(), LedgerError> {
        let flock = self
            .flocks
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(LedgerError::FlockNotFound(id))?;
        flock.bird_count = bird_count;
        flock.age_weeks = age_weeks;
        tracing::info!(flock_id = id, bird_count, age_weeks, "Flock updated.");
        self.recompute();
        Ok(())
    }

    /// Merges `update` into the detail record of `flock_id`, creating the
    /// record on first use. Returns the detail's id.
    pub fn update_flock_detail(
        &mut self,
        flock_id: RecordId,
        update: FlockDetailUpdate,
    ) -> Result<RecordId, LedgerError> {
        update.validate()?;
        if !self.flocks.iter().any(|f| f.id == flock_id) {
            return Err(LedgerError::FlockNotFound(flock_id));
        }
        let index = match self.flock_details.iter().position(|d| d.flock_id == flock_id) {
            Some(index) => index,
            None => {
                let id = self.allocate_id()?;
                self.flock_details.push(FlockDetail::new(id, flock_id));
                self.flock_details.len() - 1
            }
        };
        let detail = &mut self.flock_details[index];
        detail.merge(update);
        tracing::info!(
            flock_id,
            detail_id = detail.id,
            health = %detail.health_status,
            "Flock detail updated."
        );
        let id = detail.id;
        self.recompute();
        Ok(id)
    }

    // --- Revenue and goals ---

    /// Records the revenue of one month, replacing any earlier record for it.
    pub fn record_revenue(&mut self, record: RevenueRecord) -> Result<(), LedgerError> {
        record.validate()?;
        match self.revenue.iter_mut().find(|r| r.month == record.month) {
            Some(existing) => *existing = record,
            None => {
                self.revenue.push(record);
                self.revenue.sort_by_key(|r| r.month.number_from_month());
            }
        }
        tracing::info!(
            month = record.month.name(),
            total = %record.total(),
            "Revenue recorded."
        );
        self.recompute();
        Ok(())
    }

    /// Replaces the annual goals.
    pub fn update_annual_goals(&mut self, goals: AnnualGoals) -> Result<(), LedgerError> {
        goals.validate()?;
        self.annual_goals = goals;
        tracing::info!(revenue = %goals.revenue, profit = %goals.profit, "Annual goals updated.");
        self.recompute();
        Ok(())
    }

    // --- Nutrients ---

    /// Adds a custom nutrient, set to 0 on every existing feed. Returns its key.
    pub fn add_custom_nutrient(&mut self, name: &str) -> Result<String, LedgerError> {
        let key = self.catalog.add_custom(name)?;
        for feed in &mut self.feeds {
            feed.nutrients.insert(key.clone(), Decimal::ZERO);
        }
        tracing::info!(%key, "Custom nutrient added.");
        self.recompute();
        Ok(key)
    }

    /// Removes a custom nutrient from the catalog and from every feed.
    pub fn delete_nutrient(&mut self, key: &str) -> Result<(), LedgerError> {
        self.catalog.remove(key)?;
        for feed in &mut self.feeds {
            feed.nutrients.remove(key);
        }
        tracing::info!(%key, "Custom nutrient deleted.");
        self.recompute();
        Ok(())
    }

    pub fn toggle_nutrient_visibility(&mut self, key: &str) -> Result<bool, LedgerError> {
        let visible = self.catalog.toggle_visibility(key)?;
        self.recompute();
        Ok(visible)
    }

    // --- Notifications ---

    pub fn mark_notification_read(&mut self, id: RecordId) -> Result<(), LedgerError> {
        self.notifications.mark_read(id)?;
        Ok(())
    }

    /// Marks every notification read and returns how many changed.
    pub fn mark_all_notifications_read(&mut self) -> usize {
        self.notifications.mark_all_read()
    }

    fn allocate_id(&mut self) -> Result<RecordId, LedgerError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(LedgerError::IdsExhausted)?;
        Ok(id)
    }

    /// Brings every derived inventory field in line with the base records.
    fn recompute(&mut self) {
        for item in &mut self.inventory {
            stock::refresh_item(item, self.policy.as_ref());
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn check_unique(
    kind: &'static str,
    ids: impl Iterator<Item = RecordId>,
) -> Result<(), LedgerError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(LedgerError::DuplicateId { kind, id });
        }
    }
    Ok(())
}
