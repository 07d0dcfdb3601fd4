use crate::error::EventsError;
use chrono::NaiveDate;
use core_types::{InventoryItem, Notification, NotificationKind, RecordId, StockAlert};
use std::collections::VecDeque;

/// A bounded, newest-first log of notifications.
///
/// New entries are prepended; once the log holds `cap` entries the oldest
/// one is dropped. Entries are only ever changed by marking them read.
///
/// Unread stock alerts are tracked separately by item and status, so an
/// alert that has scrolled out of the log still suppresses a repeat.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    pending: Vec<StockAlert>,
    cap: usize,
    next_id: RecordId,
}

impl NotificationLog {
    /// Creates an empty log keeping at most `cap` entries (minimum 1).
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            pending: Vec::new(),
            cap: cap.max(1),
            next_id: 1,
        }
    }

    /// Rebuilds a log from stored entries (newest first) and pending alerts.
    ///
    /// Entries beyond `cap` are discarded and id allocation resumes above the
    /// largest id seen in either list.
    pub fn from_entries(
        entries: Vec<Notification>,
        pending: Vec<StockAlert>,
        cap: usize,
    ) -> Result<Self, EventsError> {
        let mut log = Self::new(cap);
        let max_id = entries
            .iter()
            .map(|n| n.id)
            .chain(pending.iter().map(|a| a.notification_id))
            .max()
            .unwrap_or(0);
        log.next_id = max_id.checked_add(1).ok_or(EventsError::IdsExhausted)?;
        log.entries = entries.into_iter().take(log.cap).collect();
        log.pending = pending;
        Ok(log)
    }

    /// Prepends a new unread notification and returns its id.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: String,
        date: NaiveDate,
    ) -> Result<RecordId, EventsError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(EventsError::IdsExhausted)?;
        self.entries.push_front(Notification {
            id,
            kind,
            message,
            date,
            read: false,
        });
        self.entries.truncate(self.cap);
        Ok(id)
    }

    /// Raises a stock alert for `item` unless one for the same item and
    /// status is still unread.
    ///
    /// Returns the new notification's id when one was emitted.
    pub fn notify_stock_alert(
        &mut self,
        item: &InventoryItem,
        date: NaiveDate,
    ) -> Result<Option<RecordId>, EventsError> {
        if !item.status.is_alert() {
            return Ok(None);
        }
        let status = item.status.label();
        if self
            .pending
            .iter()
            .any(|a| a.item_id == item.id && a.status == item.status)
        {
            tracing::debug!(
                item = %item.name,
                status,
                "Stock alert already pending, not repeating it."
            );
            return Ok(None);
        }

        let message = format!(
            "{} stock is {}: {} {} remaining",
            item.name,
            status,
            item.current_stock.normalize(),
            item.unit
        );
        let id = self.push(NotificationKind::Inventory, message, date)?;
        self.pending.push(StockAlert {
            notification_id: id,
            item_id: item.id,
            status: item.status,
        });
        tracing::warn!(item = %item.name, status, "Raising stock alert.");
        Ok(Some(id))
    }

    /// Unread stock alerts, oldest first.
    pub fn pending_alerts(&self) -> &[StockAlert] {
        &self.pending
    }

    pub fn mark_read(&mut self, id: RecordId) -> Result<(), EventsError> {
        let notification = self
            .entries
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(EventsError::NotificationNotFound(id))?;
        notification.read = true;
        self.pending.retain(|a| a.notification_id != id);
        Ok(())
    }

    /// Marks every entry read and returns how many were unread before.
    ///
    /// Pending stock alerts are cleared too, including those whose entry has
    /// already left the log.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.entries.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        self.pending.clear();
        changed
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
