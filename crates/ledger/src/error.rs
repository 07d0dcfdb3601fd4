use chrono::Month;
use core_types::{CoreError, RecordId};
use events::EventsError;
use stock::StockError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Feed {feed_id} is referenced by {purchases} purchase(s) and cannot be deleted")]
    FeedInUse { feed_id: RecordId, purchases: usize },

    #[error("Feed {0} was not found")]
    FeedNotFound(RecordId),

    #[error("Purchase {0} was not found")]
    PurchaseNotFound(RecordId),

    #[error("Inventory item {0} was not found")]
    InventoryItemNotFound(RecordId),

    #[error("Flock {0} was not found")]
    FlockNotFound(RecordId),

    #[error("Duplicate {kind} id {id} in snapshot")]
    DuplicateId { kind: &'static str, id: RecordId },

    #[error("Revenue for {} is recorded more than once in snapshot", .0.name())]
    DuplicateRevenueMonth(Month),

    #[error("Record ids are exhausted")]
    IdsExhausted,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Events(#[from] EventsError),
}
