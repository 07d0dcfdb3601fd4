//! # Henhouse Ledger
//!
//! The state container for a farm: it owns feeds, purchases, inventory,
//! flocks and their details, monthly revenue, annual goals, egg settings, the
//! nutrient catalog and the notification log, and exposes every change as a
//! named operation.
//!
//! ## Architectural Principles
//!
//! - **Explicit state:** `FarmState` is an ordinary value. Callers create one
//!   (or restore one from a `FarmSnapshot`) and pass it where it is needed.
//! - **Consistent after every call:** Mutations recompute derived inventory
//!   fields synchronously before returning.
//! - **Rejected, not failed:** Refused operations (deleting a feed that is in
//!   use, adding a purchase for an unknown feed) come back as `LedgerError`
//!   values and leave the state untouched.

pub mod error;
pub mod snapshot;
pub mod state;

pub use error::LedgerError;
pub use snapshot::FarmSnapshot;
pub use state::{FarmState, SyncSummary};
