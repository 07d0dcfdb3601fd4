//! # Henhouse Export
//!
//! The adapter between a `FarmState` and the outside world: CSV reports for
//! spreadsheets and a full JSON backup that can be restored later.
//!
//! ## Public API
//!
//! - `write_feeds_csv`, `write_purchases_csv`, `write_nutrition_csv`: write a
//!   table to any `std::io::Write`.
//! - `backup_json` / `restore_json`: the versioned whole-state backup, with
//!   `save_backup` / `load_backup` as file-based shorthands.

pub mod backup;
pub mod error;
pub mod tables;

pub use backup::{
    BACKUP_FORMAT_VERSION, Backup, backup_json, load_backup, restore_json, save_backup,
};
pub use error::ExportError;
pub use tables::{write_feeds_csv, write_nutrition_csv, write_purchases_csv};
