//! # Henhouse Analytics Engine
//!
//! This crate turns raw feed, purchase and flock records into the figures the
//! dashboard shows: monthly feed cost, each feed's share of it, the weighted
//! nutrient mix, and the egg economics built on top of the cost.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   state container or any I/O. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `FarmMetrics` borrows the record collections
//!   and recomputes every figure on demand. Nothing is cached.
//! - **Total functions:** Every ratio is zero-guarded and all arithmetic
//!   saturates at the `Decimal` bounds. Queries return 0 or an empty list
//!   instead of failing.
//!
//! ## Public API
//!
//! - `FarmMetrics`: The calculator over feeds, purchases and the nutrient catalog.
//! - `EggEconomicsReport`: Unit cost, break-even, profit and margin for a month.
//! - `FeedCostShare`, `FeedNutrientShare`, `MonthlyNutritionRow`: Report rows.
//! - `total_hens`, `daily_egg_production`, `sorted_feeds`: Flock and listing helpers.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod production;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::FarmMetrics;
pub use production::{daily_egg_production, sorted_feeds, total_hens};
pub use report::{EggEconomicsReport, FeedCostShare, FeedNutrientShare, MonthlyNutritionRow};
