use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("Stock adjustments must not be negative, got {0}")]
    NegativeAdjustment(Decimal),
}
