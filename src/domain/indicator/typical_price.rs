//! Typical price: (high + low + close) / 3, appended as a new column.

use polars::prelude::{col, lit, Expr, LazyFrame};
use tracing::debug;

use crate::domain::error::FintaError;
use crate::domain::lazy::{ensure_lazy, IntoLazyFrame};
use crate::domain::schema::validate_frame;

pub const TYPICAL_PRICE_COLUMN: &str = "typical_price";

pub fn typical_price_expr() -> Expr {
    (col("high") + col("low") + col("close")) / lit(3.0)
}

/// Append `typical_price`; every input column, OHLCV included, is kept.
pub fn typical_price(ohlc: impl IntoLazyFrame) -> Result<LazyFrame, FintaError> {
    let mut frame = ensure_lazy(ohlc);
    validate_frame(&mut frame, false)?;
    debug!(indicator = "typical_price", "appending column");
    Ok(frame.with_column(typical_price_expr().alias(TYPICAL_PRICE_COLUMN)))
}
