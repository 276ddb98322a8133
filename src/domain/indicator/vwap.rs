//! Volume Weighted Average Price.
//!
//! VWAP[i] = sum(V[0..=i] * TP[0..=i]) / sum(V[0..=i]), TP = typical price.
//! Accumulates from the first row of each partition; appended as `vwap`.

use polars::prelude::{col, DataType, LazyFrame};
use tracing::debug;

use crate::domain::error::FintaError;
use crate::domain::indicator::typical_price::typical_price_expr;
use crate::domain::lazy::{ensure_lazy, over_group, IntoLazyFrame};
use crate::domain::schema::{validate_frame, VOLUME_COLUMN};

pub const VWAP_COLUMN: &str = "vwap";

/// Append `vwap`; requires an OHLCV table (integer volume accepted).
pub fn vwap(
    ohlcv: impl IntoLazyFrame,
    identifier_column: Option<&str>,
) -> Result<LazyFrame, FintaError> {
    let mut frame = ensure_lazy(ohlcv);
    validate_frame(&mut frame, true)?;
    debug!(
        indicator = "vwap",
        identifier = identifier_column.unwrap_or("-"),
        "appending column"
    );

    let volume = col(VOLUME_COLUMN).cast(DataType::Float64);
    let expr = (volume.clone() * typical_price_expr()).cum_sum(false) / volume.cum_sum(false);
    Ok(frame.with_column(over_group(expr, identifier_column).alias(VWAP_COLUMN)))
}
