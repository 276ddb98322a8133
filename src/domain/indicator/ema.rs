//! Exponential Moving Average.
//!
//! alpha = 2/(n+1), adjusted weights: EMA[i] = sum((1-alpha)^j * C[i-j]) / sum((1-alpha)^j).
//! Emits from the first row of each partition.

use polars::prelude::LazyFrame;

use crate::domain::error::FintaError;
use crate::domain::expression::WindowFunction;
use crate::domain::indicator::window_indicator;
use crate::domain::lazy::IntoLazyFrame;

/// Replace every OHLC(V) column with `<col>_ema_<period>`.
pub fn exponential_moving_average(
    ohlc: impl IntoLazyFrame,
    period: usize,
    identifier_column: Option<&str>,
) -> Result<LazyFrame, FintaError> {
    window_indicator(ohlc, WindowFunction::EwmMean, period, identifier_column, "ema")
}
