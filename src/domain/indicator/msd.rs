//! Moving Standard Deviation.
//!
//! Sample standard deviation over n values:
//! MSD(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) rows are null.

use polars::prelude::LazyFrame;

use crate::domain::error::FintaError;
use crate::domain::expression::WindowFunction;
use crate::domain::indicator::window_indicator;
use crate::domain::lazy::IntoLazyFrame;

/// Replace every OHLC(V) column with `<col>_msd_<period>`.
pub fn moving_std(
    ohlc: impl IntoLazyFrame,
    period: usize,
    identifier_column: Option<&str>,
) -> Result<LazyFrame, FintaError> {
    window_indicator(ohlc, WindowFunction::Std, period, identifier_column, "msd")
}
