//! Simple Moving Median.
//!
//! SMM(n)[i] = median(C[i-n+1..=i]); an even window averages the two middle values.

use polars::prelude::LazyFrame;

use crate::domain::error::FintaError;
use crate::domain::expression::WindowFunction;
use crate::domain::indicator::window_indicator;
use crate::domain::lazy::IntoLazyFrame;

/// Replace every OHLC(V) column with `<col>_smm_<period>`.
pub fn simple_moving_median(
    ohlc: impl IntoLazyFrame,
    period: usize,
    identifier_column: Option<&str>,
) -> Result<LazyFrame, FintaError> {
    window_indicator(ohlc, WindowFunction::Median, period, identifier_column, "smm")
}
