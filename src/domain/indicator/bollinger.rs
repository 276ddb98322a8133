//! Bollinger Bands.
//!
//! Bollinger Bands consist of:
//! - Middle: moving average over n periods (SMA by default, or EMA/SMM)
//! - Upper: Middle + (std × MSD)
//! - Lower: Middle - (std × MSD)
//!
//! Where MSD is the rolling sample standard deviation over the same n periods.
//!
//! Default parameters: period=20, std=2.0, moving average=SMA

use polars::prelude::{col, lit, Expr, LazyFrame};
use tracing::debug;

use crate::domain::error::FintaError;
use crate::domain::expression::{WindowExpr, WindowFunction};
use crate::domain::indicator::MovingAverage;
use crate::domain::lazy::{ensure_lazy, over_group, replace_columns, IntoLazyFrame};
use crate::domain::schema::{validate_frame, OHLC_COLUMNS};

pub const DEFAULT_STD: f64 = 2.0;

fn bands(column: &str, period: usize, std: f64, ma: MovingAverage) -> [(Expr, &'static str); 3] {
    let middle = WindowExpr::new(ma.window_function(), period).apply(col(column));
    let deviation = WindowExpr::new(WindowFunction::Std, period).apply(col(column)) * lit(std);
    [
        (middle.clone() + deviation.clone(), "upper"),
        (middle.clone(), "middle"),
        (middle - deviation, "lower"),
    ]
}

/// Replace every OHLC column with `<col>_bb_upper_<period>`,
/// `<col>_bb_middle_<period>` and `<col>_bb_lower_<period>`.
pub fn bbands(
    ohlc: impl IntoLazyFrame,
    period: usize,
    std: f64,
    identifier_column: Option<&str>,
    ma: MovingAverage,
) -> Result<LazyFrame, FintaError> {
    let mut frame = ensure_lazy(ohlc);
    let schema = validate_frame(&mut frame, false)?;
    debug!(
        indicator = "bbands",
        period,
        std,
        ma = %ma,
        identifier = identifier_column.unwrap_or("-"),
        "building bands"
    );

    let exprs = OHLC_COLUMNS
        .iter()
        .flat_map(|column| {
            bands(column, period, std, ma).map(|(expr, band)| {
                over_group(expr, identifier_column).alias(format!("{column}_bb_{band}_{period}"))
            })
        })
        .collect();
    Ok(replace_columns(frame, &schema, &OHLC_COLUMNS, exprs))
}
