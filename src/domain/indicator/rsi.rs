//! RSI (Relative Strength Index).
//!
//! Uses Wilder's smoothing for average gain/loss:
//! - gain/loss: positive/negative part of C[i] - C[i-1]
//! - first average: simple mean of the first n gains/losses
//! - subsequent: avg[i] = (avg[i-1] * (n-1) + x[i]) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n rows of each partition are null (n price changes are needed).

use polars::prelude::{col, lit, when, DataType, EWMOptions, Expr, LazyFrame, NULL};
use tracing::debug;

use crate::domain::error::FintaError;
use crate::domain::expression::{WindowExpr, WindowFunction};
use crate::domain::lazy::{ensure_lazy, over_group, replace_columns, IntoLazyFrame};
use crate::domain::schema::{validate_frame, OHLC_COLUMNS};

pub const DEFAULT_PERIOD: usize = 14;

fn wilder_options(period: usize) -> EWMOptions {
    EWMOptions {
        alpha: 1.0 / period as f64,
        adjust: false,
        min_periods: 1,
        ignore_nulls: true,
        ..Default::default()
    }
}

/// Wilder average of `values`: the first full window's mean, then the
/// unadjusted ewm recursion from the following row.
fn wilder_average(values: Expr, period: usize) -> Expr {
    let seed = WindowExpr::new(WindowFunction::Mean, period).apply(values.clone());
    let seed_row = seed.clone().is_not_null().and(seed.clone().shift(lit(1)).is_null());
    // nulls before the seed row are skipped by the recursion
    let seeded = when(seed_row)
        .then(seed.clone())
        .when(seed.shift(lit(1)).is_not_null())
        .then(values)
        .otherwise(lit(NULL).cast(DataType::Float64));
    seeded.ewm_mean(wilder_options(period))
}

/// RSI of one column, ungrouped.
pub fn rsi_expr(column: &str, period: usize) -> Expr {
    let delta = col(column) - col(column).shift(lit(1));
    // the first delta is null and stays null through both branches
    let gain = when(delta.clone().lt(lit(0.0)))
        .then(lit(0.0))
        .otherwise(delta.clone());
    let loss = when(delta.clone().gt(lit(0.0)))
        .then(lit(0.0))
        .otherwise(lit(0.0) - delta);

    let avg_gain = wilder_average(gain, period);
    let avg_loss = wilder_average(loss, period);

    when(avg_loss.clone().eq(lit(0.0)))
        .then(lit(100.0))
        .otherwise(lit(100.0) - lit(100.0) / (lit(1.0) + avg_gain / avg_loss))
}

/// Replace every OHLC column with `<col>_rsi_<period>`; volume passes through.
pub fn rsi(
    ohlc: impl IntoLazyFrame,
    period: usize,
    identifier_column: Option<&str>,
) -> Result<LazyFrame, FintaError> {
    let mut frame = ensure_lazy(ohlc);
    let schema = validate_frame(&mut frame, false)?;
    debug!(
        indicator = "rsi",
        period,
        identifier = identifier_column.unwrap_or("-"),
        "building oscillator"
    );

    let exprs = OHLC_COLUMNS
        .iter()
        .map(|column| {
            over_group(rsi_expr(column, period), identifier_column)
                .alias(format!("{column}_rsi_{period}"))
        })
        .collect();
    Ok(replace_columns(frame, &schema, &OHLC_COLUMNS, exprs))
}
