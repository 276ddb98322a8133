//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(slow) - EMA(fast)
//! Signal Line = EMA(signal) of MACD Line
//!
//! Both EMAs use span weighting (alpha = 2/(span+1)) and emit from the first row.
//! Default parameters: fast=12, slow=26, signal=9

use polars::prelude::{col, LazyFrame};
use tracing::debug;

use crate::domain::error::FintaError;
use crate::domain::expression::{WindowExpr, WindowFunction};
use crate::domain::lazy::{ensure_lazy, over_group, replace_columns, IntoLazyFrame};
use crate::domain::schema::{validate_frame, OHLC_COLUMNS};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// Replace every OHLC column with `<col>_macd_<fast>_<slow>` and append
/// `<col>_macd_<fast>_<slow>_signal`; volume passes through.
pub fn macd(
    ohlc: impl IntoLazyFrame,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    identifier_column: Option<&str>,
) -> Result<LazyFrame, FintaError> {
    let mut frame = ensure_lazy(ohlc);
    let schema = validate_frame(&mut frame, false)?;
    debug!(
        indicator = "macd",
        fast_period,
        slow_period,
        signal_period,
        identifier = identifier_column.unwrap_or("-"),
        "building two-stage ewm"
    );

    let suffix = format!("_macd_{fast_period}_{slow_period}");
    let fast = WindowExpr::new(WindowFunction::EwmMean, fast_period);
    let slow = WindowExpr::new(WindowFunction::EwmMean, slow_period);

    let lines = OHLC_COLUMNS
        .iter()
        .map(|column| {
            let line = slow.apply(col(*column)) - fast.apply(col(*column));
            over_group(line, identifier_column).alias(format!("{column}{suffix}"))
        })
        .collect();
    let frame = replace_columns(frame, &schema, &OHLC_COLUMNS, lines);

    // The signal stage reads the MACD columns, so it needs its own partitioning.
    let line_columns: Vec<String> = OHLC_COLUMNS
        .iter()
        .map(|column| format!("{column}{suffix}"))
        .collect();
    let line_refs: Vec<&str> = line_columns.iter().map(String::as_str).collect();
    let signals = WindowExpr::new(WindowFunction::EwmMean, signal_period).build(
        &line_refs,
        identifier_column,
        "_signal",
    );
    Ok(frame.with_columns(signals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{adjusted_ewm, close_frame, f64_values, multi_ticker_frame, ohlcv_frame};
    use approx::assert_abs_diff_eq;

    #[test]
    fn macd_columns() {
        let out = macd(ohlcv_frame(60), DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL, None).unwrap().collect().unwrap();
        assert_eq!(
            out.get_column_names_str(),
            vec![
                "volume",
                "open_macd_12_26",
                "high_macd_12_26",
                "low_macd_12_26",
                "close_macd_12_26",
                "open_macd_12_26_signal",
                "high_macd_12_26_signal",
                "low_macd_12_26_signal",
                "close_macd_12_26_signal",
            ]
        );
        assert_eq!(out.height(), 60);
    }

    #[test]
    fn macd_line_is_slow_minus_fast() {
        let closes = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let out = macd(close_frame(&closes), 3, 5, 2, None)
            .unwrap()
            .collect()
            .unwrap();
        let fast = adjusted_ewm(&closes, 2.0 / 4.0);
        let slow = adjusted_ewm(&closes, 2.0 / 6.0);
        let line = f64_values(&out, "close_macd_3_5");
        for i in 0..closes.len() {
            assert_abs_diff_eq!(line[i].unwrap(), slow[i] - fast[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn macd_signal_is_ema_of_line() {
        let closes = [5.0, 3.0, 8.0, 1.0, 9.0, 4.0, 7.0, 2.0, 6.0];
        let out = macd(close_frame(&closes), 2, 4, 3, None)
            .unwrap()
            .collect()
            .unwrap();
        let line: Vec<f64> = f64_values(&out, "close_macd_2_4")
            .into_iter()
            .map(Option::unwrap)
            .collect();
        let expected = adjusted_ewm(&line, 2.0 / 4.0);
        let signal = f64_values(&out, "close_macd_2_4_signal");
        for i in 0..closes.len() {
            assert_abs_diff_eq!(signal[i].unwrap(), expected[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn macd_constant_series_is_zero() {
        let out = macd(close_frame(&[42.0; 30]), 3, 6, 2, None)
            .unwrap()
            .collect()
            .unwrap();
        for value in f64_values(&out, "close_macd_3_6_signal") {
            assert_abs_diff_eq!(value.unwrap(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn macd_signal_grouped_per_ticker() {
        let df = multi_ticker_frame(&["AAPL", "MSFT", "GOOG"], 40);
        let out = macd(df, 3, 6, 2, Some("ticker"))
            .unwrap()
            .collect()
            .unwrap();
        let signal = f64_values(&out, "close_macd_3_6_signal");
        assert_eq!(signal[..40], signal[40..80]);
        assert_eq!(signal[..40], signal[80..]);
        assert_eq!(out.get_column_names_str()[..2], ["volume", "ticker"]);
    }

    #[test]
    fn macd_requires_ohlc() {
        let df = ohlcv_frame(5).drop("close").unwrap();
        assert!(matches!(
            macd(df, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL, None).err().unwrap(),
            FintaError::Schema(_)
        ));
    }
}
