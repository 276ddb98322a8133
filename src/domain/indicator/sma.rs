//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]) for every OHLC(V) column.
//! Warmup: first (n-1) rows of each partition are null.

use polars::prelude::LazyFrame;

use crate::domain::error::FintaError;
use crate::domain::expression::WindowFunction;
use crate::domain::indicator::window_indicator;
use crate::domain::lazy::IntoLazyFrame;

/// Replace every OHLC(V) column with `<col>_sma_<period>`.
///
/// The table must already be sorted by time within each instrument.
pub fn simple_moving_average(
    ohlc: impl IntoLazyFrame,
    period: usize,
    identifier_column: Option<&str>,
) -> Result<LazyFrame, FintaError> {
    window_indicator(ohlc, WindowFunction::Mean, period, identifier_column, "sma")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{f64_values, last_f64, multi_ticker_frame, ohlcv_frame};

    #[test]
    fn sma_no_volume() {
        let df = ohlcv_frame(3000).drop("volume").unwrap();
        let out = simple_moving_average(df, 5, None).unwrap().collect().unwrap();
        assert_eq!(out.shape(), (3000, 4));
        assert_eq!(last_f64(&out, "close_sma_5"), 2997.0);
        assert_eq!(
            out.get_column_names_str(),
            vec!["open_sma_5", "high_sma_5", "low_sma_5", "close_sma_5"]
        );
    }

    #[test]
    fn sma_volume() {
        let out = simple_moving_average(ohlcv_frame(3000), 5, None)
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(out.shape(), (3000, 5));
        assert_eq!(last_f64(&out, "volume_sma_5"), 2997.0);
        assert_eq!(
            out.get_column_names_str(),
            vec![
                "open_sma_5",
                "high_sma_5",
                "low_sma_5",
                "close_sma_5",
                "volume_sma_5"
            ]
        );
    }

    #[test]
    fn sma_passes_identifier_through_first() {
        let df = multi_ticker_frame(&["AAPL", "MSFT"], 100);
        let out = simple_moving_average(df, 5, Some("ticker"))
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(out.shape(), (200, 6));
        assert_eq!(out.get_column_names_str()[0], "ticker");
        assert_eq!(last_f64(&out, "volume_sma_5"), 97.0);
    }

    #[test]
    fn sma_warmup_and_window_values() {
        let out = simple_moving_average(ohlcv_frame(10), 3, None)
            .unwrap()
            .collect()
            .unwrap();
        let close = f64_values(&out, "close_sma_3");
        assert_eq!(close[0], None);
        assert_eq!(close[1], None);
        for (i, value) in close.iter().enumerate().skip(2) {
            assert_eq!(*value, Some(i as f64 - 1.0));
        }
    }

    #[test]
    fn sma_high_offset_follows_input() {
        let out = simple_moving_average(ohlcv_frame(10), 4, None)
            .unwrap()
            .collect()
            .unwrap();
        // high[i] = i + 1, so mean(high[6..=9]) = 8.5
        assert_eq!(last_f64(&out, "high_sma_4"), 8.5);
        assert_eq!(last_f64(&out, "low_sma_4"), 6.5);
    }
}
