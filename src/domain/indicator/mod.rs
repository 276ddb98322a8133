//! Technical indicator library.
//!
//! Every indicator takes an eager or lazy table, validates its OHLC(V) shape
//! and returns a deferred table with the same rows in the same order:
//! - `Indicator`: indicator identity + parameters, used to dispatch by value
//! - `MovingAverage`: middle-band strategy for Bollinger Bands
//!
//! Source price columns are replaced by suffixed indicator columns; other
//! columns pass through first. Typical price and VWAP append instead.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod msd;
pub mod rsi;
pub mod sma;
pub mod smm;
pub mod typical_price;
pub mod vwap;

use std::fmt;
use std::str::FromStr;

use polars::prelude::LazyFrame;
use tracing::debug;

use crate::domain::error::FintaError;
use crate::domain::expression::{WindowExpr, WindowFunction};
use crate::domain::lazy::{ensure_lazy, replace_columns, IntoLazyFrame};
use crate::domain::schema::ohlcv_columns;

pub const DEFAULT_PERIOD: usize = 20;

/// Where the middle band of Bollinger Bands comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MovingAverage {
    #[default]
    Simple,
    Exponential,
    Median,
}

impl MovingAverage {
    pub fn window_function(self) -> WindowFunction {
        match self {
            MovingAverage::Simple => WindowFunction::Mean,
            MovingAverage::Exponential => WindowFunction::EwmMean,
            MovingAverage::Median => WindowFunction::Median,
        }
    }
}

impl fmt::Display for MovingAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovingAverage::Simple => write!(f, "sma"),
            MovingAverage::Exponential => write!(f, "ema"),
            MovingAverage::Median => write!(f, "smm"),
        }
    }
}

impl FromStr for MovingAverage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" => Ok(MovingAverage::Simple),
            "ema" => Ok(MovingAverage::Exponential),
            "smm" => Ok(MovingAverage::Median),
            other => Err(format!("unknown moving average '{other}', expected sma, ema or smm")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Indicator {
    Sma(usize),
    Smm(usize),
    Msd(usize),
    Ema(usize),
    TypicalPrice,
    Vwap,
    Rsi(usize),
    Bollinger {
        period: usize,
        std: f64,
        ma: MovingAverage,
    },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl Indicator {
    /// Run the indicator on `frame`. Typical price ignores `identifier_column`.
    pub fn apply(
        &self,
        frame: impl IntoLazyFrame,
        identifier_column: Option<&str>,
    ) -> Result<LazyFrame, FintaError> {
        match *self {
            Indicator::Sma(period) => sma::simple_moving_average(frame, period, identifier_column),
            Indicator::Smm(period) => smm::simple_moving_median(frame, period, identifier_column),
            Indicator::Msd(period) => msd::moving_std(frame, period, identifier_column),
            Indicator::Ema(period) => {
                ema::exponential_moving_average(frame, period, identifier_column)
            }
            Indicator::TypicalPrice => typical_price::typical_price(frame),
            Indicator::Vwap => vwap::vwap(frame, identifier_column),
            Indicator::Rsi(period) => rsi::rsi(frame, period, identifier_column),
            Indicator::Bollinger { period, std, ma } => {
                bollinger::bbands(frame, period, std, identifier_column, ma)
            }
            Indicator::Macd { fast, slow, signal } => {
                macd::macd(frame, fast, slow, signal, identifier_column)
            }
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Sma(period) => write!(f, "SMA({})", period),
            Indicator::Smm(period) => write!(f, "SMM({})", period),
            Indicator::Msd(period) => write!(f, "MSD({})", period),
            Indicator::Ema(period) => write!(f, "EMA({})", period),
            Indicator::TypicalPrice => write!(f, "TYPICAL_PRICE"),
            Indicator::Vwap => write!(f, "VWAP"),
            Indicator::Rsi(period) => write!(f, "RSI({})", period),
            Indicator::Bollinger { period, std, ma } => {
                write!(f, "BBANDS({},{},{})", period, std, ma)
            }
            Indicator::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// Shared body of the all-column window indicators (SMA, SMM, MSD, EMA).
pub(crate) fn window_indicator(
    frame: impl IntoLazyFrame,
    function: WindowFunction,
    period: usize,
    identifier_column: Option<&str>,
    tag: &str,
) -> Result<LazyFrame, FintaError> {
    let mut frame = ensure_lazy(frame);
    let (schema, columns) = ohlcv_columns(&mut frame)?;
    let suffix = format!("_{tag}_{period}");
    debug!(
        indicator = tag,
        period,
        identifier = identifier_column.unwrap_or("-"),
        columns = columns.len(),
        "building window indicator"
    );
    let exprs = WindowExpr::new(function, period).build(columns, identifier_column, &suffix);
    Ok(replace_columns(frame, &schema, columns, exprs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{close_frame, ohlcv_frame};

    #[test]
    fn indicator_display_sma() {
        assert_eq!(Indicator::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_display_macd() {
        let macd = Indicator::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_display_bollinger() {
        let boll = Indicator::Bollinger {
            period: 20,
            std: 2.5,
            ma: MovingAverage::Exponential,
        };
        assert_eq!(boll.to_string(), "BBANDS(20,2.5,ema)");
    }

    #[test]
    fn bollinger_keeps_fractional_width() {
        let boll = Indicator::Bollinger {
            period: 4,
            std: 2.555,
            ma: MovingAverage::Simple,
        };
        assert_eq!(boll.to_string(), "BBANDS(4,2.555,sma)");

        let df = close_frame(&[3.0, 7.0, 2.0, 9.0, 4.0, 6.0]);
        let via_enum = boll.apply(&df, None).unwrap().collect().unwrap();
        let direct = bollinger::bbands(&df, 4, 2.555, None, MovingAverage::Simple)
            .unwrap()
            .collect()
            .unwrap();
        assert!(via_enum.equals_missing(&direct));
    }

    #[test]
    fn moving_average_parse_and_display() {
        for ma in [
            MovingAverage::Simple,
            MovingAverage::Exponential,
            MovingAverage::Median,
        ] {
            assert_eq!(ma.to_string().parse::<MovingAverage>(), Ok(ma));
        }
        assert_eq!(" EMA ".parse::<MovingAverage>(), Ok(MovingAverage::Exponential));
        assert!("wma".parse::<MovingAverage>().is_err());
        assert_eq!(MovingAverage::default(), MovingAverage::Simple);
    }

    #[test]
    fn apply_dispatches_to_named_columns() {
        let cases = [
            (Indicator::Sma(5), "close_sma_5"),
            (Indicator::Smm(5), "close_smm_5"),
            (Indicator::Msd(5), "close_msd_5"),
            (Indicator::Ema(5), "close_ema_5"),
            (Indicator::TypicalPrice, "typical_price"),
            (Indicator::Vwap, "vwap"),
            (Indicator::Rsi(5), "close_rsi_5"),
            (
                Indicator::Bollinger {
                    period: 5,
                    std: 2.0,
                    ma: MovingAverage::Simple,
                },
                "close_bb_middle_5",
            ),
            (
                Indicator::Macd {
                    fast: 3,
                    slow: 6,
                    signal: 2,
                },
                "close_macd_3_6_signal",
            ),
        ];
        let df = ohlcv_frame(30);
        for (indicator, column) in cases {
            let out = indicator.apply(&df, None).unwrap().collect().unwrap();
            assert!(
                out.get_column_names_str().contains(&column),
                "{indicator} should produce {column}"
            );
            assert_eq!(out.height(), 30);
        }
    }

    #[test]
    fn apply_vwap_without_volume_fails() {
        let err = Indicator::Vwap
            .apply(close_frame(&[1.0, 2.0]), None)
            .err().unwrap();
        assert!(matches!(err, FintaError::Schema(_)));
    }
}
