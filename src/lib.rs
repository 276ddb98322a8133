//! finta-polars: technical indicators over OHLCV tables, built on polars' lazy API.
//!
//! Hexagonal layout: indicator logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], the `finta` command line in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

#[cfg(test)]
mod test_util;

pub use domain::error::{FintaError, SchemaError};
pub use domain::indicator::bollinger::bbands;
pub use domain::indicator::ema::exponential_moving_average;
pub use domain::indicator::macd::macd;
pub use domain::indicator::msd::moving_std;
pub use domain::indicator::rsi::rsi;
pub use domain::indicator::sma::simple_moving_average;
pub use domain::indicator::smm::simple_moving_median;
pub use domain::indicator::typical_price::typical_price;
pub use domain::indicator::vwap::vwap;
pub use domain::indicator::{Indicator, MovingAverage};
pub use domain::lazy::{ensure_lazy, IntoLazyFrame};
pub use domain::schema::validate_schema;
