#![allow(dead_code)]

use polars::prelude::*;
use std::io::Write;

pub const FIXTURE_ROWS: usize = 3000;
pub const TICKERS: [&str; 5] = ["AAPL", "MSFT", "GOOG", "AMZN", "NVDA"];

/// Single-instrument bars: open = close = volume = i, high = i + 1, low = i - 1.
pub fn ohlcv_fixture(rows: usize) -> DataFrame {
    let base: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    df!(
        "open" => &base,
        "high" => base.iter().map(|v| v + 1.0).collect::<Vec<_>>(),
        "low" => base.iter().map(|v| v - 1.0).collect::<Vec<_>>(),
        "close" => &base,
        "volume" => &base,
    )
    .unwrap()
}

/// `ohlcv_fixture(rows)` stacked once per ticker, `ticker` as the first column.
pub fn multi_ticker_fixture(tickers: &[&str], rows: usize) -> DataFrame {
    let ticker: Vec<&str> = tickers
        .iter()
        .flat_map(|t| std::iter::repeat_n(*t, rows))
        .collect();
    let base: Vec<f64> = tickers
        .iter()
        .flat_map(|_| (0..rows).map(|i| i as f64))
        .collect();
    df!(
        "ticker" => ticker,
        "open" => &base,
        "high" => base.iter().map(|v| v + 1.0).collect::<Vec<_>>(),
        "low" => base.iter().map(|v| v - 1.0).collect::<Vec<_>>(),
        "close" => &base,
        "volume" => &base,
    )
    .unwrap()
}

pub fn f64_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// CSV text for `multi_ticker_fixture` with integer volume and a date column.
pub fn bars_csv(tickers: &[&str], rows: usize) -> String {
    let mut csv = String::from("date,ticker,open,high,low,close,volume\n");
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    for ticker in tickers {
        for i in 0..rows {
            let date = start + chrono::Duration::days(i as i64);
            csv.push_str(&format!(
                "{},{},{}.0,{}.0,{}.0,{}.0,{}\n",
                date.format("%Y-%m-%d"),
                ticker,
                i,
                i + 1,
                i as i64 - 1,
                i,
                i
            ));
        }
    }
    csv
}
