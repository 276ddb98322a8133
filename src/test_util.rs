use polars::prelude::*;

/// Values of a `Float64` column, nulls as `None`.
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Last value of a `Float64` column.
pub fn last_f64(df: &DataFrame, name: &str) -> f64 {
    f64_values(df, name)
        .last()
        .copied()
        .flatten()
        .unwrap()
}

/// Single-instrument OHLCV frame: open = close = volume = i, high = i + 1, low = i - 1.
pub fn ohlcv_frame(rows: usize) -> DataFrame {
    let base: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    df!(
        "open" => base.clone(),
        "high" => base.iter().map(|v| v + 1.0).collect::<Vec<_>>(),
        "low" => base.iter().map(|v| v - 1.0).collect::<Vec<_>>(),
        "close" => base.clone(),
        "volume" => base,
    )
    .unwrap()
}

/// Frame whose OHLC columns all equal `closes`, without volume.
pub fn close_frame(closes: &[f64]) -> DataFrame {
    df!(
        "open" => closes,
        "high" => closes,
        "low" => closes,
        "close" => closes,
    )
    .unwrap()
}

/// `ohlcv_frame(rows)` repeated once per ticker, with a `ticker` column.
pub fn multi_ticker_frame(tickers: &[&str], rows: usize) -> DataFrame {
    let frames: Vec<LazyFrame> = tickers
        .iter()
        .map(|ticker| {
            ohlcv_frame(rows)
                .lazy()
                .with_column(lit(*ticker).alias("ticker"))
        })
        .collect();
    concat(frames, UnionArgs::default())
        .unwrap()
        .collect()
        .unwrap()
}

/// Reference ewm mean with adjusted weights `(1 - alpha)^j`.
pub fn adjusted_ewm(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    values
        .iter()
        .map(|value| {
            numerator = numerator * (1.0 - alpha) + value;
            denominator = denominator * (1.0 - alpha) + 1.0;
            numerator / denominator
        })
        .collect()
}
