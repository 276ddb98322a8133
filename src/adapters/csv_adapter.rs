//! CSV table adapter.

use crate::domain::error::FintaError;
use crate::domain::schema::{OHLC_COLUMNS, VOLUME_COLUMN};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom, Series};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Polars stores `Date` as days since this date.
fn unix_epoch() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

pub struct CsvAdapter {
    date_column: String,
    date_format: String,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new("date", "%Y-%m-%d")
    }
}

fn data_error(reason: impl Into<String>) -> FintaError {
    FintaError::Data {
        reason: reason.into(),
    }
}

impl CsvAdapter {
    pub fn new(date_column: &str, date_format: &str) -> Self {
        Self {
            date_column: date_column.to_string(),
            date_format: date_format.to_string(),
        }
    }

    /// Parse CSV text with a header row into a `DataFrame`.
    pub fn read<R: Read>(&self, reader: R) -> Result<DataFrame, FintaError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV header error: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for (row, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| data_error(format!("CSV parse error at row {}: {}", row + 1, e)))?;
            for (index, values) in cells.iter_mut().enumerate() {
                values.push(record.get(index).unwrap_or("").trim().to_string());
            }
        }

        let columns = headers
            .iter()
            .zip(&cells)
            .map(|(name, values)| self.build_column(name, values))
            .collect::<Result<Vec<Column>, FintaError>>()?;
        let frame = DataFrame::new(columns)?;
        debug!(
            rows = frame.height(),
            columns = frame.width(),
            "loaded csv table"
        );
        Ok(frame)
    }

    fn build_column(&self, name: &str, values: &[String]) -> Result<Column, FintaError> {
        let series = if OHLC_COLUMNS.contains(&name) {
            Series::new(name.into(), parse_floats(name, values)?)
        } else if name == VOLUME_COLUMN {
            parse_volume(values)?
        } else if name == self.date_column {
            let days = values
                .iter()
                .enumerate()
                .map(|(row, value)| self.parse_date(row, value))
                .collect::<Result<Vec<Option<i32>>, FintaError>>()?;
            Series::new(name.into(), days).cast(&DataType::Date)?
        } else {
            let text: Vec<Option<&str>> = values
                .iter()
                .map(|v| (!v.is_empty()).then_some(v.as_str()))
                .collect();
            Series::new(name.into(), text)
        };
        Ok(series.into())
    }

    fn parse_date(&self, row: usize, value: &str) -> Result<Option<i32>, FintaError> {
        if value.is_empty() {
            return Ok(None);
        }
        let date = NaiveDate::parse_from_str(value, &self.date_format).map_err(|e| {
            data_error(format!("invalid {} at row {}: {}", self.date_column, row + 1, e))
        })?;
        let days = date.signed_duration_since(unix_epoch()).num_days();
        i32::try_from(days)
            .map(Some)
            .map_err(|_| data_error(format!("{} out of range at row {}", self.date_column, row + 1)))
    }
}

fn parse_floats(name: &str, values: &[String]) -> Result<Vec<Option<f64>>, FintaError> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse::<f64>()
                .map(Some)
                .map_err(|e| data_error(format!("invalid {} value at row {}: {}", name, row + 1, e)))
        })
        .collect()
}

/// `Int64` when every cell is an integer, `Float64` otherwise.
fn parse_volume(values: &[String]) -> Result<Series, FintaError> {
    let ints: Option<Vec<Option<i64>>> = values
        .iter()
        .map(|value| {
            if value.is_empty() {
                Some(None)
            } else {
                value.parse::<i64>().ok().map(Some)
            }
        })
        .collect();
    match ints {
        Some(ints) => Ok(Series::new(VOLUME_COLUMN.into(), ints)),
        None => Ok(Series::new(
            VOLUME_COLUMN.into(),
            parse_floats(VOLUME_COLUMN, values)?,
        )),
    }
}

fn format_value(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Date(days) => unix_epoch()
            .checked_add_signed(TimeDelta::days(i64::from(days)))
            .map(|d| d.to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

impl DataPort for CsvAdapter {
    fn load(&self, path: &Path) -> Result<DataFrame, FintaError> {
        let file = File::open(path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;
        self.read(file)
    }

    fn write(&self, frame: &DataFrame, out: &mut dyn Write) -> Result<(), FintaError> {
        let mut wtr = csv::Writer::from_writer(out);
        let header: Vec<&str> = frame.get_column_names_str();
        wtr.write_record(&header)
            .map_err(|e| data_error(format!("CSV write error: {}", e)))?;

        let columns = frame.get_columns();
        for row in 0..frame.height() {
            let record = columns
                .iter()
                .map(|column| column.as_materialized_series().get(row).map(format_value))
                .collect::<Result<Vec<String>, _>>()?;
            wtr.write_record(&record)
                .map_err(|e| data_error(format!("CSV write error: {}", e)))?;
        }
        wtr.flush()?;
        debug!(
            rows = frame.height(),
            columns = frame.width(),
            "wrote csv table"
        );
        Ok(())
    }
}
