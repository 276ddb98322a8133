//! OHLC(V) schema validation.
//!
//! A table is accepted when its column→dtype mapping is a superset of one of
//! the reference shapes:
//! - OHLC: `open, high, low, close` as `Float64`
//! - OHLCV: the OHLC shape plus `volume` as `Float64` or `Int64`
//!
//! Extra columns (identifier, timestamp, ...) are always permitted.

use polars::prelude::{DataType, LazyFrame, Schema, SchemaRef};

use crate::domain::error::{FintaError, SchemaError};

pub const OHLC_COLUMNS: [&str; 4] = ["open", "high", "low", "close"];
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];
pub const VOLUME_COLUMN: &str = "volume";

type Shape = Vec<(&'static str, DataType)>;

fn ohlc_shape() -> Shape {
    OHLC_COLUMNS
        .iter()
        .map(|name| (*name, DataType::Float64))
        .collect()
}

fn reference_shapes(include_volume: bool) -> Vec<Shape> {
    if !include_volume {
        return vec![ohlc_shape()];
    }
    [DataType::Float64, DataType::Int64]
        .into_iter()
        .map(|volume_dtype| {
            let mut shape = ohlc_shape();
            shape.push((VOLUME_COLUMN, volume_dtype));
            shape
        })
        .collect()
}

fn covers(schema: &Schema, shape: &Shape) -> bool {
    shape
        .iter()
        .all(|(name, dtype)| schema.get(name) == Some(dtype))
}

fn format_shape(shape: &Shape) -> String {
    let fields: Vec<String> = shape
        .iter()
        .map(|(name, dtype)| format!("{name}: {dtype}"))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

fn format_schema(schema: &Schema) -> String {
    let fields: Vec<String> = schema
        .iter()
        .map(|(name, dtype)| format!("{name}: {dtype}"))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// Check `schema` against the OHLC shape, or against the OHLCV shapes when
/// `include_volume` is set.
pub fn validate_schema(schema: &Schema, include_volume: bool) -> Result<(), SchemaError> {
    let shapes = reference_shapes(include_volume);
    if shapes.iter().any(|shape| covers(schema, shape)) {
        return Ok(());
    }
    let expected: Vec<String> = shapes.iter().map(format_shape).collect();
    Err(SchemaError {
        expected: expected.join(" | "),
        actual: format_schema(schema),
    })
}

/// Resolve the schema of a deferred frame and validate it.
pub fn validate_frame(frame: &mut LazyFrame, include_volume: bool) -> Result<SchemaRef, FintaError> {
    let schema = frame.collect_schema()?;
    validate_schema(&schema, include_volume)?;
    Ok(schema)
}

/// Validate the frame and return the price columns an all-column indicator
/// operates on: OHLCV when a `volume` column is present, OHLC otherwise.
pub fn ohlcv_columns(
    frame: &mut LazyFrame,
) -> Result<(SchemaRef, &'static [&'static str]), FintaError> {
    let schema = frame.collect_schema()?;
    if schema.contains(VOLUME_COLUMN) {
        validate_schema(&schema, true)?;
        Ok((schema, &OHLCV_COLUMNS))
    } else {
        validate_schema(&schema, false)?;
        Ok((schema, &OHLC_COLUMNS))
    }
}
