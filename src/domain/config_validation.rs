//! Configuration validation.
//!
//! Checks indicator parameters from the config file before any data is read,
//! and re-checks the final `Indicator` once command-line overrides are applied.

use crate::domain::error::FintaError;
use crate::domain::indicator::{Indicator, MovingAverage};
use crate::ports::config_port::ConfigPort;

pub const PERIOD_SECTIONS: [&str; 6] = ["sma", "smm", "msd", "ema", "rsi", "bbands"];

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), FintaError> {
    for section in PERIOD_SECTIONS {
        validate_positive(config, section, "period")?;
    }
    validate_bbands(config)?;
    validate_macd(config)?;
    validate_identifier(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FintaError {
    FintaError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), FintaError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(()),
        Ok(_) => Err(invalid(section, key, format!("{key} must be positive"))),
        Err(_) => Err(invalid(section, key, format!("{key} must be an integer"))),
    }
}

fn validate_bbands(config: &dyn ConfigPort) -> Result<(), FintaError> {
    if let Some(raw) = config.get_string("bbands", "std") {
        match raw.trim().parse::<f64>() {
            Ok(value) if value >= 0.0 && value.is_finite() => {}
            Ok(_) => return Err(invalid("bbands", "std", "std must be non-negative")),
            Err(_) => return Err(invalid("bbands", "std", "std must be a number")),
        }
    }
    if let Some(raw) = config.get_string("bbands", "ma") {
        raw.parse::<MovingAverage>()
            .map_err(|reason| invalid("bbands", "ma", reason))?;
    }
    Ok(())
}

/// Only per-key checks: `fast < slow` depends on command-line overrides and
/// is enforced by `validate_indicator`.
fn validate_macd(config: &dyn ConfigPort) -> Result<(), FintaError> {
    for key in ["fast", "slow", "signal"] {
        validate_positive(config, "macd", key)?;
    }
    Ok(())
}

fn validate_identifier(config: &dyn ConfigPort) -> Result<(), FintaError> {
    match config.get_string("data", "identifier_column") {
        Some(s) if s.trim().is_empty() => Err(invalid(
            "data",
            "identifier_column",
            "identifier_column must not be empty",
        )),
        _ => Ok(()),
    }
}

/// Parameter checks for an indicator after command-line overrides.
pub fn validate_indicator(indicator: &Indicator) -> Result<(), FintaError> {
    match *indicator {
        Indicator::Sma(period) => check_period("sma", "period", period),
        Indicator::Smm(period) => check_period("smm", "period", period),
        Indicator::Msd(period) => check_period("msd", "period", period),
        Indicator::Ema(period) => check_period("ema", "period", period),
        Indicator::Rsi(period) => check_period("rsi", "period", period),
        Indicator::Bollinger { period, .. } => check_period("bbands", "period", period),
        Indicator::Macd { fast, slow, signal } => {
            check_period("macd", "fast", fast)?;
            check_period("macd", "slow", slow)?;
            check_period("macd", "signal", signal)?;
            if fast >= slow {
                return Err(invalid("macd", "fast", "fast must be below slow"));
            }
            Ok(())
        }
        Indicator::TypicalPrice | Indicator::Vwap => Ok(()),
    }
}

fn check_period(section: &str, key: &str, value: usize) -> Result<(), FintaError> {
    if value == 0 {
        return Err(invalid(section, key, format!("{key} must be positive")));
    }
    Ok(())
}
