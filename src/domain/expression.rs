//! Window expression builder.
//!
//! `WindowExpr` describes "apply aggregate F over a trailing window of W rows,
//! emitting null until P observations are available". `build` turns it into
//! one named polars expression per source column, optionally partitioned by a
//! group key so no window crosses an instrument boundary.

use polars::prelude::{col, EWMOptions, Expr, RollingOptionsFixedWindow};

use crate::domain::lazy::over_group;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFunction {
    /// Rolling arithmetic mean.
    Mean,
    /// Rolling median.
    Median,
    /// Rolling sample standard deviation (ddof = 1).
    Std,
    /// Exponentially weighted mean with span = window size.
    EwmMean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowExpr {
    function: WindowFunction,
    window_size: usize,
    min_periods: Option<usize>,
}

/// `alpha = 2 / (span + 1)`
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

impl WindowExpr {
    pub fn new(function: WindowFunction, window_size: usize) -> Self {
        Self {
            function,
            window_size,
            min_periods: None,
        }
    }

    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    /// Rolling aggregates wait for a full window; the ewm mean emits from the
    /// first observation.
    pub fn effective_min_periods(&self) -> usize {
        self.min_periods.unwrap_or(match self.function {
            WindowFunction::EwmMean => 1,
            _ => self.window_size,
        })
    }

    fn rolling_options(&self) -> RollingOptionsFixedWindow {
        RollingOptionsFixedWindow {
            window_size: self.window_size,
            min_periods: self.effective_min_periods(),
            ..Default::default()
        }
    }

    fn ewm_options(&self) -> EWMOptions {
        EWMOptions {
            alpha: span_alpha(self.window_size),
            adjust: true,
            min_periods: self.effective_min_periods(),
            ..Default::default()
        }
    }

    /// The bare aggregate over `input`, without grouping or naming.
    pub fn apply(&self, input: Expr) -> Expr {
        match self.function {
            WindowFunction::Mean => input.rolling_mean(self.rolling_options()),
            WindowFunction::Median => input.rolling_median(self.rolling_options()),
            WindowFunction::Std => input.rolling_std(self.rolling_options()),
            WindowFunction::EwmMean => input.ewm_mean(self.ewm_options()),
        }
    }

    /// One expression per column, grouped by `group_key` and named `column + suffix`.
    pub fn build(&self, columns: &[&str], group_key: Option<&str>, suffix: &str) -> Vec<Expr> {
        columns
            .iter()
            .map(|column| {
                over_group(self.apply(col(*column)), group_key).alias(format!("{column}{suffix}"))
            })
            .collect()
    }
}
