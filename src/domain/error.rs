//! Domain error types.

use polars::prelude::PolarsError;

/// A table whose columns do not cover any accepted OHLC(V) shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema does not match any accepted shape: expected one of {expected}, actual {actual}")]
pub struct SchemaError {
    pub expected: String,
    pub actual: String,
}

/// Top-level error type for finta-polars.
#[derive(Debug, thiserror::Error)]
pub enum FintaError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FintaError> for std::process::ExitCode {
    fn from(err: &FintaError) -> Self {
        let code: u8 = match err {
            FintaError::Io(_) => 1,
            FintaError::ConfigParse { .. } | FintaError::ConfigInvalid { .. } => 2,
            FintaError::Data { .. } => 3,
            FintaError::Schema(_) => 4,
            FintaError::Polars(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
