//! Core domain: schema checks, window expressions and the indicator library.

pub mod schema;
pub mod expression;
pub mod lazy;
pub mod indicator;
pub mod config_validation;
pub mod error;
