//! Lazy execution and grouping adapter.
//!
//! Every public indicator lifts its input into a [`LazyFrame`] on entry, so
//! chained stages (MACD's signal line, Bollinger's bands) extend one query
//! plan. Nothing here evaluates data; callers `collect()` when they need values.

use polars::prelude::{col, DataFrame, Expr, IntoLazy, LazyFrame, Schema};

/// A table that can be turned into a deferred query without computing anything.
pub trait IntoLazyFrame {
    fn into_lazy_frame(self) -> LazyFrame;
}

impl IntoLazyFrame for LazyFrame {
    fn into_lazy_frame(self) -> LazyFrame {
        self
    }
}

impl IntoLazyFrame for DataFrame {
    fn into_lazy_frame(self) -> LazyFrame {
        self.lazy()
    }
}

impl IntoLazyFrame for &DataFrame {
    fn into_lazy_frame(self) -> LazyFrame {
        self.clone().lazy()
    }
}

/// Entry boundary of every indicator: eager frames become deferred ones.
pub fn ensure_lazy(frame: impl IntoLazyFrame) -> LazyFrame {
    frame.into_lazy_frame()
}

/// Scope a window expression to each distinct value of `group_key`.
pub fn over_group(expr: Expr, group_key: Option<&str>) -> Expr {
    match group_key {
        Some(key) => expr.over([col(key)]),
        None => expr,
    }
}

/// Select every column of `schema` except `replaced`, followed by `exprs`.
///
/// Pass-through columns keep their original relative order.
pub fn replace_columns(
    frame: LazyFrame,
    schema: &Schema,
    replaced: &[&str],
    exprs: Vec<Expr>,
) -> LazyFrame {
    let mut selection: Vec<Expr> = schema
        .iter_names()
        .filter(|name| !replaced.contains(&name.as_str()))
        .map(|name| col(name.clone()))
        .collect();
    selection.extend(exprs);
    frame.select(selection)
}
