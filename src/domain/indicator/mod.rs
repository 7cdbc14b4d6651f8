//! Indicator engine.
//!
//! This module provides the indicator vocabulary and its dispatch:
//! - `IndicatorKind`: closed set of supported kinds (plus `Unknown` for
//!   whatever configuration names that this build does not know)
//! - `IndicatorSpec`: kind, output column name and parameters
//! - `compute`: looks the kind up in the function table and runs it
//! - `apply`: computes and appends the column, reporting and skipping
//!   invalid specs without touching the series
//!
//! Adding a kind means adding a variant and a table entry.

pub mod adx;
pub mod sma;

use crate::domain::bar_series::{BarSeries, Column};
use crate::domain::error::ScreenerError;
use crate::domain::params::SpecParams;
use std::fmt;
use tracing::{debug, warn};

/// Pure indicator function: parameters and series in, aligned column out.
pub type IndicatorFn = fn(&str, &SpecParams, &BarSeries) -> Result<Column, ScreenerError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    MovingAverage,
    DirectionalIndex,
    Unknown(String),
}

impl IndicatorKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "moving_average" | "sma" => IndicatorKind::MovingAverage,
            "directional_index" | "adx" => IndicatorKind::DirectionalIndex,
            other => IndicatorKind::Unknown(other.to_string()),
        }
    }

    /// Function table lookup. `None` for unknown kinds.
    pub fn function(&self) -> Option<IndicatorFn> {
        match self {
            IndicatorKind::MovingAverage => Some(sma::moving_average),
            IndicatorKind::DirectionalIndex => Some(adx::directional_index),
            IndicatorKind::Unknown(_) => None,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::MovingAverage => write!(f, "moving_average"),
            IndicatorKind::DirectionalIndex => write!(f, "directional_index"),
            IndicatorKind::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    /// Output column key. Empty means the spec is invalid.
    pub name: String,
    pub params: SpecParams,
}

impl IndicatorSpec {
    pub fn new(kind: IndicatorKind, name: &str, params: SpecParams) -> Self {
        Self {
            kind,
            name: name.trim().to_string(),
            params,
        }
    }

    /// Label used in logs when the name itself may be missing.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("<unnamed {}>", self.kind)
        } else {
            self.name.clone()
        }
    }
}

/// Computes the column described by `spec` without modifying `series`.
pub fn compute(spec: &IndicatorSpec, series: &BarSeries) -> Result<Column, ScreenerError> {
    if spec.name.is_empty() {
        return Err(ScreenerError::invalid_spec(&spec.label(), "missing name"));
    }
    let func = spec.kind.function().ok_or_else(|| {
        ScreenerError::invalid_spec(&spec.name, format!("unknown indicator kind '{}'", spec.kind))
    })?;
    func(&spec.name, &spec.params, series)
}

/// Computes `spec` and appends it to `series` under `spec.name`.
///
/// Invalid specs are logged and returned as errors; the series is left
/// unchanged in that case. Callers treat the error as "skip this indicator".
pub fn apply(spec: &IndicatorSpec, series: &mut BarSeries) -> Result<(), ScreenerError> {
    let result = compute(spec, series).and_then(|column| series.insert_column(&spec.name, column));
    match &result {
        Ok(()) => debug!(indicator = %spec.name, kind = %spec.kind, "indicator computed"),
        Err(e) => warn!(indicator = %spec.label(), error = %e, "skipping indicator"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        BarSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(start + chrono::Duration::days(i as i64), c, c + 1.0, c - 1.0, c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn kind_parse_aliases() {
        assert_eq!(IndicatorKind::parse("moving_average"), IndicatorKind::MovingAverage);
        assert_eq!(IndicatorKind::parse("SMA"), IndicatorKind::MovingAverage);
        assert_eq!(IndicatorKind::parse("adx"), IndicatorKind::DirectionalIndex);
        assert_eq!(
            IndicatorKind::parse("bogus"),
            IndicatorKind::Unknown("bogus".into())
        );
    }

    #[test]
    fn unknown_kind_has_no_function() {
        assert!(IndicatorKind::Unknown("bogus".into()).function().is_none());
        assert!(IndicatorKind::MovingAverage.function().is_some());
    }

    #[test]
    fn apply_appends_named_column() {
        let mut series = make_series(&[1.0, 2.0, 3.0, 4.0]);
        let spec = IndicatorSpec::new(
            IndicatorKind::MovingAverage,
            "ma_2",
            SpecParams::new().with("width", 2),
        );
        apply(&spec, &mut series).unwrap();
        assert_eq!(series.column_names(), vec!["ma_2"]);
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let mut series = make_series(&[1.0, 2.0, 3.0]);
        let spec = IndicatorSpec::new(IndicatorKind::parse("bogus"), "b", SpecParams::new());
        let err = apply(&spec, &mut series).unwrap_err();
        assert!(matches!(err, ScreenerError::InvalidSpec { .. }));
        assert!(series.columns().is_empty());
    }

    #[test]
    fn missing_name_is_skipped() {
        let mut series = make_series(&[1.0, 2.0, 3.0]);
        let spec = IndicatorSpec::new(IndicatorKind::MovingAverage, "  ", SpecParams::new());
        assert!(apply(&spec, &mut series).is_err());
        assert!(series.columns().is_empty());
        assert_eq!(spec.label(), "<unnamed moving_average>");
    }

    #[test]
    fn invalid_param_leaves_series_unchanged() {
        let mut series = make_series(&[1.0, 2.0, 3.0]);
        let spec = IndicatorSpec::new(
            IndicatorKind::MovingAverage,
            "ma",
            SpecParams::new().with("width", 0),
        );
        assert!(apply(&spec, &mut series).is_err());
        assert!(series.column("ma").is_none());
    }
}
