//! Alert evaluation engine.
//!
//! Evaluates alert predicates over a bar series and its derived columns.
//!
//! # Evaluation Semantics
//!
//! - Predicates are checked over the trailing `depth` positions ending at
//!   the evaluated position (the last bar unless `evaluate_at` is used).
//! - An undefined value anywhere in the window is a non-match, never an
//!   error. So is a series shorter than `depth`.
//! - `crossover`: A > B over the whole window, and NOT already A > B at the
//!   position just before the window. Fires once on entering a sustained
//!   crossover; `triggered` mirrors the result.
//! - `threshold`: value > threshold over the whole window. Fires on every
//!   evaluation while it holds; never triggers a chart.
//! - Unknown kinds evaluate to a miss with a warning. A referenced column
//!   that does not exist is an invalid spec.

use crate::domain::alert::{AlertKind, AlertOutcome, AlertSpec};
use crate::domain::bar_series::BarSeries;
use crate::domain::error::ScreenerError;
use tracing::warn;

/// Pure alert function evaluated at a bar position.
pub type AlertFn = fn(&AlertSpec, &BarSeries, usize) -> Result<AlertOutcome, ScreenerError>;

/// Function table lookup. `None` for unknown kinds.
pub fn alert_function(kind: &AlertKind) -> Option<AlertFn> {
    match kind {
        AlertKind::Crossover => Some(crossover),
        AlertKind::Threshold => Some(threshold),
        AlertKind::Unknown(_) => None,
    }
}

/// Evaluates `spec` at the most recent bar.
pub fn evaluate(spec: &AlertSpec, series: &BarSeries) -> Result<AlertOutcome, ScreenerError> {
    // An empty series still goes through column resolution so that a
    // missing reference is reported the same way regardless of data.
    let position = series.len().saturating_sub(1);
    evaluate_at(spec, series, position)
}

/// Evaluates `spec` as if `position` were the most recent bar.
pub fn evaluate_at(
    spec: &AlertSpec,
    series: &BarSeries,
    position: usize,
) -> Result<AlertOutcome, ScreenerError> {
    if spec.name.is_empty() {
        return Err(ScreenerError::invalid_spec(
            &format!("<unnamed {}>", spec.kind),
            "missing name",
        ));
    }
    if spec.depth < 1 {
        warn!(alert = %spec.name, depth = spec.depth, "non-positive depth, using 1");
    }
    match alert_function(&spec.kind) {
        Some(func) => func(spec, series, position),
        None => {
            warn!(alert = %spec.name, kind = %spec.kind, "unknown alert kind, result is 0");
            Ok(AlertOutcome::MISS)
        }
    }
}

fn crossover(
    spec: &AlertSpec,
    series: &BarSeries,
    position: usize,
) -> Result<AlertOutcome, ScreenerError> {
    let refs = spec.indicators();
    let [a_name, b_name, ..] = refs.as_slice() else {
        return Err(ScreenerError::invalid_spec(
            &spec.name,
            "crossover needs two indicators",
        ));
    };
    let a = resolve_column(spec, series, a_name)?;
    let b = resolve_column(spec, series, b_name)?;

    let holds = |i: usize| matches!((a[i], b[i]), (Some(x), Some(y)) if x > y);

    let Some(start) = window_start(series, position, spec.effective_depth()) else {
        return Ok(AlertOutcome::MISS);
    };
    if !(start..=position).all(holds) {
        return Ok(AlertOutcome::MISS);
    }
    let already_held = start > 0 && holds(start - 1);
    let result = !already_held;
    Ok(AlertOutcome {
        result,
        triggered: result,
    })
}

fn threshold(
    spec: &AlertSpec,
    series: &BarSeries,
    position: usize,
) -> Result<AlertOutcome, ScreenerError> {
    let refs = spec.indicators();
    let Some(name) = refs.first() else {
        return Err(ScreenerError::invalid_spec(
            &spec.name,
            "threshold needs an indicator",
        ));
    };
    let column = resolve_column(spec, series, name)?;
    let level = spec.params.required_f64(&spec.name, "threshold")?;

    let Some(start) = window_start(series, position, spec.effective_depth()) else {
        return Ok(AlertOutcome::MISS);
    };
    let result = column[start..=position]
        .iter()
        .all(|v| matches!(v, Some(x) if *x > level));
    Ok(AlertOutcome {
        result,
        triggered: false,
    })
}

fn resolve_column<'a>(
    spec: &AlertSpec,
    series: &'a BarSeries,
    column: &str,
) -> Result<&'a [Option<f64>], ScreenerError> {
    series.column(column).ok_or_else(|| {
        ScreenerError::invalid_spec(&spec.name, format!("missing referenced column '{}'", column))
    })
}

/// First position of the trailing window, or `None` when the series cannot
/// supply `depth` positions ending at `position`.
fn window_start(series: &BarSeries, position: usize, depth: usize) -> Option<usize> {
    if position >= series.len() || position + 1 < depth {
        return None;
    }
    Some(position + 1 - depth)
}
