//! Average Directional Index (Wilder).
//!
//! TR, +DM and -DM are Wilder-summed over `length` bars (TA-Lib seeding),
//! giving +DI and -DI;
//! DX = 100 * |+DI - -DI| / (+DI + -DI). ADX seeds with the mean of the first
//! `length` DX values and then follows ADX[i] = (ADX[i-1] * (n-1) + DX[i]) / n.
//! Warmup: the first (2n - 1) positions are undefined.

use crate::domain::bar_series::{BarSeries, Column};
use crate::domain::error::ScreenerError;
use crate::domain::indicator_helpers::{directional_movement, wilder_sum};
use crate::domain::params::SpecParams;

pub const DEFAULT_LENGTH: usize = 14;

pub fn directional_index(
    name: &str,
    params: &SpecParams,
    series: &BarSeries,
) -> Result<Column, ScreenerError> {
    let length = params.positive_usize(name, "length", DEFAULT_LENGTH)?;
    Ok(calculate_adx(series, length))
}

pub fn calculate_adx(series: &BarSeries, length: usize) -> Column {
    let n = series.len();
    let mut adx: Column = vec![None; n];
    if length == 0 || n < 2 * length {
        return adx;
    }

    let dm = directional_movement(series.bars());
    let tr_s = wilder_sum(&dm.true_range, length);
    let plus_s = wilder_sum(&dm.plus_dm, length);
    let minus_s = wilder_sum(&dm.minus_dm, length);

    let dx: Vec<Option<f64>> = (0..n)
        .map(|i| match (tr_s[i], plus_s[i], minus_s[i]) {
            (Some(tr), Some(plus), Some(minus)) => Some(directional_dx(tr, plus, minus)),
            _ => None,
        })
        .collect();

    let first = 2 * length - 1;
    let seed: f64 = dx[length..=first].iter().flatten().sum::<f64>() / length as f64;
    adx[first] = Some(seed);

    let mut prev = seed;
    for i in (first + 1)..n {
        let Some(current) = dx[i] else { continue };
        prev = (prev * (length - 1) as f64 + current) / length as f64;
        adx[i] = Some(prev);
    }

    adx
}

fn directional_dx(tr: f64, plus_dm: f64, minus_dm: f64) -> f64 {
    if tr.abs() < f64::EPSILON {
        return 0.0;
    }
    let plus_di = 100.0 * plus_dm / tr;
    let minus_di = 100.0 * minus_dm / tr;
    let sum = plus_di + minus_di;
    if sum.abs() < f64::EPSILON {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / sum
    }
}
