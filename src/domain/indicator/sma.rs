//! Simple moving average of the close.
//!
//! The rolling mean is computed leniently (a position with fewer than
//! `width` prior bars averages whatever is available), then the first
//! `width` positions are masked as undefined. Position `width - 1` has a
//! full window but is still masked.

use crate::domain::bar_series::{BarSeries, Column};
use crate::domain::error::ScreenerError;
use crate::domain::params::SpecParams;

pub const DEFAULT_WIDTH: usize = 9;

pub fn moving_average(
    name: &str,
    params: &SpecParams,
    series: &BarSeries,
) -> Result<Column, ScreenerError> {
    let width = params.positive_usize(name, "width", DEFAULT_WIDTH)?;
    Ok(masked_rolling_mean(&series.closes(), width))
}

/// Lenient rolling mean followed by a warm-up mask of `width` positions.
pub fn masked_rolling_mean(values: &[f64], width: usize) -> Column {
    let mut out = rolling_mean(values, width);
    for slot in out.iter_mut().take(width) {
        *slot = None;
    }
    out
}

/// Trailing mean over up to `width` values, inclusive of the current one.
fn rolling_mean(values: &[f64], width: usize) -> Column {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= width {
            sum -= values[i - width];
        }
        let count = (i + 1).min(width);
        out.push(Some(sum / count as f64));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_series(closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        BarSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(start + chrono::Duration::days(i as i64), c, c, c, c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn warmup_is_masked() {
        let column = masked_rolling_mean(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_eq!(column.len(), 5);
        assert!(column[0].is_none());
        assert!(column[1].is_none());
        // full window exists at index 2 but the first `width` slots are masked
        assert!(column[2].is_none());
        assert_relative_eq!(column[3].unwrap(), 30.0);
        assert_relative_eq!(column[4].unwrap(), 40.0);
    }

    #[test]
    fn lenient_mean_before_masking() {
        let column = rolling_mean(&[10.0, 20.0, 30.0], 5);
        assert_relative_eq!(column[0].unwrap(), 10.0);
        assert_relative_eq!(column[1].unwrap(), 15.0);
        assert_relative_eq!(column[2].unwrap(), 20.0);
    }

    #[test]
    fn width_longer_than_series() {
        let column = masked_rolling_mean(&[1.0, 2.0, 3.0], 9);
        assert_eq!(column, vec![None, None, None]);
    }

    #[test]
    fn width_one_masks_only_first() {
        let column = masked_rolling_mean(&[1.0, 2.0, 3.0], 1);
        assert_eq!(column, vec![None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn default_width_is_nine() {
        let closes: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        let series = make_series(&closes);
        let column = moving_average("ma", &SpecParams::new(), &series).unwrap();
        assert!(column[8].is_none());
        // mean of 2..=10
        assert_relative_eq!(column[9].unwrap(), 6.0);
    }

    #[test]
    fn empty_series() {
        let series = make_series(&[]);
        let column = moving_average("ma", &SpecParams::new(), &series).unwrap();
        assert!(column.is_empty());
    }

    #[test]
    fn sixty_bar_uptrend_last_value() {
        let closes: Vec<f64> = (0..60).map(|i| 1.05 + 0.001 * i as f64).collect();
        let series = make_series(&closes);
        let params = SpecParams::new().with("width", 9);
        let column = moving_average("moving_average_9", &params, &series).unwrap();
        let expected = closes[51..].iter().sum::<f64>() / 9.0;
        assert_relative_eq!(column[59].unwrap(), expected, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn column_shape_and_values(
            closes in proptest::collection::vec(0.5f64..2.0, 1..80),
            width in 1usize..20,
        ) {
            let column = masked_rolling_mean(&closes, width);
            prop_assert_eq!(column.len(), closes.len());
            let masked = width.min(closes.len());
            for (i, value) in column.iter().enumerate() {
                if i < masked {
                    prop_assert!(value.is_none());
                } else {
                    let start = (i + 1).saturating_sub(width);
                    let window = &closes[start..=i];
                    let mean = window.iter().sum::<f64>() / window.len() as f64;
                    prop_assert!((value.unwrap() - mean).abs() < 1e-9);
                }
            }
        }

        #[test]
        fn recomputation_is_idempotent(
            closes in proptest::collection::vec(0.5f64..2.0, 0..50),
            width in 1usize..12,
        ) {
            prop_assert_eq!(
                masked_rolling_mean(&closes, width),
                masked_rolling_mean(&closes, width)
            );
        }
    }
}
