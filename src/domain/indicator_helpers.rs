//! Shared helper functions for indicator calculations.

use crate::domain::ohlcv::Bar;

/// Per-bar true range and directional movement.
///
/// Index 0 has no previous bar, so all three values are zero there.
#[derive(Debug, Clone, Default)]
pub struct DirectionalMovement {
    pub true_range: Vec<f64>,
    pub plus_dm: Vec<f64>,
    pub minus_dm: Vec<f64>,
}

pub fn directional_movement(bars: &[Bar]) -> DirectionalMovement {
    let mut dm = DirectionalMovement {
        true_range: vec![0.0; bars.len()],
        plus_dm: vec![0.0; bars.len()],
        minus_dm: vec![0.0; bars.len()],
    };

    for i in 1..bars.len() {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;
        if up_move > down_move && up_move > 0.0 {
            dm.plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            dm.minus_dm[i] = down_move;
        }
        dm.true_range[i] = bars[i].true_range(bars[i - 1].close);
    }

    dm
}

/// Wilder running total over `values[1..]`, seeded the way TA-Lib does.
///
/// The accumulator starts as the plain sum of `values[1..period]`; from
/// position `period` on, `S[i] = S[i-1] - S[i-1]/period + v[i]`. The first
/// defined position is `period`.
pub fn wilder_sum(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let mut acc: f64 = values[1..period].iter().sum();
    for i in period..values.len() {
        acc = acc - acc / period as f64 + values[i];
        out[i] = Some(acc);
    }
    out
}
