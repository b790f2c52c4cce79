//! Per-curve metric formulas
//!
//! All functions take a curve and the shared time axis of equal length
//! (at least two points, as guaranteed by [`PlateTable`](crate::data::PlateTable)).

use ndarray::ArrayView1;

use super::types::{GROWTH_THRESHOLD, LAG_FALLBACK};
use crate::layout::round_to;

/// Samples spanned by one slope window
const SLOPE_WINDOW: usize = 3;

/// Added to the interpolation slope so flat segments stay finite
const SLOPE_EPSILON: f64 = 0.001;

/// Trapezoidal area under the curve
pub fn auc(times: ArrayView1<f64>, values: ArrayView1<f64>) -> f64 {
    (1..times.len())
        .map(|i| (values[i] + values[i - 1]) / 2.0 * (times[i] - times[i - 1]))
        .sum()
}

pub fn max_value(values: ArrayView1<f64>) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Time at which the curve reaches `y_crit`
///
/// Interpolates linearly between the first sample strictly above `y_crit`
/// (the last sample if none is) and the sample before it. Curves whose
/// maximum does not exceed [`GROWTH_THRESHOLD`] get [`LAG_FALLBACK`].
pub fn lag_len(times: ArrayView1<f64>, values: ArrayView1<f64>, y_crit: f64) -> f64 {
    if max_value(values) <= GROWTH_THRESHOLD {
        return LAG_FALLBACK;
    }

    let last = values.len() - 1;
    let mut after = values.iter().position(|&v| v > y_crit).unwrap_or(last);
    let before = after.saturating_sub(1);
    if before == 0 && after == 0 {
        after = 1;
    }

    let (t1, t2) = (times[before], times[after]);
    let (y1, y2) = (values[before], values[after]);
    let m = (y2 - y1) / (t2 - t1) + SLOPE_EPSILON;
    let b = y1 - m * t1;
    round_to((y_crit - b) / m, 2)
}

/// Steepest non-negative rise over windows of three sample intervals
///
/// Windows with a negative rise are ignored; the first of several equally
/// steep rises wins. Returns `0.0` when the curve is too short for a window
/// or every window falls.
pub fn slope(times: ArrayView1<f64>, values: ArrayView1<f64>) -> f64 {
    let n = values.len();
    if n <= SLOPE_WINDOW {
        return 0.0;
    }

    let mut best: Option<(usize, f64)> = None;
    for i in 0..n - SLOPE_WINDOW {
        let rise = values[i + SLOPE_WINDOW] - values[i];
        if rise < 0.0 {
            continue;
        }
        if best.map_or(true, |(_, b)| rise > b) {
            best = Some((i, rise));
        }
    }

    match best {
        Some((i, rise)) => round_to(rise / (times[i + SLOPE_WINDOW] - times[i]), 2),
        None => 0.0,
    }
}
