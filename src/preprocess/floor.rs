use ndarray::{s, Array1, ArrayView1};

use crate::data::PlateTable;

/// Length of the non-negative run that marks the start of real signal
const RUN: usize = 5;

/// Zero the leading part of a curve up to its first non-negative run
///
/// Finds the earliest index `i` where `RUN` consecutive values (or the whole
/// curve, when it is shorter) are all non-negative and sets every value before
/// `i` to zero. A curve without such a run becomes all zeros.
pub fn clip_floor(curve: ArrayView1<f64>) -> Array1<f64> {
    let n = curve.len();
    let run = RUN.min(n);
    let start = (0..=n - run).find(|&i| curve.slice(s![i..i + run]).iter().all(|&v| v >= 0.0));

    match start {
        Some(i) => {
            let mut clipped = curve.to_owned();
            clipped.slice_mut(s![..i]).fill(0.0);
            clipped
        }
        None => Array1::zeros(n),
    }
}

/// [`clip_floor`] applied to every curve of a table
pub fn clip_table(table: &PlateTable) -> PlateTable {
    table.map_curves(clip_floor)
}
