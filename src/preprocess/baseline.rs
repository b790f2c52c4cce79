use ndarray::{Array1, ArrayView1};

use crate::data::PlateTable;

/// Shift a curve so that it starts at exactly zero
pub fn shift_baseline(curve: ArrayView1<f64>) -> Array1<f64> {
    let first = curve.first().copied().unwrap_or(0.0);
    curve.mapv(|v| v - first)
}

pub fn shift_table(table: &PlateTable) -> PlateTable {
    table.map_curves(shift_baseline)
}
