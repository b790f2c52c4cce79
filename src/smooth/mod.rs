//! Monotone curve smoothing
//!
//! Every curve is replaced by a non-decreasing penalized cubic B-spline fitted
//! against the plate's time axis and evaluated at the same time points.
//! Monotonicity is a hard constraint: spline coefficients are a free level plus
//! non-negative increments, solved by non-negative least squares.

mod bspline;
mod nnls;

pub use bspline::{MonotoneSpline, SmoothingOptions};

use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use tracing::debug;

use crate::data::{PlateTable, TableError};
use crate::layout::SampleId;

/// Smooth every curve of `table`
pub fn smooth_table(
    table: &PlateTable,
    options: &SmoothingOptions,
) -> Result<PlateTable, TableError> {
    let spline = MonotoneSpline::new(table.times(), options);
    let curves: Vec<(&SampleId, ArrayView1<f64>)> = table.curves().collect();

    let smoothed: Vec<(SampleId, Array1<f64>)> = curves
        .into_par_iter()
        .map(|(id, curve)| (id.clone(), spline.fit(curve)))
        .collect();

    debug!(
        curves = smoothed.len(),
        basis = options.basis,
        lambda = options.lambda,
        "smoothed curves"
    );
    table.with_curves(smoothed)
}
