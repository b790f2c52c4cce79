//! Penalized cubic B-splines with a monotonicity constraint

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::nnls::nnls;

const DEGREE: usize = 3;

/// Settings of the monotone penalized spline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingOptions {
    /// Number of cubic B-spline basis functions (at least 4)
    pub basis: usize,
    /// Weight of the second-order difference penalty
    pub lambda: f64,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self {
            basis: 20,
            lambda: 0.6,
        }
    }
}

impl SmoothingOptions {
    pub fn with_basis(mut self, basis: usize) -> Self {
        self.basis = basis;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }
}

/// Monotone spline fit, prepared once for a time axis
///
/// The design only depends on the time axis, so every curve of a plate can
/// reuse it.
#[derive(Debug, Clone)]
pub struct MonotoneSpline {
    /// Basis values at the sample times (n × K)
    basis: DMatrix<f64>,
    /// NNLS system: data rows stacked on penalty rows, columns
    /// `[level⁺, level⁻, increment₁, …, increment_{K-1}]`
    system: DMatrix<f64>,
}

impl MonotoneSpline {
    pub fn new(times: ArrayView1<f64>, options: &SmoothingOptions) -> Self {
        let k = options.basis.max(DEGREE + 1);
        let lambda = options.lambda.max(0.0);
        let n = times.len();

        let lo = times.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if hi > lo { hi - lo } else { 1.0 };
        let h = span / (k - DEGREE) as f64;
        let knots: Vec<f64> = (0..k + DEGREE + 1)
            .map(|j| lo + (j as f64 - DEGREE as f64) * h)
            .collect();

        let mut basis = DMatrix::zeros(n, k);
        for (i, &t) in times.iter().enumerate() {
            // the last knot interval is half-open; keep the right end inside it
            let x = t.min(lo + span - 1e-9 * h);
            for (j, value) in basis_row(x, &knots, k).into_iter().enumerate() {
                basis[(i, j)] = value;
            }
        }

        let mut penalty = DMatrix::zeros(k - 2, k);
        for r in 0..k - 2 {
            penalty[(r, r)] = 1.0;
            penalty[(r, r + 1)] = -2.0;
            penalty[(r, r + 2)] = 1.0;
        }
        let penalty = penalty * lambda.sqrt();

        // β = T·θ with T lower-triangular ones, so column j of M·T is the
        // suffix sum of M's columns from j on
        let cumulative = |m: &DMatrix<f64>| {
            let mut out = m.clone();
            for j in (0..k - 1).rev() {
                for r in 0..out.nrows() {
                    out[(r, j)] += out[(r, j + 1)];
                }
            }
            out
        };
        let basis_t = cumulative(&basis);
        let penalty_t = cumulative(&penalty);

        let rows = n + k - 2;
        let mut system = DMatrix::zeros(rows, k + 1);
        for i in 0..rows {
            let (source, r) = if i < n {
                (&basis_t, i)
            } else {
                (&penalty_t, i - n)
            };
            system[(i, 0)] = source[(r, 0)];
            system[(i, 1)] = -source[(r, 0)];
            for j in 1..k {
                system[(i, j + 1)] = source[(r, j)];
            }
        }

        Self { basis, system }
    }

    /// Fitted values of the monotone spline at the sample times
    pub fn fit(&self, values: ArrayView1<f64>) -> Array1<f64> {
        let n = self.basis.nrows();
        let k = self.basis.ncols();
        let mut rhs = DVector::zeros(self.system.nrows());
        for (i, &v) in values.iter().enumerate().take(n) {
            rhs[i] = v;
        }

        let theta = nnls(&self.system, &rhs);
        let mut coefficients = DVector::zeros(k);
        coefficients[0] = theta[0] - theta[1];
        for j in 1..k {
            coefficients[j] = coefficients[j - 1] + theta[j + 1];
        }

        let fitted = &self.basis * coefficients;
        Array1::from_iter(fitted.iter().copied())
    }
}

/// Values of all `k` cubic B-spline basis functions at `x` (Cox–de Boor)
fn basis_row(x: f64, knots: &[f64], k: usize) -> Vec<f64> {
    let mut b: Vec<f64> = knots
        .windows(2)
        .map(|w| if w[0] <= x && x < w[1] { 1.0 } else { 0.0 })
        .collect();

    for d in 1..=DEGREE {
        for j in 0..knots.len() - 1 - d {
            let left = (x - knots[j]) / (knots[j + d] - knots[j]) * b[j];
            let right = (knots[j + d + 1] - x) / (knots[j + d + 1] - knots[j + 1]) * b[j + 1];
            b[j] = left + right;
        }
    }
    b.truncate(k);
    b
}
