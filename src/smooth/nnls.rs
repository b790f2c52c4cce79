//! Lawson–Hanson non-negative least squares

use nalgebra::{DMatrix, DVector};
use tracing::warn;

/// Solve `min ‖A·x − b‖²` subject to `x ≥ 0`
///
/// Classic active-set method: variables move from the zero set into the
/// passive set one at a time, the passive subproblem is solved by
/// unconstrained least squares (SVD, so rank-deficient passive sets are
/// handled), and variables that turn negative are stepped back to zero.
pub(crate) fn nnls(a: &DMatrix<f64>, b: &DVector<f64>) -> DVector<f64> {
    let n = a.ncols();
    let max_outer = 3 * n.max(1);
    let tol = 1e-10 * (1.0 + a.norm() * b.norm());

    let mut x = DVector::zeros(n);
    let mut passive = vec![false; n];

    for _ in 0..max_outer {
        let w = a.transpose() * (b - a * &x);
        let Some((j, _)) = (0..n)
            .filter(|&j| !passive[j])
            .map(|j| (j, w[j]))
            .filter(|&(_, wj)| wj > tol)
            .max_by(|l, r| l.1.total_cmp(&r.1))
        else {
            return x;
        };
        passive[j] = true;

        for _ in 0..max_outer {
            let z = solve_passive(a, b, &passive);
            let blocking: Vec<usize> = (0..n).filter(|&k| passive[k] && z[k] <= 0.0).collect();
            if blocking.is_empty() {
                x = z;
                break;
            }

            let alpha = blocking
                .iter()
                .map(|&k| x[k] / (x[k] - z[k]))
                .fold(f64::INFINITY, f64::min);
            x += (z - &x) * alpha;
            for k in 0..n {
                if passive[k] && x[k] <= tol {
                    passive[k] = false;
                    x[k] = 0.0;
                }
            }
        }
    }

    warn!(variables = n, "NNLS did not converge, returning last iterate");
    x
}

/// Unconstrained least squares over the passive columns, zero elsewhere
fn solve_passive(a: &DMatrix<f64>, b: &DVector<f64>, passive: &[bool]) -> DVector<f64> {
    let columns: Vec<usize> = (0..passive.len()).filter(|&k| passive[k]).collect();
    let sub = a.select_columns(&columns);
    let solution = sub
        .svd(true, true)
        .solve(b, 1e-12)
        .unwrap_or_else(|_| DVector::zeros(columns.len()));

    let mut z = DVector::zeros(passive.len());
    for (i, &k) in columns.iter().enumerate() {
        z[k] = solution[i];
    }
    z
}
