//! Dunnett's many-to-one comparison
//!
//! Two-sided p-values for comparing several treatment groups with one
//! control group, using the pooled within-group variance of all groups.
//!
//! The p-value of comparison `i` is `1 − P(max_j |T_j| < |t_i|)` where the
//! `T_j` follow a multivariate t distribution with `ν = N − k` degrees of
//! freedom and correlation `ρ_ij = λ_i λ_j`, `λ_j = sqrt(n_j / (n_j + n_0))`.
//! The one-factor correlation structure reduces the probability to a double
//! integral over the common normal factor `z` and the scale
//! `s = sqrt(χ²_ν / ν)`, both evaluated with composite Simpson rules.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::gamma::ln_gamma;
use statrs::statistics::Statistics;
use std::f64::consts::LN_2;

/// Simpson intervals over the normal factor
const Z_STEPS: usize = 128;
/// Half-width of the normal factor range
const Z_LIMIT: f64 = 8.0;
/// Simpson intervals over the scale factor
const S_STEPS: usize = 200;
/// Half-width of the scale range, in standard deviations of `s^(2/3)`
const S_SPREAD: f64 = 8.0;

/// Two-sided Dunnett p-value of every treatment against `control`
///
/// Returns `NaN` for every comparison when there are no residual degrees of
/// freedom. With zero pooled variance a comparison is `0` when the means
/// differ and `1` when they are equal.
pub fn dunnett(treatments: &[Vec<f64>], control: &[f64]) -> Vec<f64> {
    let groups: Vec<&[f64]> = treatments
        .iter()
        .map(Vec::as_slice)
        .chain(std::iter::once(control))
        .collect();
    let total: usize = groups.iter().map(|g| g.len()).sum();
    if groups.iter().any(|g| g.is_empty()) || total <= groups.len() {
        return vec![f64::NAN; treatments.len()];
    }

    let df = (total - groups.len()) as f64;
    let sse: f64 = groups
        .iter()
        .map(|g| {
            let m = g.iter().mean();
            g.iter().map(|v| (v - m).powi(2)).sum::<f64>()
        })
        .sum();
    let mse = sse / df;

    let n0 = control.len() as f64;
    let control_mean = control.iter().mean();
    let lambdas: Vec<f64> = treatments
        .iter()
        .map(|t| (t.len() as f64 / (t.len() as f64 + n0)).sqrt())
        .collect();

    treatments
        .iter()
        .map(|t| {
            let diff = t.iter().mean() - control_mean;
            if mse == 0.0 {
                return if diff == 0.0 { 1.0 } else { 0.0 };
            }
            let se = (mse * (1.0 / t.len() as f64 + 1.0 / n0)).sqrt();
            let statistic = (diff / se).abs();
            (1.0 - max_abs_t_cdf(statistic, &lambdas, df)).clamp(0.0, 1.0)
        })
        .collect()
}

/// `P(max_j |T_j| < c)` for the one-factor multivariate t
fn max_abs_t_cdf(c: f64, lambdas: &[f64], df: f64) -> f64 {
    let Ok(normal) = Normal::new(0.0, 1.0) else {
        return f64::NAN;
    };

    let (s_lo, s_hi) = scale_range(df);
    simpson(s_lo, s_hi, S_STEPS, |s| {
        scale_density(s, df) * normal_factor_integral(c * s, lambdas, &normal)
    })
}

/// `P(max_j |Z_j| < bound)` for equicorrelated-by-factor standard normals
fn normal_factor_integral(bound: f64, lambdas: &[f64], normal: &Normal) -> f64 {
    simpson(-Z_LIMIT, Z_LIMIT, Z_STEPS, |z| {
        let inner: f64 = lambdas
            .iter()
            .map(|&l| {
                let sd = (1.0 - l * l).sqrt();
                normal.cdf((bound - l * z) / sd) - normal.cdf((-bound - l * z) / sd)
            })
            .product();
        (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt() * inner
    })
}

/// Integration range of `s`
///
/// By the Wilson–Hilferty approximation `s^(2/3) = (X / ν)^(1/3)` is close to
/// normal with mean `1 − 2/(9ν)` and variance `2/(9ν)`.
fn scale_range(df: f64) -> (f64, f64) {
    let variance = 2.0 / (9.0 * df);
    let centre = 1.0 - variance;
    let spread = S_SPREAD * variance.sqrt();
    (
        (centre - spread).max(0.0).powf(1.5),
        (centre + spread).powf(1.5),
    )
}

/// Density of `s = sqrt(X / ν)` with `X ~ χ²_ν`
fn scale_density(s: f64, df: f64) -> f64 {
    let half = df / 2.0;
    let log_norm = LN_2 + half * half.ln() - ln_gamma(half);
    if s <= 0.0 {
        return if df <= 1.0 { log_norm.exp() } else { 0.0 };
    }
    (log_norm + (df - 1.0) * s.ln() - df * s * s / 2.0).exp()
}

/// Composite Simpson rule with an even number of intervals
fn simpson<F: Fn(f64) -> f64>(a: f64, b: f64, steps: usize, f: F) -> f64 {
    let steps = steps + steps % 2;
    let h = (b - a) / steps as f64;
    let interior: f64 = (1..steps)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(a + i as f64 * h)
        })
        .sum();
    h / 3.0 * (f(a) + interior + f(b))
}
