//! Growth metric formulas and thresholds on hand-computed examples

use approx::assert_relative_eq;
use growthcurves::metrics::*;
use growthcurves::threshold::{estimate_mic, percent_of_control};
use growthcurves::layout::PositiveControls;
use ndarray::{array, Array1};

use crate::common::id;

fn record(sample: &str, auc: f64, lag_len: f64, max_yield: f64) -> MetricsRecord {
    MetricsRecord {
        sample: id(sample),
        auc,
        lag_len,
        max_yield,
        slope: 0.0,
    }
}

#[test]
fn test_auc_trapezoid() {
    let times = array![0.0, 1.0, 3.0, 4.0];
    let values = array![0.0, 2.0, 2.0, 6.0];
    // 1 + 4 + 4
    assert_relative_eq!(auc(times.view(), values.view()), 9.0);
}

#[test]
fn test_auc_mirrored_time_axis() {
    let times = array![0.0, 1.0, 3.0, 4.5];
    let values = array![0.0, 2.0, 2.0, 6.0];
    let end = times[times.len() - 1];
    let mirrored: Array1<f64> = times.iter().rev().map(|t| end - t).collect();
    let reversed: Array1<f64> = values.iter().rev().copied().collect();

    assert_relative_eq!(auc(times.view(), values.view()), 11.0);
    assert_relative_eq!(
        auc(mirrored.view(), reversed.view()),
        auc(times.view(), values.view())
    );
}

#[test]
fn test_lag_interpolates_between_bracketing_samples() {
    let times: Array1<f64> = (0..6).map(f64::from).collect();
    let values = array![0.0, 5.0, 10.0, 20.0, 30.0, 40.0];

    let lag = lag_len(times.view(), values.view(), 12.0);
    assert!(lag > 2.0 && lag < 3.0);
    // m = 10.001, b = 10 - 2m
    assert_relative_eq!(lag, 2.2);
}

#[test]
fn test_lag_fallback_without_growth() {
    let times: Array1<f64> = (0..6).map(f64::from).collect();
    let values = array![0.0, 3.0, 6.0, 9.0, 12.0, 15.0];
    assert_relative_eq!(lag_len(times.view(), values.view(), 1.0), LAG_FALLBACK);
}

#[test]
fn test_lag_growth_threshold_before_interpolation() {
    // crosses 5 between t=2 and t=3 but never exceeds the growth threshold
    let times: Array1<f64> = (0..6).map(f64::from).collect();
    let values = array![0.0, 0.0, 1.0, 5.0, 9.0, 10.0];
    assert_relative_eq!(lag_len(times.view(), values.view(), 5.0), 24.0);
    assert_relative_eq!(LAG_FALLBACK, 24.0);
}

#[test]
fn test_slope_window() {
    let times: Array1<f64> = (0..7).map(f64::from).collect();
    let values = array![0.0, 1.0, 2.0, 10.0, 20.0, 21.0, 21.0];
    // largest rise over three intervals: 1 -> 20
    assert_relative_eq!(slope(times.view(), values.view()), 19.0 / 3.0, epsilon = 0.005);

    let falling = array![5.0, 4.0, 3.0, 2.0, 1.0, 0.0, 0.0];
    assert_relative_eq!(slope(times.view(), falling.view()), 0.0);
    assert_relative_eq!(slope(times.slice(ndarray::s![..3]), values.slice(ndarray::s![..3])), 0.0);
}

#[test]
fn test_percent_lag_uses_control_maximum() {
    let times: Array1<f64> = (0..6).map(f64::from).collect();
    let values = array![0.0, 10.0, 20.0, 30.0, 40.0, 50.0];
    let control = array![0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

    let record = curve_metrics(
        &id("A01"),
        times.view(),
        values.view(),
        LagCriterion::PercentOfControl(25.0),
        Some(control.view()),
    );
    let absolute = lag_len(times.view(), values.view(), 25.0);
    assert_relative_eq!(record.lag_len, absolute);

    let unresolved = curve_metrics(
        &id("A01"),
        times.view(),
        values.view(),
        LagCriterion::PercentOfControl(25.0),
        None,
    );
    assert_relative_eq!(unresolved.lag_len, LAG_FALLBACK);
}

#[test]
fn test_mic_picks_largest_inhibited_column() {
    let metrics: MetricsTable = vec![
        record("A01", 0.0, 0.0, 10.0),
        record("A02", 0.0, 0.0, 6.0),
        record("A03", 0.0, 0.0, 4.0),
    ]
    .into_iter()
    .collect();

    let mic = estimate_mic(&metrics, 8.0);
    assert_eq!(mic.len(), 1);
    assert_eq!(mic[0].row, "A");
    assert_eq!(mic[0].mic, Some(id("A03")));

    let none = estimate_mic(&metrics, 1.0);
    assert_eq!(none[0].mic, None);
}

#[test]
fn test_percent_loec_eligibility() {
    let controls = PositiveControls::parse("A12:A").unwrap();
    let metrics: MetricsTable = vec![
        record("A01", 10.0, 20.0, 1.0),
        record("A02", 40.0, 12.0, 4.0),
        record("A03", 70.0, 6.0, 7.0),
        record("A04", 95.0, 5.0, 9.5),
        record("A12", 100.0, 4.0, 10.0),
    ]
    .into_iter()
    .collect();

    // AUC cutoff 50: LOEC strictly below, NOEC strictly above
    let auc = percent_of_control(&metrics, &controls, Metric::Auc, 50.0);
    assert_eq!(auc[0].group, "A");
    assert_eq!(auc[0].loec, Some(id("A02")));
    assert_eq!(auc[0].noec, Some(id("A03")));

    // lag cutoff 6: A03 sits on the cutoff and is on neither side
    let lag = percent_of_control(&metrics, &controls, Metric::LagLen, 150.0);
    assert_eq!(lag[0].loec, Some(id("A02")));
    assert_eq!(lag[0].noec, Some(id("A04")));
}
