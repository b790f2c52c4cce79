use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use statrs::statistics::Statistics;
use tracing::debug;

use super::dunnett::dunnett;
use super::ThresholdResult;
use crate::layout::{
    BackgroundLayout, Column, PositiveControls, ReplicateLayout, Row, SampleId, Well,
};
use crate::metrics::{Metric, MetricsTable};

/// Significance level for both the ANOVA and the post-hoc test
pub const SIGNIFICANCE: f64 = 0.05;

/// One-way ANOVA p-value across `groups`
///
/// `NaN` when the test is undefined (fewer than two groups, an empty group or
/// no residual degrees of freedom). With zero within-group variance the
/// p-value is `0` if the group means differ and `NaN` if they do not.
pub fn f_oneway(groups: &[Vec<f64>]) -> f64 {
    let k = groups.len();
    let n: usize = groups.iter().map(Vec::len).sum();
    if k < 2 || n <= k || groups.iter().any(Vec::is_empty) {
        return f64::NAN;
    }

    let grand = groups.iter().flatten().mean();
    let means: Vec<f64> = groups.iter().map(|g| g.iter().mean()).collect();
    let ss_between: f64 = groups
        .iter()
        .zip(&means)
        .map(|(g, m)| g.len() as f64 * (m - grand).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&means)
        .map(|(g, m)| g.iter().map(|v| (v - m).powi(2)).sum::<f64>())
        .sum();

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    if ss_within == 0.0 {
        return if ss_between > 0.0 { 0.0 } else { f64::NAN };
    }

    let f = (ss_between / df_between) / (ss_within / df_within);
    match FisherSnedecor::new(df_between, df_within) {
        Ok(dist) => dist.sf(f),
        Err(_) => f64::NAN,
    }
}

/// LOEC/NOEC per row-wise replicate group by ANOVA and Dunnett's test
///
/// For every replicate group without background rows, each non-control
/// column forms one group of member values; the control group is the
/// per-member mean over all positive-control columns. When the ANOVA is
/// significant, the LOEC is the significant column (by Dunnett's test) with
/// the largest index and the NOEC the next non-control column after it.
pub fn anova_thresholds(
    metrics: &MetricsTable,
    replicates: &ReplicateLayout,
    backgrounds: Option<&BackgroundLayout>,
    controls: &PositiveControls,
    metric: Metric,
    columns: u8,
) -> Vec<ThresholdResult> {
    let Some(groups) = replicates.row_groups() else {
        return Vec::new();
    };
    let background_rows = backgrounds
        .map(BackgroundLayout::background_rows)
        .unwrap_or_default();
    let control_columns = controls.columns();

    groups
        .iter()
        .filter(|rows| !rows.iter().any(|r| background_rows.contains(r)))
        .map(|rows| {
            let group: String = rows.iter().map(Row::letter).collect();
            let value = |row: Row, column: Column| {
                metrics
                    .get(&SampleId::well(Well::new(row, column)))
                    .map(|r| r.get(metric))
            };

            let tested: Vec<(Column, Vec<f64>)> = Column::used(columns)
                .filter(|c| !control_columns.contains(c))
                .map(|c| (c, rows.iter().filter_map(|&r| value(r, c)).collect()))
                .collect();
            let control: Vec<f64> = rows
                .iter()
                .filter_map(|&r| {
                    let values: Vec<f64> = control_columns
                        .iter()
                        .filter_map(|&c| value(r, c))
                        .collect();
                    (!values.is_empty()).then(|| values.iter().mean())
                })
                .collect();

            let mut all: Vec<Vec<f64>> = tested.iter().map(|(_, v)| v.clone()).collect();
            all.push(control.clone());
            let p = f_oneway(&all);
            debug!(group = %group, p, "one-way ANOVA");

            let mut result = ThresholdResult {
                group,
                loec: None,
                noec: None,
            };
            if p.is_nan() || p >= SIGNIFICANCE {
                return result;
            }

            let treatments: Vec<Vec<f64>> = tested.iter().map(|(_, v)| v.clone()).collect();
            let p_values = dunnett(&treatments, &control);
            let Some(last) = p_values.iter().rposition(|&p| p < SIGNIFICANCE) else {
                return result;
            };

            result.loec = Some(SampleId::rows(rows, tested[last].0));
            result.noec = tested
                .get(last + 1)
                .map(|(column, _)| SampleId::rows(rows, *column));
            result
        })
        .collect()
}
