use statrs::statistics::Statistics;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::{effect_increases, ThresholdResult};
use crate::layout::{PositiveControls, Row, SampleId};
use crate::metrics::{Metric, MetricsRecord, MetricsTable};

/// LOEC/NOEC by comparison with a percentage of the positive controls
///
/// For every positive-control assignment the cutoff is the mean control
/// metric times `percent / 100`. Control samples are records in a control
/// column whose rows overlap the control wells' rows; test samples are
/// records outside the control columns whose rows include the target rows.
///
/// The LOEC is the test sample on the effect side of the cutoff (above it for
/// lag, below it for AUC and yield) closest to it, the NOEC the sample on the
/// other side closest to it. Equal distances go to the first sample id.
///
/// Results are labelled with the rows of the tested samples: `ABC` for
/// averaged `ABC` replicates even when each row has its own controls.
pub fn percent_of_control(
    metrics: &MetricsTable,
    controls: &PositiveControls,
    metric: Metric,
    percent: f64,
) -> Vec<ThresholdResult> {
    controls
        .assignments()
        .iter()
        .map(|assignment| {
            let control_rows = assignment.rows();
            let control_columns = assignment.columns();

            let control_values: Vec<f64> = metrics
                .iter()
                .filter(|r| {
                    !r.sample.is_background()
                        && control_columns.contains(&r.sample.column())
                        && !r.sample.member_rows().is_disjoint(&control_rows)
                })
                .map(|r| r.get(metric))
                .collect();

            let mut tests: Vec<&MetricsRecord> = metrics
                .iter()
                .filter(|r| {
                    let rows: BTreeSet<Row> = r.sample.member_rows();
                    !r.sample.is_background()
                        && !control_columns.contains(&r.sample.column())
                        && assignment.target.iter().all(|t| rows.contains(t))
                })
                .collect();
            tests.sort_by(|a, b| a.sample.cmp(&b.sample));
            let group = group_label(&tests, &assignment.target);

            if control_values.is_empty() {
                warn!(group = %group, "no positive-control metrics found, LOEC/NOEC not determined");
                return ThresholdResult {
                    group,
                    loec: None,
                    noec: None,
                };
            }
            let cutoff = control_values.iter().mean() * percent / 100.0;

            let increases = effect_increases(metric);
            let loec = closest(&tests, metric, cutoff, increases);
            let noec = closest(&tests, metric, cutoff, !increases);
            debug!(group = %group, cutoff, loec = ?loec.as_ref().map(ToString::to_string), "percent-of-control threshold");

            ThresholdResult { group, loec, noec }
        })
        .collect()
}

/// Letters of the rows behind `tests`, or of `target` when nothing is tested
fn group_label(tests: &[&MetricsRecord], target: &[Row]) -> String {
    let rows: BTreeSet<Row> = tests.iter().flat_map(|r| r.sample.member_rows()).collect();
    if rows.is_empty() {
        target.iter().map(Row::letter).collect()
    } else {
        rows.iter().map(Row::letter).collect()
    }
}

/// Sample strictly above (or below) `cutoff` with the smallest distance to it
fn closest(
    sorted: &[&MetricsRecord],
    metric: Metric,
    cutoff: f64,
    above: bool,
) -> Option<SampleId> {
    let mut best: Option<(&SampleId, f64)> = None;
    for record in sorted {
        let value = record.get(metric);
        let distance = if above { value - cutoff } else { cutoff - value };
        if distance <= 0.0 || distance.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((&record.sample, distance));
        }
    }
    best.map(|(id, _)| id.clone())
}
