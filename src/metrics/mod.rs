//! Growth metrics
//!
//! Every curve of a [`PlateTable`] yields one [`MetricsRecord`]:
//!
//! | Metric | Definition |
//! |--------|------------|
//! | AUC | trapezoidal integral over the time axis |
//! | max_yield | maximum observed value |
//! | lag_len | interpolated time at which the curve first exceeds the lag threshold |
//! | slope | steepest positive rise over three sample intervals |
//!
//! All values are rounded to two decimals. Curves are processed in parallel.

mod calc;
mod resolve;
mod types;

pub use calc::{auc, lag_len, max_value, slope};
pub use resolve::{ControlResolver, ResolutionMode};
pub use types::{
    LagCriterion, Metric, MetricsRecord, MetricsTable, GROWTH_THRESHOLD, LAG_FALLBACK,
};

use ndarray::ArrayView1;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::data::PlateTable;
use crate::layout::{round_to, SampleId};

/// Metrics of one curve
///
/// `control` is the sample's positive-control curve; it is only read for
/// [`LagCriterion::PercentOfControl`], where a missing control gives
/// [`LAG_FALLBACK`].
pub fn curve_metrics(
    sample: &SampleId,
    times: ArrayView1<f64>,
    values: ArrayView1<f64>,
    criterion: LagCriterion,
    control: Option<ArrayView1<f64>>,
) -> MetricsRecord {
    let lag = match (criterion, control) {
        (LagCriterion::Absolute(threshold), _) => lag_len(times, values, threshold),
        (LagCriterion::PercentOfControl(percent), Some(control)) => {
            lag_len(times, values, percent / 100.0 * max_value(control))
        }
        (LagCriterion::PercentOfControl(_), None) => LAG_FALLBACK,
    };

    MetricsRecord {
        sample: sample.clone(),
        auc: round_to(auc(times, values), 2),
        lag_len: lag,
        max_yield: round_to(max_value(values), 2),
        slope: slope(times, values),
    }
}

/// Metrics of every curve in `table`, in table order
///
/// `resolver` is required for [`LagCriterion::PercentOfControl`]; without
/// one every lag falls back to [`LAG_FALLBACK`].
pub fn compute_metrics(
    table: &PlateTable,
    criterion: LagCriterion,
    resolver: Option<&ControlResolver>,
) -> MetricsTable {
    let times = table.times();
    let percent = matches!(criterion, LagCriterion::PercentOfControl(_));

    let records: Vec<MetricsRecord> = table
        .curves()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(id, values)| {
            let control = if percent {
                let control = resolver.and_then(|r| r.resolve(table, id));
                if control.is_none() {
                    warn!(sample = %id, "no positive control found, lag set to {}", LAG_FALLBACK);
                }
                control
            } else {
                None
            };
            curve_metrics(id, times, values, criterion, control.as_ref().map(|c| c.view()))
        })
        .collect();

    debug!(
        curves = records.len(),
        mode = ?resolver.map(|r| r.mode()),
        "computed growth metrics"
    );
    MetricsTable::new(records)
}
