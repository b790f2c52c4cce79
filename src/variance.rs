//! Replicate variance
//!
//! Spread of the growth metrics within each replicate group, expressed as
//! the population standard deviation divided by the mean. Computed on the
//! un-averaged (background-subtracted, if configured) metrics.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::layout::{round_to, ReplicateLayout, SampleId};
use crate::metrics::{Metric, MetricsRecord, MetricsTable};

/// Normalized standard deviations of one replicate group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceRecord {
    pub group: SampleId,
    pub auc: f64,
    pub lag_len: f64,
    pub max_yield: f64,
    pub slope: f64,
}

/// `std / mean` of one metric over `records`, rounded to 2 decimals
///
/// A zero mean gives `NaN`.
pub fn normalized_std(records: &[&MetricsRecord], metric: Metric) -> f64 {
    let values: Vec<f64> = records.iter().map(|r| r.get(metric)).collect();
    let mean = values.iter().mean();
    if mean == 0.0 {
        return f64::NAN;
    }
    round_to(values.iter().population_std_dev() / mean, 2)
}

/// Variance record for every replicate group found in `metrics`
///
/// Groups whose members have no metrics records are skipped.
pub fn replicate_variance(
    metrics: &MetricsTable,
    replicates: &ReplicateLayout,
    columns: u8,
) -> Vec<VarianceRecord> {
    let records: Vec<VarianceRecord> = replicates
        .groups(columns)
        .into_iter()
        .filter_map(|group| {
            let members: Vec<&MetricsRecord> = group
                .members
                .iter()
                .filter_map(|m| metrics.get(m))
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(VarianceRecord {
                group: group.id,
                auc: normalized_std(&members, Metric::Auc),
                lag_len: normalized_std(&members, Metric::LagLen),
                max_yield: normalized_std(&members, Metric::MaxYield),
                slope: normalized_std(&members, Metric::Slope),
            })
        })
        .collect();

    debug!(groups = records.len(), "computed replicate variance");
    records
}
