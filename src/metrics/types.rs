use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::layout::SampleId;

/// Lag length assigned when no lag can be derived
pub const LAG_FALLBACK: f64 = 24.0;

/// Curves whose maximum does not exceed this value are treated as not grown
pub const GROWTH_THRESHOLD: f64 = 15.0;

/// Growth metrics of one curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub sample: SampleId,
    /// Trapezoidal area under the curve
    pub auc: f64,
    /// End of the lag phase, in time units
    pub lag_len: f64,
    /// Maximum observed value
    pub max_yield: f64,
    /// Steepest positive slope over three sample intervals
    pub slope: f64,
}

impl MetricsRecord {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Auc => self.auc,
            Metric::LagLen => self.lag_len,
            Metric::MaxYield => self.max_yield,
            Metric::Slope => self.slope,
        }
    }
}

/// One of the four per-curve metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Auc,
    LagLen,
    MaxYield,
    Slope,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Auc => write!(f, "AUC"),
            Metric::LagLen => write!(f, "lag_len"),
            Metric::MaxYield => write!(f, "max_yield"),
            Metric::Slope => write!(f, "slope"),
        }
    }
}

/// How the lag-phase threshold is defined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum LagCriterion {
    /// Fixed value on the curve's own scale
    Absolute(f64),
    /// Percent of the maximum of the sample's positive-control curve
    PercentOfControl(f64),
}

/// Ordered metrics records with lookup by sample id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsTable {
    records: Vec<MetricsRecord>,
    index: HashMap<SampleId, usize>,
}

impl MetricsTable {
    pub fn new(records: Vec<MetricsRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.sample.clone(), i))
            .collect();
        Self { records, index }
    }

    pub fn records(&self) -> &[MetricsRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricsRecord> {
        self.records.iter()
    }

    pub fn get(&self, sample: &SampleId) -> Option<&MetricsRecord> {
        self.index.get(sample).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for MetricsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.records)
    }
}

impl FromIterator<MetricsRecord> for MetricsTable {
    fn from_iter<I: IntoIterator<Item = MetricsRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
