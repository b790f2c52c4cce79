//! Dose-response thresholds
//!
//! LOEC (lowest observed effect concentration) and NOEC (no observed effect
//! concentration) are reported as sample ids, i.e. plate columns; the
//! concentration series maps them to concentrations. Column selection assumes
//! concentrations descend from left to right on the plate.
//!
//! Two methods are available:
//!
//! - [`percent_of_control`]: compare each sample against a percentage of the
//!   mean positive-control metric
//! - [`anova_thresholds`]: one-way ANOVA per replicate group followed by
//!   Dunnett's many-to-one test against the positive controls
//!
//! [`estimate_mic`] derives the MIC from the maximum yield.

mod anova;
mod dunnett;
mod filter;
mod mic;
mod percent;

pub use anova::{anova_thresholds, f_oneway, SIGNIFICANCE};
pub use dunnett::dunnett;
pub use filter::filter_thresholds;
pub use mic::{estimate_mic, MicResult};
pub use percent::percent_of_control;

use serde::{Deserialize, Serialize, Serializer};

use crate::layout::SampleId;
use crate::metrics::Metric;

/// How LOEC/NOEC are derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum LoecMethod {
    /// Threshold at `percent` of the mean positive-control metric
    PercentOfControl { metric: Metric, percent: f64 },
    /// One-way ANOVA + Dunnett against the positive controls
    Anova { metric: Metric },
}

/// Whether an effect shows as an increase of `metric`
///
/// Inhibition prolongs the lag phase but lowers AUC and yield.
pub(crate) fn effect_increases(metric: Metric) -> bool {
    matches!(metric, Metric::LagLen)
}

/// LOEC and NOEC of one replicate group or positive-control target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdResult {
    /// Rows of the group, e.g. `AB`
    pub group: String,
    #[serde(serialize_with = "serialize_optional_sample")]
    pub loec: Option<SampleId>,
    #[serde(serialize_with = "serialize_optional_sample")]
    pub noec: Option<SampleId>,
}

/// Renders a missing sample as `none`
pub(crate) fn serialize_optional_sample<S: Serializer>(
    sample: &Option<SampleId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match sample {
        Some(id) => serializer.collect_str(id),
        None => serializer.serialize_str("none"),
    }
}
