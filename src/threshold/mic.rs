use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::serialize_optional_sample;
use crate::layout::SampleId;
use crate::metrics::MetricsTable;

/// MIC estimate of one row prefix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicResult {
    /// Sample id without its column, e.g. `AB`
    pub row: String,
    #[serde(serialize_with = "serialize_optional_sample")]
    pub mic: Option<SampleId>,
}

/// Minimum inhibitory concentration from the maximum yield
///
/// For every sample prefix, the MIC is the sample with the largest column
/// whose `max_yield` does not exceed `cutoff`. Prefixes are reported in
/// sorted order.
pub fn estimate_mic(metrics: &MetricsTable, cutoff: f64) -> Vec<MicResult> {
    let prefixes: BTreeSet<String> = metrics.iter().map(|r| r.sample.prefix()).collect();

    let results: Vec<MicResult> = prefixes
        .into_iter()
        .map(|row| {
            let mic = metrics
                .iter()
                .filter(|r| r.sample.prefix() == row && r.max_yield <= cutoff)
                .map(|r| &r.sample)
                .fold(None::<&SampleId>, |best, s| match best {
                    Some(b) if b.column() >= s.column() => Some(b),
                    _ => Some(s),
                })
                .cloned();
            MicResult { row, mic }
        })
        .collect();

    debug!(rows = results.len(), cutoff, "estimated MIC");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsRecord;

    fn record(sample: &str, max_yield: f64) -> MetricsRecord {
        MetricsRecord {
            sample: sample.parse().unwrap(),
            auc: 0.0,
            lag_len: 0.0,
            max_yield,
            slope: 0.0,
        }
    }

    #[test]
    fn test_largest_qualifying_column() {
        let metrics = MetricsTable::new(vec![
            record("A01", 10.0),
            record("A02", 6.0),
            record("A03", 4.0),
        ]);
        let mics = estimate_mic(&metrics, 8.0);
        assert_eq!(mics.len(), 1);
        assert_eq!(mics[0].row, "A");
        assert_eq!(mics[0].mic.as_ref().unwrap().to_string(), "A03");
    }

    #[test]
    fn test_rows_without_inhibition() {
        let metrics = MetricsTable::new(vec![
            record("AB01", 1.0),
            record("AB02", 2.0),
            record("CD01", 9.0),
            record("CD02", 9.5),
        ]);
        let mics = estimate_mic(&metrics, 8.0);
        assert_eq!(mics[0].row, "AB");
        assert_eq!(mics[0].mic.as_ref().unwrap().to_string(), "AB02");
        assert_eq!(mics[1].row, "CD");
        assert!(mics[1].mic.is_none());
    }
}
