use super::ThresholdResult;
use crate::layout::SampleId;

/// Merge results of the same group, keeping the largest column
///
/// LOEC and NOEC are merged independently: of all candidates reported for a
/// group, the one in the rightmost plate column (the lowest concentration)
/// wins. Groups keep their first-seen order.
pub fn filter_thresholds(results: Vec<ThresholdResult>) -> Vec<ThresholdResult> {
    let mut merged: Vec<ThresholdResult> = Vec::new();
    for result in results {
        match merged.iter_mut().find(|m| m.group == result.group) {
            Some(existing) => {
                existing.loec = rightmost(existing.loec.take(), result.loec);
                existing.noec = rightmost(existing.noec.take(), result.noec);
            }
            None => merged.push(result),
        }
    }
    merged
}

fn rightmost(current: Option<SampleId>, candidate: Option<SampleId>) -> Option<SampleId> {
    match (current, candidate) {
        (Some(c), Some(n)) if n.column() > c.column() => Some(n),
        (Some(c), _) => Some(c),
        (None, n) => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(group: &str, loec: Option<&str>, noec: Option<&str>) -> ThresholdResult {
        ThresholdResult {
            group: group.to_string(),
            loec: loec.map(|s| s.parse().unwrap()),
            noec: noec.map(|s| s.parse().unwrap()),
        }
    }

    #[test]
    fn test_largest_column_kept() {
        let filtered = filter_thresholds(vec![
            result("A", Some("A03"), Some("A04")),
            result("B", None, None),
            result("A", Some("A05"), None),
            result("A", Some("A02"), Some("A06")),
        ]);
        assert_eq!(
            filtered,
            vec![
                result("A", Some("A05"), Some("A06")),
                result("B", None, None),
            ]
        );
    }
}
