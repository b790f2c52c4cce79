//! Plate table: a shared time axis and one curve per sample id

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

use super::error::TableError;
use crate::layout::SampleId;

/// Header of the time column
pub const TIME_HEADER: &str = "Hour";

/// Curves sampled on a common time axis
///
/// Values are stored one curve per row, so each curve is a contiguous
/// [`ArrayView1`]. Ids are unique and keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateTable {
    times: Array1<f64>,
    ids: Vec<SampleId>,
    values: Array2<f64>,
    index: HashMap<SampleId, usize>,
}

impl PlateTable {
    /// Build a table from a time axis and `(id, values)` curves
    pub fn new(times: Vec<f64>, curves: Vec<(SampleId, Vec<f64>)>) -> Result<Self, TableError> {
        Self::from_curves(
            Array1::from(times),
            curves
                .into_iter()
                .map(|(id, v)| (id, Array1::from(v)))
                .collect(),
        )
    }

    pub(crate) fn from_curves(
        times: Array1<f64>,
        curves: Vec<(SampleId, Array1<f64>)>,
    ) -> Result<Self, TableError> {
        if times.len() < 2 {
            return Err(TableError::InsufficientData {
                n: times.len(),
                required: 2,
            });
        }
        if times.iter().any(|t| !t.is_finite())
            || times.windows(2).into_iter().any(|w| w[1] <= w[0])
        {
            return Err(TableError::InvalidTimeSequence);
        }

        let n_times = times.len();
        let mut ids = Vec::with_capacity(curves.len());
        let mut index = HashMap::with_capacity(curves.len());
        let mut flat = Vec::with_capacity(curves.len() * n_times);

        for (id, curve) in curves {
            if curve.len() != n_times {
                return Err(TableError::ShapeMismatch {
                    description: format!(
                        "sample '{}' has {} values for {} time points",
                        id,
                        curve.len(),
                        n_times
                    ),
                });
            }
            if index.insert(id.clone(), ids.len()).is_some() {
                return Err(TableError::DuplicateSample { id });
            }
            ids.push(id);
            flat.extend(curve.iter().copied());
        }

        let values = Array2::from_shape_vec((ids.len(), n_times), flat).map_err(|e| {
            TableError::ShapeMismatch {
                description: e.to_string(),
            }
        })?;

        Ok(Self {
            times,
            ids,
            values,
            index,
        })
    }

    /// Build a table from a parsed tabular matrix
    ///
    /// The first header must be `Hour` and each row holds the time followed
    /// by one reading per sample, as a plate-reader export does. Headers are
    /// trimmed before parsing.
    pub fn from_matrix<S: AsRef<str>>(headers: &[S], rows: &[Vec<f64>]) -> Result<Self, TableError> {
        let first = headers.first().map(|h| h.as_ref().trim()).unwrap_or("");
        if first != TIME_HEADER {
            return Err(TableError::MissingTimeColumn {
                found: first.to_string(),
            });
        }

        let ids = headers[1..]
            .iter()
            .map(|h| {
                let header = h.as_ref().trim();
                header
                    .parse::<SampleId>()
                    .map_err(|source| TableError::InvalidHeader {
                        header: header.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(TableError::ShapeMismatch {
                    description: format!(
                        "row {} has {} values for {} columns",
                        i,
                        row.len(),
                        headers.len()
                    ),
                });
            }
        }

        let times = rows.iter().map(|r| r[0]).collect();
        let curves = ids
            .into_iter()
            .enumerate()
            .map(|(j, id)| (id, rows.iter().map(|r| r[j + 1]).collect()))
            .collect();

        Self::new(times, curves)
    }

    /// Export as headers (`Hour` first) and one row per time point
    pub fn to_matrix(&self) -> (Vec<String>, Vec<Vec<f64>>) {
        let headers = std::iter::once(TIME_HEADER.to_string())
            .chain(self.ids.iter().map(|id| id.to_string()))
            .collect();
        let rows = (0..self.n_times())
            .map(|t| {
                std::iter::once(self.times[t])
                    .chain(self.values.column(t).iter().copied())
                    .collect()
            })
            .collect();
        (headers, rows)
    }

    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.times.view()
    }

    pub fn ids(&self) -> &[SampleId] {
        &self.ids
    }

    /// Number of curves
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    pub fn contains(&self, id: &SampleId) -> bool {
        self.index.contains_key(id)
    }

    pub fn curve(&self, id: &SampleId) -> Option<ArrayView1<'_, f64>> {
        self.index.get(id).map(|&i| self.values.row(i))
    }

    /// Like [`curve`](Self::curve), but a missing id is an error
    pub fn require(&self, id: &SampleId) -> Result<ArrayView1<'_, f64>, TableError> {
        self.curve(id)
            .ok_or_else(|| TableError::MissingSample { id: id.clone() })
    }

    pub fn curves(&self) -> impl Iterator<Item = (&SampleId, ArrayView1<'_, f64>)> {
        self.ids.iter().zip(self.values.axis_iter(Axis(0)))
    }

    /// Point-wise arithmetic mean of the given curves
    pub fn mean_of(&self, ids: &[SampleId]) -> Result<Array1<f64>, TableError> {
        let mut sum = Array1::zeros(self.n_times());
        for id in ids {
            sum += &self.require(id)?;
        }
        Ok(sum / ids.len().max(1) as f64)
    }

    /// New table on the same time axis
    pub(crate) fn with_curves(&self, curves: Vec<(SampleId, Array1<f64>)>) -> Result<Self, TableError> {
        Self::from_curves(self.times.clone(), curves)
    }

    /// Apply `f` to every curve, keeping ids and time axis
    pub fn map_curves<F>(&self, f: F) -> Self
    where
        F: Fn(ArrayView1<'_, f64>) -> Array1<f64>,
    {
        let mut values = self.values.clone();
        for (mut row, source) in values
            .axis_iter_mut(Axis(0))
            .zip(self.values.axis_iter(Axis(0)))
        {
            row.assign(&f(source));
        }
        Self {
            times: self.times.clone(),
            ids: self.ids.clone(),
            values,
            index: self.index.clone(),
        }
    }

    /// Keep only the curves for which `keep` is true
    pub fn filter<F>(&self, keep: F) -> Self
    where
        F: Fn(&SampleId) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(&self.ids[i])).collect();
        let ids: Vec<SampleId> = rows.iter().map(|&i| self.ids[i].clone()).collect();
        let index = ids.iter().cloned().enumerate().map(|(i, id)| (id, i)).collect();
        Self {
            times: self.times.clone(),
            values: self.values.select(Axis(0), &rows),
            ids,
            index,
        }
    }
}

impl Serialize for PlateTable {
    /// Serialized as an ordered map: `Hour` first, then one array per sample
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len() + 1))?;
        map.serialize_entry(TIME_HEADER, &self.times.to_vec())?;
        for (id, curve) in self.curves() {
            map.serialize_entry(&id.to_string(), &curve.to_vec())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn id(s: &str) -> SampleId {
        s.parse().unwrap()
    }

    fn sample_table() -> PlateTable {
        PlateTable::from_matrix(
            &["Hour", "A01", " B01 ", "A02"],
            &[
                vec![0.0, 1.0, 3.0, 0.0],
                vec![1.0, 2.0, 4.0, 0.5],
                vec![2.0, 3.0, 5.0, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_matrix() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.n_times(), 3);
        assert_eq!(table.times(), array![0.0, 1.0, 2.0]);
        assert_eq!(table.curve(&id("B01")).unwrap(), array![3.0, 4.0, 5.0]);
        assert!(table.curve(&id("C01")).is_none());
    }

    #[test]
    fn test_round_trip_matrix() {
        let table = sample_table();
        let (headers, rows) = table.to_matrix();
        assert_eq!(headers, vec!["Hour", "A01", "B01", "A02"]);
        let back = PlateTable::from_matrix(&headers, &rows).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_mean_of() {
        let table = sample_table();
        let mean = table.mean_of(&[id("A01"), id("B01")]).unwrap();
        assert_eq!(mean, array![2.0, 3.0, 4.0]);
        assert_eq!(
            table.mean_of(&[id("H12")]).unwrap_err(),
            TableError::MissingSample { id: id("H12") }
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            PlateTable::from_matrix(&["Time", "A01"], &[vec![0.0, 1.0], vec![1.0, 1.0]]),
            Err(TableError::MissingTimeColumn { .. })
        ));
        assert!(matches!(
            PlateTable::from_matrix(&["Hour", "Q01"], &[vec![0.0, 1.0], vec![1.0, 1.0]]),
            Err(TableError::InvalidHeader { .. })
        ));
        assert!(matches!(
            PlateTable::from_matrix(&["Hour", "A01", "A01"], &[vec![0.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]]),
            Err(TableError::DuplicateSample { .. })
        ));
        assert!(matches!(
            PlateTable::from_matrix(&["Hour", "A01"], &[vec![0.0, 1.0]]),
            Err(TableError::InsufficientData { n: 1, required: 2 })
        ));
        assert!(matches!(
            PlateTable::from_matrix(&["Hour", "A01"], &[vec![1.0, 1.0], vec![1.0, 2.0]]),
            Err(TableError::InvalidTimeSequence)
        ));
        assert!(matches!(
            PlateTable::from_matrix(&["Hour", "A01"], &[vec![0.0, 1.0], vec![1.0]]),
            Err(TableError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_map_and_filter() {
        let table = sample_table();
        let doubled = table.map_curves(|c| &c * 2.0);
        assert_eq!(doubled.curve(&id("A02")).unwrap(), array![0.0, 1.0, 2.0]);

        let only_a = table.filter(|id| id.prefix() == "A");
        assert_eq!(only_a.len(), 2);
        assert_eq!(only_a.curve(&id("A02")).unwrap(), array![0.0, 0.5, 1.0]);
        assert!(!only_a.contains(&id("B01")));
    }

    #[test]
    fn test_serialize_as_columns() {
        let json = serde_json::to_value(sample_table()).unwrap();
        assert_eq!(json["Hour"], serde_json::json!([0.0, 1.0, 2.0]));
        assert_eq!(json["B01"], serde_json::json!([3.0, 4.0, 5.0]));
    }
}
