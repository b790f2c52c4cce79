//! Positive-control curve lookup for percent-of-control lag thresholds

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::data::PlateTable;
use crate::layout::{PositiveControls, ReplicateLayout, SampleId};

/// Which curves positive controls are looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Table of raw wells: controls are the listed wells
    Wells,
    /// Table of replicate averages: controls are the averaged groups
    ReplicateGroups,
}

/// Finds the positive-control curve of a sample
#[derive(Debug, Clone, Copy)]
pub struct ControlResolver<'a> {
    controls: &'a PositiveControls,
    replicates: Option<&'a ReplicateLayout>,
    mode: ResolutionMode,
}

impl<'a> ControlResolver<'a> {
    pub fn new(
        controls: &'a PositiveControls,
        replicates: Option<&'a ReplicateLayout>,
        mode: ResolutionMode,
    ) -> Self {
        Self {
            controls,
            replicates,
            mode,
        }
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Point-wise mean of the control curves for `sample`
    ///
    /// `None` when no assignment covers the sample or a control curve is not
    /// in `table`.
    pub fn resolve(&self, table: &PlateTable, sample: &SampleId) -> Option<Array1<f64>> {
        let ids = self.control_ids(sample)?;
        if ids.is_empty() {
            return None;
        }
        table.mean_of(&ids).ok()
    }

    fn control_ids(&self, sample: &SampleId) -> Option<Vec<SampleId>> {
        match (self.mode, sample) {
            (ResolutionMode::Wells, _) => {
                let assignment = self.controls.for_rows(&sample.member_rows())?;
                Some(assignment.wells.iter().map(|&w| SampleId::well(w)).collect())
            }
            (ResolutionMode::ReplicateGroups, SampleId::Rows { rows, .. }) => Some(
                self.controls
                    .columns()
                    .into_iter()
                    .map(|column| SampleId::rows(rows, column))
                    .collect(),
            ),
            (ResolutionMode::ReplicateGroups, SampleId::Wells(_)) => {
                let assignment = self.controls.for_rows(&sample.member_rows())?;
                let groups = match self.replicates? {
                    ReplicateLayout::Wells(groups) => groups,
                    ReplicateLayout::Rows(_) => return None,
                };
                Some(
                    groups
                        .iter()
                        .filter(|group| group.iter().any(|w| assignment.wells.contains(w)))
                        .map(|group| SampleId::Wells(group.clone()))
                        .collect(),
                )
            }
            (ResolutionMode::ReplicateGroups, SampleId::Background(_)) => None,
        }
    }
}
