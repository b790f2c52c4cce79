//! Positive-control descriptor: `A11+A12:A,B11+B12:B`
//!
//! Wells before the `:` are the positive-control curves for the rows after
//! it. The single-well form drops the `+`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::DescriptorError;
use super::well::{Column, Row, Well};

const CONTEXT: &str = "positive control";

/// Positive-control wells for one row (or replicate row set)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositiveControlAssignment {
    pub wells: Vec<Well>,
    pub target: Vec<Row>,
}

impl PositiveControlAssignment {
    /// Whether every row of `rows` is covered by this assignment's target
    pub fn covers(&self, rows: &BTreeSet<Row>) -> bool {
        !rows.is_empty() && rows.iter().all(|r| self.target.contains(r))
    }

    pub fn columns(&self) -> BTreeSet<Column> {
        self.wells.iter().map(|w| w.column).collect()
    }

    pub fn rows(&self) -> BTreeSet<Row> {
        self.wells.iter().map(|w| w.row).collect()
    }
}

/// All positive-control assignments on a plate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositiveControls {
    assignments: Vec<PositiveControlAssignment>,
}

impl PositiveControls {
    pub fn parse(descriptor: &str) -> Result<Self, Vec<DescriptorError>> {
        let mut errors = Vec::new();
        let mut assignments = Vec::new();

        for entry in descriptor.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                errors.push(DescriptorError::EmptyToken { context: CONTEXT });
                continue;
            }
            let Some((wells_part, target_part)) = entry.split_once(':') else {
                errors.push(DescriptorError::Separator {
                    context: CONTEXT,
                    expected: "control wells and rows separated by ':', e.g. A11+A12:A",
                });
                continue;
            };
            if target_part.contains(':') {
                errors.push(DescriptorError::Separator {
                    context: CONTEXT,
                    expected: "a single ':' per entry",
                });
                continue;
            }

            let mut wells = Vec::new();
            for token in wells_part.split('+').map(str::trim) {
                if token.is_empty() {
                    errors.push(DescriptorError::EmptyToken { context: CONTEXT });
                    continue;
                }
                match token.parse::<Well>() {
                    Ok(well) => wells.push(well),
                    Err(e) => errors.push(e),
                }
            }

            let target = match Row::parse_set(target_part) {
                Ok(rows) if rows.is_empty() => {
                    errors.push(DescriptorError::EmptyToken { context: CONTEXT });
                    continue;
                }
                Ok(rows) => rows,
                Err(e) => {
                    errors.push(e);
                    continue;
                }
            };

            assignments.push(PositiveControlAssignment { wells, target });
        }

        if errors.is_empty() {
            Ok(Self { assignments })
        } else {
            Err(errors)
        }
    }

    pub fn assignments(&self) -> &[PositiveControlAssignment] {
        &self.assignments
    }

    /// First assignment whose target covers all of `rows`
    pub fn for_rows(&self, rows: &BTreeSet<Row>) -> Option<&PositiveControlAssignment> {
        self.assignments.iter().find(|a| a.covers(rows))
    }

    /// Union of every positive-control column on the plate
    pub fn columns(&self) -> BTreeSet<Column> {
        self.assignments.iter().flat_map(|a| a.columns()).collect()
    }

    /// Every positive-control well on the plate
    pub fn wells(&self) -> BTreeSet<Well> {
        self.assignments
            .iter()
            .flat_map(|a| a.wells.iter().copied())
            .collect()
    }
}
