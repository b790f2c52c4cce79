//! Replicate descriptor: `A:B:C,D:E` (row-wise) or `A01:A02,A03:A04` (column-wise)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::DescriptorError;
use super::well::{Column, Row, SampleId, Well};

const CONTEXT: &str = "replicate";

/// Replicate groups declared on a plate
///
/// Row-wise groups repeat a whole row across every used column (the typical
/// concentration-series layout). Column-wise groups list individual wells in
/// one row (the typical growth-characterization layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicateLayout {
    Rows(Vec<Vec<Row>>),
    Wells(Vec<Vec<Well>>),
}

/// One replicate group resolved against the used plate columns
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateGroup {
    /// Id of the averaged curve
    pub id: SampleId,
    /// Raw curves averaged into `id`
    pub members: Vec<SampleId>,
}

impl ReplicateLayout {
    /// Parse a replicate descriptor
    ///
    /// Tokens of length 1 are rows, tokens of length 3 are wells; a
    /// descriptor mixing both is rejected.
    pub fn parse(descriptor: &str) -> Result<Self, Vec<DescriptorError>> {
        let mut errors = Vec::new();
        let groups: Vec<Vec<&str>> = descriptor
            .split(',')
            .map(|group| group.split(':').map(str::trim).collect())
            .collect();

        if groups.iter().flatten().any(|t| t.is_empty()) {
            errors.push(DescriptorError::EmptyToken { context: CONTEXT });
        }

        let lengths: HashSet<usize> = groups
            .iter()
            .flatten()
            .filter(|t| !t.is_empty())
            .map(|t| t.chars().count())
            .collect();

        let layout = if lengths.iter().all(|&l| l == 1) {
            Self::Rows(collect_groups(&groups, &mut errors, |t| {
                t.chars()
                    .next()
                    .ok_or(DescriptorError::EmptyToken { context: CONTEXT })
                    .and_then(Row::new)
            }))
        } else if lengths.iter().all(|&l| l == 3) {
            let groups = collect_groups(&groups, &mut errors, |t| t.parse::<Well>());
            for group in &groups {
                let rows: HashSet<Row> = group.iter().map(|w| w.row).collect();
                if rows.len() > 1 {
                    errors.push(DescriptorError::MixedRowGroup {
                        group: group
                            .iter()
                            .map(Well::to_string)
                            .collect::<Vec<_>>()
                            .join(":"),
                    });
                }
            }
            Self::Wells(groups)
        } else {
            errors.push(DescriptorError::MixedReplicateTokens {
                found: descriptor.trim().to_string(),
            });
            return Err(errors);
        };

        if errors.is_empty() {
            Ok(layout)
        } else {
            Err(errors)
        }
    }

    /// Whether replicates are whole rows
    pub fn is_row_wise(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    /// Expand into averaged-id/member pairs over the used columns
    ///
    /// Row-wise layouts yield one group per replicate row-set and column,
    /// column-wise layouts yield one group per listed well set.
    pub fn groups(&self, columns: u8) -> Vec<ReplicateGroup> {
        match self {
            Self::Rows(groups) => groups
                .iter()
                .flat_map(|rows| {
                    Column::used(columns).map(move |column| ReplicateGroup {
                        id: SampleId::rows(rows, column),
                        members: rows
                            .iter()
                            .map(|&row| SampleId::well(Well::new(row, column)))
                            .collect(),
                    })
                })
                .collect(),
            Self::Wells(groups) => groups
                .iter()
                .map(|wells| ReplicateGroup {
                    id: SampleId::Wells(wells.clone()),
                    members: wells.iter().map(|&w| SampleId::well(w)).collect(),
                })
                .collect(),
        }
    }

    /// Row-wise groups, if this layout is row-wise
    pub fn row_groups(&self) -> Option<&[Vec<Row>]> {
        match self {
            Self::Rows(groups) => Some(groups),
            Self::Wells(_) => None,
        }
    }

    /// Wells referenced by a column-wise layout
    pub fn wells(&self) -> Vec<Well> {
        match self {
            Self::Rows(_) => Vec::new(),
            Self::Wells(groups) => groups.iter().flatten().copied().collect(),
        }
    }
}

fn collect_groups<T, F>(
    groups: &[Vec<&str>],
    errors: &mut Vec<DescriptorError>,
    parse: F,
) -> Vec<Vec<T>>
where
    T: Copy + Eq + std::hash::Hash + std::fmt::Display,
    F: Fn(&str) -> Result<T, DescriptorError>,
{
    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(groups.len());

    for tokens in groups {
        let mut members = Vec::with_capacity(tokens.len());
        for token in tokens.iter().filter(|t| !t.is_empty()) {
            match parse(token) {
                Ok(member) => {
                    if !seen.insert(member) {
                        errors.push(DescriptorError::OverlappingGroups {
                            member: member.to_string(),
                        });
                    }
                    members.push(member);
                }
                Err(e) => errors.push(e),
            }
        }
        if members.len() == 1 {
            errors.push(DescriptorError::SingletonGroup {
                group: tokens.join(":"),
            });
        }
        parsed.push(members);
    }

    parsed
}
