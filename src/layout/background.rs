//! Background descriptor: `AB:CD,EF:GH`
//!
//! The left side of each pairing lists sample rows, the right side the rows
//! whose (averaged) curves are subtracted from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::DescriptorError;
use super::well::Row;

const CONTEXT: &str = "background";

/// Sample rows and the background rows subtracted from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundPairing {
    pub samples: Vec<Row>,
    pub background: Vec<Row>,
}

/// All background pairings on a plate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundLayout {
    pairings: Vec<BackgroundPairing>,
}

impl BackgroundLayout {
    pub fn parse(descriptor: &str) -> Result<Self, Vec<DescriptorError>> {
        let mut errors = Vec::new();
        let mut pairings = Vec::new();

        for entry in descriptor.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                errors.push(DescriptorError::EmptyToken { context: CONTEXT });
                continue;
            }
            let sides: Vec<&str> = entry.split(':').collect();
            if sides.len() != 2 {
                errors.push(DescriptorError::Separator {
                    context: CONTEXT,
                    expected: "sample rows and background rows separated by a single ':'",
                });
                continue;
            }

            let mut parse_side = |side: &str| -> Vec<Row> {
                if side.trim().is_empty() {
                    errors.push(DescriptorError::EmptyToken { context: CONTEXT });
                    return Vec::new();
                }
                side.chars()
                    .filter(|c| !c.is_whitespace())
                    .filter_map(|c| Row::new(c).map_err(|e| errors.push(e)).ok())
                    .collect()
            };
            let samples = parse_side(sides[0]);
            let background = parse_side(sides[1]);
            pairings.push(BackgroundPairing {
                samples,
                background,
            });
        }

        let samples: BTreeSet<Row> = pairings.iter().flat_map(|p| p.samples.clone()).collect();
        let overlap: BTreeSet<Row> = pairings
            .iter()
            .flat_map(|p| p.background.clone())
            .filter(|r| samples.contains(r))
            .collect();
        if !overlap.is_empty() {
            errors.push(DescriptorError::BackgroundOverlap {
                rows: overlap.iter().map(|r| r.letter()).collect(),
            });
        }

        if errors.is_empty() {
            Ok(Self { pairings })
        } else {
            Err(errors)
        }
    }

    pub fn pairings(&self) -> &[BackgroundPairing] {
        &self.pairings
    }

    /// Every background row on the plate
    pub fn background_rows(&self) -> BTreeSet<Row> {
        self.pairings
            .iter()
            .flat_map(|p| p.background.iter().copied())
            .collect()
    }
}
