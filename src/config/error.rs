//! Configuration errors

use std::fmt;
use thiserror::Error;

use crate::layout::{DescriptorError, Well};

/// A single problem with an [`AnalysisConfig`](super::AnalysisConfig)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    // ─────────────────────────────────────────────────────────────────────────
    // Descriptor Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A layout descriptor that does not parse
    #[error("Invalid {field} entry: {source}")]
    Descriptor {
        field: &'static str,
        #[source]
        source: DescriptorError,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Threshold Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// No lag threshold given
    #[error("Please provide a threshold for calculating the end of the lag phase")]
    MissingLagThreshold,

    /// Threshold text that is not a number
    #[error("{field} threshold value must be a number, got '{value}'")]
    NonNumeric { field: &'static str, value: String },

    /// Percent-of-control LOEC threshold on the wrong side of 100 %
    #[error("LOEC threshold for {metric} should be {expected} than 100%, got {value}")]
    ThresholdDirection {
        metric: &'static str,
        value: f64,
        /// `greater` or `smaller`
        expected: &'static str,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Layout Requirements
    // ─────────────────────────────────────────────────────────────────────────
    /// Number of used columns outside the plate
    #[error("Number of used columns must be between 1 and 12, got {columns}")]
    ColumnsOutOfRange { columns: u8 },

    /// A well the layout refers to lies beyond the used columns
    #[error("{context} well {well} lies outside the {columns} used columns")]
    WellOutsideColumns {
        context: &'static str,
        well: Well,
        columns: u8,
    },

    /// Feature that needs positive controls
    #[error("Positive controls are required for {feature}")]
    RequiresPositiveControls { feature: &'static str },

    /// ANOVA without row-wise replicates
    #[error("Row-wise replicates (e.g. A:B:C) are required for statistical testing")]
    RequiresRowReplicates,

    /// ANOVA on averaged data
    #[error("Statistical testing needs individual replicates; disable averaging")]
    RequiresUnaveraged,
}

/// Every problem found while validating a configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationErrors(Vec<ConfigError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ConfigError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s) found", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
