//! Error types for plate tables

use thiserror::Error;

use crate::layout::{DescriptorError, SampleId};

/// Problems with the shape or content of a plate table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// The first header is not the time axis
    #[error("First column must be the time axis 'Hour', found '{found}'")]
    MissingTimeColumn { found: String },

    /// A header that is not a valid sample id
    #[error("Column header '{header}' is not a sample id: {source}")]
    InvalidHeader {
        header: String,
        #[source]
        source: DescriptorError,
    },

    /// The same sample id twice
    #[error("Duplicate sample '{id}'")]
    DuplicateSample { id: SampleId },

    /// Too few time points for interpolation and integration
    #[error("Insufficient data: {n} time points, need at least {required}")]
    InsufficientData { n: usize, required: usize },

    /// Time values are not strictly increasing
    #[error("Invalid time sequence: times must be finite and strictly increasing")]
    InvalidTimeSequence,

    /// Row or column of the wrong length
    #[error("Shape mismatch: {description}")]
    ShapeMismatch { description: String },

    /// A curve that the layout refers to is not in the table
    #[error("Sample '{id}' referenced by the plate layout is missing from the data")]
    MissingSample { id: SampleId },
}
