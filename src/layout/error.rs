//! Descriptor error types

use thiserror::Error;

/// Syntax and structure errors in plate-layout descriptors
///
/// Descriptor parsers collect every problem they find and return them as a
/// list, so a caller can show all of them at once.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    /// Row letter outside `A`–`H`
    #[error("Invalid row name '{found}': rows must be one of A-H")]
    InvalidRow { found: char },

    /// Column suffix that is not an integer
    #[error("Invalid column '{found}': columns must be integers between 1 and 12")]
    InvalidColumn { found: String },

    /// Column number outside `1..=12`
    #[error("Column {column} is outside the plate (1-12)")]
    ColumnOutOfRange { column: u32 },

    /// Well reference that cannot be read as row letter + column
    #[error("Invalid well '{found}': wells are written as e.g. A01")]
    InvalidWell { found: String },

    /// Curve id that is neither a well, a replicate average nor a background
    #[error("Invalid sample id '{found}'")]
    InvalidSampleId { found: String },

    /// Nothing between two separators
    #[error("Empty entry in {context} descriptor")]
    EmptyToken { context: &'static str },

    /// Missing or repeated separator
    #[error("Invalid separator in {context} descriptor: expected {expected}")]
    Separator {
        context: &'static str,
        expected: &'static str,
    },

    /// Replicate tokens mix single rows and wells
    #[error("Invalid replicate entry '{found}': use either rows (A:B) or wells (A01:A02), not both")]
    MixedReplicateTokens { found: String },

    /// Column-wise replicate group whose wells lie in different rows
    #[error("Replicate group '{group}' must list wells of a single row")]
    MixedRowGroup { group: String },

    /// Replicate group with a single member
    #[error("Replicate group '{group}' needs at least two members")]
    SingletonGroup { group: String },

    /// A row or well listed in more than one replicate group
    #[error("'{member}' appears in more than one replicate group")]
    OverlappingGroups { member: String },

    /// Background rows that are also sample rows
    #[error("Background and sample rows overlap: {rows}")]
    BackgroundOverlap { rows: String },

    /// Non-numeric concentration or dilution value
    #[error("Concentration value '{found}' is not a number")]
    InvalidConcentration { found: String },

    /// Dilution factor that would not produce a finite series
    #[error("Dilution factor must be a positive number, got {factor}")]
    InvalidDilution { factor: f64 },

    /// Both list and dilution syntax in one descriptor
    #[error("Provide either a list of concentrations (1, 2, 3) or highest concentration and dilution (12:4), not both")]
    AmbiguousConcentrations,

    /// Explicit concentration list of the wrong length
    #[error("{found} concentrations given but {expected} plate columns are usable (used columns minus positive-control columns)")]
    ConcentrationCount { expected: usize, found: usize },
}

