//! Plate-layout descriptors
//!
//! Plate layouts are written in four small mini-languages:
//!
//! | Descriptor | Example | Meaning |
//! |------------|---------|---------|
//! | Replicates | `A:B:C,D:E` | rows A, B, C are replicates; D and E are replicates |
//! | Replicates | `A01:A02:A03` | wells A01–A03 are replicates |
//! | Background | `AB:CD` | rows C and D are background for rows A and B |
//! | Positive controls | `A11+A12:A` | wells A11 and A12 are positive controls for row A |
//! | Concentrations | `16:2` or `16, 8, 4` | dilution series or explicit list |
//!
//! Every parser returns either a typed structure or the full list of
//! [`DescriptorError`]s it found. Parsing is purely structural and never
//! looks at plate data.

mod background;
mod concentration;
mod controls;
mod error;
mod replicates;
mod well;

pub use background::{BackgroundLayout, BackgroundPairing};
pub use concentration::{usable_columns, Concentration, ConcentrationSeries};
pub(crate) use concentration::round_to;
pub use controls::{PositiveControlAssignment, PositiveControls};
pub use error::DescriptorError;
pub use replicates::{ReplicateGroup, ReplicateLayout};
pub use well::{Column, Row, SampleId, Well, PLATE_COLUMNS, PLATE_ROWS};
