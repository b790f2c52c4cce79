//! Plate data
//!
//! A [`PlateTable`] holds every curve of one plate on a shared time axis.
//! Tables are built from an already-parsed tabular matrix (the first column
//! is `Hour`, the remaining headers are [`SampleId`](crate::layout::SampleId)s)
//! and every stage of the pipeline produces a new table on the same axis.
//!
//! ```rust
//! use growthcurves::data::PlateTable;
//!
//! let table = PlateTable::from_matrix(
//!     &["Hour", "A01", "B01"],
//!     &[vec![0.0, 0.1, 0.1], vec![1.0, 0.4, 0.3], vec![2.0, 0.9, 0.7]],
//! )
//! .unwrap();
//! assert_eq!(table.len(), 2);
//! ```

pub mod error;
mod table;

pub use error::TableError;
pub use table::{PlateTable, TIME_HEADER};
