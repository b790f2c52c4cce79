//! Curve preprocessing
//!
//! Raw plate curves go through, in order:
//!
//! 1. replicate averaging ([`average_replicates`], optional)
//! 2. background subtraction ([`subtract_background`], optional)
//! 3. when smoothing: floor clipping ([`clip_floor`]), smoothing
//!    ([`crate::smooth`]) and a baseline shift ([`shift_baseline`])
//!
//! Each step returns a new [`PlateTable`](crate::data::PlateTable) on the
//! same time axis.

mod average;
mod background;
mod baseline;
mod floor;

pub use average::average_replicates;
pub use background::{background_curves, subtract_background};
pub use baseline::{shift_baseline, shift_table};
pub use floor::{clip_floor, clip_table};

use crate::data::PlateTable;

/// Drop curves that use any well outside columns `01..=columns`
pub fn restrict_to_columns(table: &PlateTable, columns: u8) -> PlateTable {
    table.filter(|id| {
        id.member_wells()
            .iter()
            .all(|w| w.column.number() <= columns)
    })
}
