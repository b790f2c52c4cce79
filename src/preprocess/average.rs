use tracing::debug;

use crate::data::{PlateTable, TableError};
use crate::layout::ReplicateLayout;

/// Replace replicate wells by their point-wise mean
///
/// Row-wise groups produce one averaged curve per used column (`AB01`,
/// `AB02`, ...), column-wise groups one curve per group (`A01A02A03`). The
/// result holds only averaged curves.
pub fn average_replicates(
    table: &PlateTable,
    layout: &ReplicateLayout,
    columns: u8,
) -> Result<PlateTable, TableError> {
    let curves = layout
        .groups(columns)
        .into_iter()
        .map(|group| Ok((group.id, table.mean_of(&group.members)?)))
        .collect::<Result<Vec<_>, TableError>>()?;

    debug!(groups = curves.len(), "averaged replicate groups");
    table.with_curves(curves)
}
