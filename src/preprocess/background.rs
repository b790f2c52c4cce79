use ndarray::Array1;
use tracing::debug;

use crate::data::{PlateTable, TableError};
use crate::layout::{BackgroundLayout, Column, SampleId};

/// Averaged background curve of every pairing and used column
///
/// Background wells are always averaged across the pairing's background rows,
/// whether or not the samples themselves are averaged. Ids carry the `_bg`
/// suffix, e.g. `CD01_bg`.
pub fn background_curves(
    raw: &PlateTable,
    layout: &BackgroundLayout,
    columns: u8,
) -> Result<PlateTable, TableError> {
    let mut curves = Vec::new();
    for pairing in layout.pairings() {
        for column in Column::used(columns) {
            let members: Vec<SampleId> = SampleId::rows(&pairing.background, column)
                .member_wells()
                .into_iter()
                .map(SampleId::well)
                .collect();
            curves.push((
                SampleId::background(SampleId::rows(&pairing.background, column)),
                raw.mean_of(&members)?,
            ));
        }
    }
    raw.with_curves(curves)
}

/// Subtract the matching background curve from every paired sample curve
///
/// A curve is paired when all of its member rows are sample rows of one
/// pairing. Averaged curves get the mean of their members' backgrounds
/// subtracted, which equals the background of the averaged curve. Curves that
/// are not paired (including the background wells themselves) are dropped.
pub fn subtract_background(
    working: &PlateTable,
    backgrounds: &PlateTable,
    layout: &BackgroundLayout,
) -> Result<PlateTable, TableError> {
    let mut curves = Vec::with_capacity(working.len());

    for (id, curve) in working.curves() {
        let rows = id.member_rows();
        let Some(pairing) = layout
            .pairings()
            .iter()
            .find(|p| rows.iter().all(|r| p.samples.contains(r)))
        else {
            continue;
        };

        let wells = id.member_wells();
        let mut background = Array1::zeros(working.n_times());
        for well in &wells {
            let bg_id = SampleId::background(SampleId::rows(&pairing.background, well.column));
            background += &backgrounds.require(&bg_id)?;
        }
        background /= wells.len() as f64;

        curves.push((id.clone(), &curve - &background));
    }

    debug!(
        kept = curves.len(),
        dropped = working.len() - curves.len(),
        "subtracted background"
    );
    working.with_curves(curves)
}
