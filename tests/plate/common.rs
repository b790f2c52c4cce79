//! Synthetic plates shared by the integration tests

use growthcurves::layout::SampleId;
use growthcurves::PlateTable;

pub fn id(s: &str) -> SampleId {
    s.parse().unwrap()
}

/// Hourly time axis over one day
pub fn hours() -> Vec<f64> {
    (0..=24).map(f64::from).collect()
}

/// Logistic growth reaching `capacity`
pub fn logistic(capacity: f64, midpoint: f64) -> Vec<f64> {
    hours()
        .iter()
        .map(|t| capacity / (1.0 + (-(t - midpoint)).exp()))
        .collect()
}

/// Dose-response plate: rows A–C, six columns, positive controls in column 6
///
/// Columns 1–3 are inhibited (flat at `0.1 × column`), columns 4–6 grow.
/// Each row has its own growth factor so replicates differ.
pub fn dose_response_plate() -> PlateTable {
    let factors = [('A', 1.0), ('B', 1.1), ('C', 0.9)];
    let mut curves = Vec::new();
    for (row, factor) in factors {
        for column in 1..=6u8 {
            let values = if column <= 3 {
                vec![0.1 * f64::from(column) * factor; 25]
            } else {
                logistic(40.0 * factor, 8.0)
            };
            curves.push((id(&format!("{}{:02}", row, column)), values));
        }
    }
    PlateTable::new(hours(), curves).unwrap()
}
