//! Analyze a synthetic MIC plate and print the result tables
//!
//! Run with `RUST_LOG=growthcurves=debug cargo run --example plate` to see
//! per-stage logging.

use growthcurves::layout::SampleId;
use growthcurves::prelude::*;
use tracing_subscriber::EnvFilter;

/// Rows A–F hold a 1:2 dilution series in columns 1–11 and positive controls
/// in column 12, rows G–H are medium-only background wells.
fn synthetic_plate() -> Result<PlateTable, GrowthError> {
    let times: Vec<f64> = (0..=48).map(|i| f64::from(i) * 0.5).collect();
    let mut curves = Vec::new();

    for (r, row) in ('A'..='H').enumerate() {
        for column in 1..=12u8 {
            let values: Vec<f64> = if row >= 'G' {
                times.iter().map(|_| 0.05).collect()
            } else {
                // growth recovers as the concentration drops
                let inhibition = if column == 12 {
                    0.0
                } else {
                    (1.0 - f64::from(column - 1) / 6.0).max(0.0)
                };
                let capacity = 40.0 * (1.0 - inhibition) * (1.0 + 0.03 * r as f64);
                times
                    .iter()
                    .map(|t| 0.05 + capacity / (1.0 + (-(t - 8.0) * 0.8).exp()))
                    .collect()
            };
            let id = format!("{}{:02}", row, column).parse::<SampleId>()?;
            curves.push((id, values));
        }
    }

    Ok(PlateTable::new(times, curves)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let plate = synthetic_plate()?;
    let config = AnalysisConfig::default()
        .with_replicates("A:B:C,D:E:F")
        .with_backgrounds("ABCDEF:GH")
        .with_positive_controls("A12:A,B12:B,C12:C,D12:D,E12:E,F12:F")
        .with_concentrations("64:2", "mg/l")
        .with_lag(LagMode::PercentMaxOd, "10")
        .with_loec(LoecMode::AnovaAuc, "")
        .with_mic(MicMode::MaxOd, "5");

    println!("Preset:\n{}\n", config.to_json()?);

    let output = plate.analyze(&config)?;
    let label = |id: Option<&SampleId>| -> String {
        let concentrations = output.concentrations.as_ref();
        match id {
            Some(id) => concentrations
                .and_then(|c| c.get(id.column()))
                .map(|c| format!("{} ({})", id, c.label))
                .unwrap_or_else(|| id.to_string()),
            None => "none".to_string(),
        }
    };

    println!("{:<8} {:>8} {:>8} {:>8} {:>8}", "sample", "AUC", "lag", "yield", "slope");
    for record in output.metrics.iter().take(12) {
        println!(
            "{:<8} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            record.sample.to_string(),
            record.auc,
            record.lag_len,
            record.max_yield,
            record.slope
        );
    }

    if let Some(thresholds) = &output.thresholds {
        println!("\nLOEC/NOEC:");
        for t in thresholds {
            println!(
                "  {}: LOEC {}, NOEC {}",
                t.group,
                label(t.loec.as_ref()),
                label(t.noec.as_ref())
            );
        }
    }
    if let Some(mic) = &output.mic {
        println!("\nMIC:");
        for m in mic {
            println!("  {}: {}", m.row, label(m.mic.as_ref()));
        }
    }
    for warning in &output.warnings {
        println!("warning: {}", warning);
    }

    Ok(())
}
