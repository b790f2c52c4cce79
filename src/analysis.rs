//! End-to-end plate analysis
//!
//! [`analyze`] runs the full pipeline on one plate:
//!
//! | Stage | Output field |
//! |-------|--------------|
//! | background curves from the raw wells | [`AnalysisOutput::backgrounds`] |
//! | replicate variance on un-averaged curves | [`AnalysisOutput::variance`] |
//! | averaging, background subtraction | [`AnalysisOutput::working`] |
//! | floor clip, monotone smoothing and baseline shift | [`AnalysisOutput::smoothed`], [`AnalysisOutput::shifted`] |
//! | growth metrics | [`AnalysisOutput::metrics`] |
//! | LOEC/NOEC and MIC | [`AnalysisOutput::thresholds`], [`AnalysisOutput::mic`] |
//!
//! ```rust
//! use growthcurves::prelude::*;
//!
//! let hours: Vec<f64> = (0..8).map(f64::from).collect();
//! let table = PlateTable::new(
//!     hours,
//!     vec![
//!         ("A01".parse().unwrap(), vec![0.0, 1.0, 4.0, 10.0, 20.0, 30.0, 35.0, 36.0]),
//!         ("B01".parse().unwrap(), vec![0.0, 2.0, 5.0, 12.0, 22.0, 31.0, 36.0, 38.0]),
//!     ],
//! )
//! .unwrap();
//!
//! let config = AnalysisConfig::default()
//!     .with_replicates("A:B")
//!     .with_columns(1)
//!     .with_lag(LagMode::OdValue, "5");
//! let output = table.analyze(&config).unwrap();
//! assert_eq!(output.metrics.len(), 2);
//! assert_eq!(output.variance.unwrap().len(), 1);
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, info_span, warn};

use crate::config::{AnalysisConfig, ValidatedConfig};
use crate::data::PlateTable;
use crate::error::GrowthError;
use crate::layout::{BackgroundLayout, ConcentrationSeries};
use crate::metrics::{compute_metrics, ControlResolver, MetricsTable, ResolutionMode};
use crate::preprocess::{
    average_replicates, background_curves, clip_table, restrict_to_columns, shift_table,
    subtract_background,
};
use crate::smooth::smooth_table;
use crate::threshold::{
    anova_thresholds, estimate_mic, filter_thresholds, percent_of_control, LoecMethod, MicResult,
    ThresholdResult,
};
use crate::variance::{replicate_variance, VarianceRecord};

/// Non-fatal findings about a plate layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Warning {
    /// Concentrations increase from left to right
    AscendingConcentrations,
    /// LOEC/NOEC or MIC requested without a concentration descriptor
    MissingConcentrations {
        /// `LOEC/NOEC` or `MIC`
        feature: &'static str,
    },
    /// Metrics table has no curves left after preprocessing
    NoCurves,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::AscendingConcentrations => write!(
                f,
                "Concentrations increase across the plate; LOEC/NOEC and MIC assume the highest concentration in the first column"
            ),
            Warning::MissingConcentrations { feature } => write!(
                f,
                "{} is reported as plate columns because no concentrations were given",
                feature
            ),
            Warning::NoCurves => write!(f, "No curves left after preprocessing"),
        }
    }
}

/// Every table produced for one plate
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    /// Input curves, unchanged
    pub raw: PlateTable,
    /// Averaged and background-subtracted curves
    pub working: PlateTable,
    /// Averaged background curves (`_bg` ids)
    pub backgrounds: Option<PlateTable>,
    /// Monotone fit of the floor-clipped [`working`](Self::working) curves
    pub smoothed: Option<PlateTable>,
    /// [`smoothed`](Self::smoothed) shifted to start at 0
    pub shifted: Option<PlateTable>,
    pub metrics: MetricsTable,
    pub variance: Option<Vec<VarianceRecord>>,
    pub thresholds: Option<Vec<ThresholdResult>>,
    pub mic: Option<Vec<MicResult>>,
    pub concentrations: Option<ConcentrationSeries>,
    pub warnings: Vec<Warning>,
}

/// Curves after every preprocessing stage
struct Prepared {
    working: PlateTable,
    smoothed: Option<PlateTable>,
    shifted: Option<PlateTable>,
}

impl Prepared {
    /// Table the metrics are computed on
    fn final_table(&self) -> &PlateTable {
        self.shifted.as_ref().unwrap_or(&self.working)
    }
}

fn prepare(
    table: &PlateTable,
    backgrounds: Option<(&PlateTable, &BackgroundLayout)>,
    config: &ValidatedConfig,
) -> Result<Prepared, GrowthError> {
    let subtracted = match backgrounds {
        Some((curves, layout)) => subtract_background(table, curves, layout)?,
        None => table.clone(),
    };
    let working = subtracted;

    let (smoothed, shifted) = match &config.smoothing {
        Some(options) => {
            // smoothing starts from floor-clipped curves
            let smoothed = smooth_table(&clip_table(&working), options)?;
            let shifted = shift_table(&smoothed);
            (Some(smoothed), Some(shifted))
        }
        None => (None, None),
    };

    Ok(Prepared {
        working,
        smoothed,
        shifted,
    })
}

fn metrics_for(table: &PlateTable, config: &ValidatedConfig, mode: ResolutionMode) -> MetricsTable {
    let resolver = config
        .controls
        .as_ref()
        .map(|controls| ControlResolver::new(controls, config.replicates.as_ref(), mode));
    compute_metrics(table, config.lag, resolver.as_ref())
}

/// Run the full analysis of one plate
pub fn analyze(raw: &PlateTable, config: &ValidatedConfig) -> Result<AnalysisOutput, GrowthError> {
    let span = info_span!("analyze", curves = raw.len(), columns = config.columns);
    let _enter = span.enter();

    let used = restrict_to_columns(raw, config.columns);

    let backgrounds = config
        .backgrounds
        .as_ref()
        .map(|layout| background_curves(raw, layout, config.columns))
        .transpose()?;
    let background_pair = backgrounds.as_ref().zip(config.backgrounds.as_ref());

    // Variance always uses individual, unsmoothed wells
    let variance = match &config.replicates {
        Some(replicates) => {
            let wells = match background_pair {
                Some((curves, layout)) => subtract_background(&used, curves, layout)?,
                None => used.clone(),
            };
            let metrics = metrics_for(&wells, config, ResolutionMode::Wells);
            Some(replicate_variance(&metrics, replicates, config.columns))
        }
        None => None,
    };

    let (input, mode) = match (&config.replicates, config.average) {
        (Some(replicates), true) => (
            average_replicates(raw, replicates, config.columns)?,
            ResolutionMode::ReplicateGroups,
        ),
        _ => (used, ResolutionMode::Wells),
    };
    let prepared = prepare(&input, background_pair, config)?;
    let metrics = metrics_for(prepared.final_table(), config, mode);
    debug!(curves = metrics.len(), ?mode, "preprocessing done");

    let thresholds = match (&config.loec, &config.controls) {
        (Some(LoecMethod::PercentOfControl { metric, percent }), Some(controls)) => Some(
            filter_thresholds(percent_of_control(&metrics, controls, *metric, *percent)),
        ),
        (Some(LoecMethod::Anova { metric }), Some(controls)) => {
            match config.replicates.as_ref() {
                Some(replicates) => Some(filter_thresholds(anova_thresholds(
                    &metrics,
                    replicates,
                    config.backgrounds.as_ref(),
                    controls,
                    *metric,
                    config.columns,
                ))),
                None => None,
            }
        }
        _ => None,
    };

    let mic = config.mic_cutoff.map(|cutoff| estimate_mic(&metrics, cutoff));

    let mut warnings = Vec::new();
    match &config.concentrations {
        Some(series) if !series.is_descending() => {
            warnings.push(Warning::AscendingConcentrations)
        }
        Some(_) => {}
        None => {
            if config.loec.is_some() {
                warnings.push(Warning::MissingConcentrations {
                    feature: "LOEC/NOEC",
                });
            }
            if config.mic_cutoff.is_some() {
                warnings.push(Warning::MissingConcentrations { feature: "MIC" });
            }
        }
    }
    if metrics.is_empty() {
        warnings.push(Warning::NoCurves);
    }
    for warning in &warnings {
        warn!("{}", warning);
    }

    let Prepared {
        working,
        smoothed,
        shifted,
    } = prepared;

    Ok(AnalysisOutput {
        raw: raw.clone(),
        working,
        backgrounds,
        smoothed,
        shifted,
        metrics,
        variance,
        thresholds,
        mic,
        concentrations: config.concentrations.clone(),
        warnings,
    })
}

/// Extension trait running the analysis directly on a [`PlateTable`]
pub trait GrowthAnalysis {
    /// Validate `config` and analyze the plate
    fn analyze(&self, config: &AnalysisConfig) -> Result<AnalysisOutput, GrowthError>;
}

impl GrowthAnalysis for PlateTable {
    fn analyze(&self, config: &AnalysisConfig) -> Result<AnalysisOutput, GrowthError> {
        let validated = config.validate()?;
        analyze(self, &validated)
    }
}
