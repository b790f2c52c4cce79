//! Validation of [`AnalysisConfig`]

use std::collections::BTreeSet;

use super::error::{ConfigError, ValidationErrors};
use super::{AnalysisConfig, LagMode, LoecMode, MicMode};
use crate::layout::{
    usable_columns, BackgroundLayout, Column, ConcentrationSeries, DescriptorError,
    PositiveControls, ReplicateLayout, Well, PLATE_COLUMNS,
};
use crate::metrics::{LagCriterion, Metric};
use crate::smooth::SmoothingOptions;
use crate::threshold::LoecMethod;

/// A configuration that passed every check
///
/// Empty descriptors become `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub columns: u8,
    pub replicates: Option<ReplicateLayout>,
    pub backgrounds: Option<BackgroundLayout>,
    pub controls: Option<PositiveControls>,
    pub concentrations: Option<ConcentrationSeries>,
    /// Averaging requested and replicates present
    pub average: bool,
    pub smoothing: Option<SmoothingOptions>,
    pub lag: LagCriterion,
    pub loec: Option<LoecMethod>,
    pub mic_cutoff: Option<f64>,
}

impl ValidatedConfig {
    /// Plate columns that carry concentrations
    pub fn usable_columns(&self) -> Vec<Column> {
        let controls = self
            .controls
            .as_ref()
            .map(PositiveControls::columns)
            .unwrap_or_default();
        usable_columns(self.columns, &controls)
    }
}

/// Parse an optional descriptor, recording its errors under `field`
fn descriptor<T>(
    text: &str,
    field: &'static str,
    errors: &mut Vec<ConfigError>,
    parse: impl FnOnce(&str) -> Result<T, Vec<DescriptorError>>,
) -> Option<T> {
    if text.trim().is_empty() {
        return None;
    }
    match parse(text) {
        Ok(value) => Some(value),
        Err(found) => {
            errors.extend(
                found
                    .into_iter()
                    .map(|source| ConfigError::Descriptor { field, source }),
            );
            None
        }
    }
}

fn number(text: &str, field: &'static str, errors: &mut Vec<ConfigError>) -> Option<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.push(ConfigError::NonNumeric {
                field,
                value: text.to_string(),
            });
            None
        }
    }
}

pub(super) fn validate(config: &AnalysisConfig) -> Result<ValidatedConfig, ValidationErrors> {
    let mut errors = Vec::new();

    let columns_valid = (1..=PLATE_COLUMNS).contains(&config.columns);
    if !columns_valid {
        errors.push(ConfigError::ColumnsOutOfRange {
            columns: config.columns,
        });
    }
    let columns = config.columns.clamp(1, PLATE_COLUMNS);

    let replicates = descriptor(&config.replicates, "replicate", &mut errors, ReplicateLayout::parse);
    let backgrounds =
        descriptor(&config.backgrounds, "background", &mut errors, BackgroundLayout::parse);
    let controls = descriptor(
        &config.positive_controls,
        "positive control",
        &mut errors,
        PositiveControls::parse,
    );

    if columns_valid {
        let outside = |well: &Well| well.column.number() > columns;
        if let Some(controls) = &controls {
            for well in controls.wells().iter().filter(|w| outside(*w)) {
                errors.push(ConfigError::WellOutsideColumns {
                    context: "Positive control",
                    well: *well,
                    columns,
                });
            }
        }
        if let Some(replicates) = &replicates {
            for well in replicates.wells().iter().filter(|w| outside(*w)) {
                errors.push(ConfigError::WellOutsideColumns {
                    context: "Replicate",
                    well: *well,
                    columns,
                });
            }
        }
    }

    let control_columns: BTreeSet<Column> = controls
        .as_ref()
        .map(PositiveControls::columns)
        .unwrap_or_default();
    let usable = usable_columns(columns, &control_columns);
    let concentrations = descriptor(&config.concentrations, "concentration", &mut errors, |text| {
        ConcentrationSeries::parse(text, &config.concentration_unit, &usable)
    });

    // Lag
    let lag_value = if config.lag_threshold.trim().is_empty() {
        errors.push(ConfigError::MissingLagThreshold);
        None
    } else {
        number(&config.lag_threshold, "Lag calculation", &mut errors)
    };
    if config.lag_mode == LagMode::PercentMaxOd && config.positive_controls.trim().is_empty() {
        errors.push(ConfigError::RequiresPositiveControls {
            feature: "lag calculation as % max. OD",
        });
    }
    let lag = match config.lag_mode {
        LagMode::OdValue => LagCriterion::Absolute(lag_value.unwrap_or_default()),
        LagMode::PercentMaxOd => LagCriterion::PercentOfControl(lag_value.unwrap_or_default()),
    };

    // LOEC / NOEC
    let loec = match config.loec_mode {
        LoecMode::None => None,
        LoecMode::PercentLag | LoecMode::PercentAuc | LoecMode::PercentYield => {
            let (metric, name, above) = match config.loec_mode {
                LoecMode::PercentLag => (Metric::LagLen, "lag", true),
                LoecMode::PercentAuc => (Metric::Auc, "AUC", false),
                _ => (Metric::MaxYield, "yield", false),
            };
            if config.positive_controls.trim().is_empty() {
                errors.push(ConfigError::RequiresPositiveControls {
                    feature: "LOEC calculation as % of positive control",
                });
            }
            let percent = number(&config.loec_threshold, "LOEC calculation", &mut errors);
            if let Some(value) = percent {
                if (above && value <= 100.0) || (!above && value >= 100.0) {
                    errors.push(ConfigError::ThresholdDirection {
                        metric: name,
                        value,
                        expected: if above { "greater" } else { "smaller" },
                    });
                }
            }
            percent.map(|percent| LoecMethod::PercentOfControl { metric, percent })
        }
        LoecMode::AnovaLag | LoecMode::AnovaAuc | LoecMode::AnovaYield => {
            let metric = match config.loec_mode {
                LoecMode::AnovaLag => Metric::LagLen,
                LoecMode::AnovaAuc => Metric::Auc,
                _ => Metric::MaxYield,
            };
            if config.positive_controls.trim().is_empty() {
                errors.push(ConfigError::RequiresPositiveControls {
                    feature: "statistical testing",
                });
            }
            let row_wise = match &replicates {
                Some(layout) => layout.is_row_wise(),
                // an unparseable descriptor is already reported
                None => !config.replicates.trim().is_empty(),
            };
            if !row_wise {
                errors.push(ConfigError::RequiresRowReplicates);
            }
            if config.average {
                errors.push(ConfigError::RequiresUnaveraged);
            }
            Some(LoecMethod::Anova { metric })
        }
    };

    // MIC
    let mic_cutoff = match config.mic_mode {
        MicMode::None => None,
        MicMode::MaxOd => number(&config.mic_threshold, "MIC calculation", &mut errors),
    };

    if !errors.is_empty() {
        return Err(ValidationErrors::new(errors));
    }

    Ok(ValidatedConfig {
        columns,
        average: config.average && replicates.is_some(),
        replicates,
        backgrounds,
        controls,
        concentrations,
        smoothing: config.smooth.then_some(config.smoothing),
        lag,
        loec,
        mic_cutoff,
    })
}
