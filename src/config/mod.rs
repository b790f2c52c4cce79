//! Analysis configuration
//!
//! [`AnalysisConfig`] is the raw bundle a user (or a preset store) provides:
//! descriptor strings, threshold text fields and switches, exactly as they are
//! entered. [`AnalysisConfig::validate`] runs every descriptor parser and
//! consistency check and either returns a typed [`ValidatedConfig`] or all
//! problems at once.
//!
//! ```rust
//! use growthcurves::config::{AnalysisConfig, LagMode};
//!
//! let config = AnalysisConfig::default()
//!     .with_replicates("A:B:C")
//!     .with_columns(10)
//!     .with_lag(LagMode::OdValue, "0.1");
//! let validated = config.validate().unwrap();
//! assert!(validated.replicates.is_some());
//! ```

mod error;
mod validation;

pub use error::{ConfigError, ValidationErrors};
pub use validation::ValidatedConfig;

use serde::{Deserialize, Serialize};

use crate::layout::PLATE_COLUMNS;
use crate::smooth::SmoothingOptions;

/// How the lag threshold is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LagMode {
    /// Absolute value on the curve's scale
    #[default]
    #[serde(rename = "OD value")]
    OdValue,
    /// Percent of the positive control's maximum
    #[serde(rename = "% max. OD")]
    PercentMaxOd,
}

/// LOEC/NOEC method selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoecMode {
    #[default]
    None,
    #[serde(rename = "ANOVA lag")]
    AnovaLag,
    #[serde(rename = "ANOVA AUC")]
    AnovaAuc,
    #[serde(rename = "ANOVA yield")]
    AnovaYield,
    #[serde(rename = "% PC lag")]
    PercentLag,
    #[serde(rename = "% PC AUC")]
    PercentAuc,
    #[serde(rename = "% PC yield")]
    PercentYield,
}

/// MIC method selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MicMode {
    #[default]
    None,
    #[serde(rename = "max. OD")]
    MaxOd,
}

/// Raw analysis settings for one plate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Replicate descriptor, e.g. `A:B:C,D:E:F`
    pub replicates: String,
    /// Background descriptor, e.g. `ABC:H`
    pub backgrounds: String,
    /// Positive-control descriptor, e.g. `A11+A12:A`
    pub positive_controls: String,
    /// Concentration list or dilution series, e.g. `16:2`
    pub concentrations: String,
    pub concentration_unit: String,
    /// Number of plate columns in use, counted from column 1
    pub columns: u8,
    /// Average replicate groups before computing metrics
    pub average: bool,
    /// Fit monotone splines before computing metrics
    pub smooth: bool,
    pub smoothing: SmoothingOptions,
    pub lag_mode: LagMode,
    pub lag_threshold: String,
    pub loec_mode: LoecMode,
    pub loec_threshold: String,
    pub mic_mode: MicMode,
    pub mic_threshold: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            replicates: String::new(),
            backgrounds: String::new(),
            positive_controls: String::new(),
            concentrations: String::new(),
            concentration_unit: String::new(),
            columns: PLATE_COLUMNS,
            average: false,
            smooth: false,
            smoothing: SmoothingOptions::default(),
            lag_mode: LagMode::OdValue,
            lag_threshold: String::new(),
            loec_mode: LoecMode::None,
            loec_threshold: String::new(),
            mic_mode: MicMode::None,
            mic_threshold: String::new(),
        }
    }
}

impl AnalysisConfig {
    /// Read a configuration previously written by [`to_json`](Self::to_json)
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_replicates(mut self, descriptor: impl Into<String>) -> Self {
        self.replicates = descriptor.into();
        self
    }

    pub fn with_backgrounds(mut self, descriptor: impl Into<String>) -> Self {
        self.backgrounds = descriptor.into();
        self
    }

    pub fn with_positive_controls(mut self, descriptor: impl Into<String>) -> Self {
        self.positive_controls = descriptor.into();
        self
    }

    /// Set the concentration descriptor and its unit
    pub fn with_concentrations(
        mut self,
        descriptor: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        self.concentrations = descriptor.into();
        self.concentration_unit = unit.into();
        self
    }

    pub fn with_columns(mut self, columns: u8) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_average(mut self, average: bool) -> Self {
        self.average = average;
        self
    }

    pub fn with_smoothing(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_smoothing_options(mut self, options: SmoothingOptions) -> Self {
        self.smoothing = options;
        self
    }

    pub fn with_lag(mut self, mode: LagMode, threshold: impl Into<String>) -> Self {
        self.lag_mode = mode;
        self.lag_threshold = threshold.into();
        self
    }

    pub fn with_loec(mut self, mode: LoecMode, threshold: impl Into<String>) -> Self {
        self.loec_mode = mode;
        self.loec_threshold = threshold.into();
        self
    }

    pub fn with_mic(mut self, mode: MicMode, threshold: impl Into<String>) -> Self {
        self.mic_mode = mode;
        self.mic_threshold = threshold.into();
        self
    }

    /// Parse and cross-check every setting
    pub fn validate(&self) -> Result<ValidatedConfig, ValidationErrors> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.columns, 12);
        assert_eq!(config.lag_mode, LagMode::OdValue);
        assert_eq!(config.loec_mode, LoecMode::None);
        assert_eq!(config.smoothing, SmoothingOptions::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = AnalysisConfig::default()
            .with_replicates("A:B:C,D:E:F")
            .with_backgrounds("ABCDEF:GH")
            .with_positive_controls("A12:A,B12:B")
            .with_concentrations("16:2", "mg/l")
            .with_columns(12)
            .with_lag(LagMode::PercentMaxOd, "10")
            .with_loec(LoecMode::PercentLag, "150")
            .with_mic(MicMode::MaxOd, "20");
        let json = config.to_json().unwrap();
        assert!(json.contains("\"% PC lag\""));
        assert!(json.contains("\"% max. OD\""));
        assert_eq!(AnalysisConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnalysisConfig::from_json(r#"{"replicates": "A:B", "loec_mode": "ANOVA AUC"}"#)
            .unwrap();
        assert_eq!(config.replicates, "A:B");
        assert_eq!(config.loec_mode, LoecMode::AnovaAuc);
        assert_eq!(config.columns, 12);
    }
}
