//! Growth-curve analysis for multi-well plate readers
//!
//! Turns optical-density time series from 96-well plates into growth metrics
//! (AUC, lag length, maximum yield, maximum slope), replicate variance and
//! dose-response thresholds (LOEC/NOEC, MIC).
//!
//! The usual entry point is [`GrowthAnalysis::analyze`] on a [`PlateTable`]:
//!
//! ```rust
//! use growthcurves::prelude::*;
//!
//! let table = PlateTable::from_matrix(
//!     &["Hour", "A01", "A02"],
//!     &[
//!         vec![0.0, 0.0, 0.0],
//!         vec![1.0, 10.0, 1.0],
//!         vec![2.0, 20.0, 2.0],
//!         vec![3.0, 30.0, 3.0],
//!     ],
//! )
//! .unwrap();
//! let config = AnalysisConfig::default()
//!     .with_columns(2)
//!     .with_lag(LagMode::OdValue, "5");
//! let output = table.analyze(&config).unwrap();
//! assert_eq!(output.metrics.len(), 2);
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod preprocess;
pub mod smooth;
pub mod threshold;
pub mod variance;

pub use analysis::{analyze, AnalysisOutput, GrowthAnalysis, Warning};
pub use config::{AnalysisConfig, ValidatedConfig};
pub use data::PlateTable;
pub use error::GrowthError;

pub mod prelude {
    pub mod layout {
        pub use crate::layout::{
            BackgroundLayout, Column, ConcentrationSeries, PositiveControls, ReplicateLayout,
            Row, SampleId, Well,
        };
    }
    pub mod metrics {
        pub use crate::metrics::{
            auc, compute_metrics, lag_len, max_value, slope, ControlResolver, LagCriterion,
            Metric, MetricsRecord, MetricsTable, ResolutionMode,
        };
    }

    //extension traits
    pub use crate::analysis::GrowthAnalysis;

    pub use crate::analysis::{analyze, AnalysisOutput, Warning};
    pub use crate::config::{AnalysisConfig, LagMode, LoecMode, MicMode, ValidatedConfig};
    pub use crate::data::PlateTable;
    pub use crate::error::GrowthError;
    pub use crate::smooth::SmoothingOptions;
}
