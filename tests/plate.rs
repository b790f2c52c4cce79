//! Plate analysis integration tests
//!
//! Tests for the public API, from descriptors to thresholds

#[path = "plate/common.rs"]
mod common;

#[path = "plate/test_layout.rs"]
mod test_layout;

#[path = "plate/test_metrics.rs"]
mod test_metrics;

#[path = "plate/test_pipeline.rs"]
mod test_pipeline;

#[path = "plate/test_properties.rs"]
mod test_properties;
