//! End-to-end analysis of a synthetic dose-response plate

use approx::assert_relative_eq;
use growthcurves::layout::Column;
use growthcurves::metrics::LAG_FALLBACK;
use growthcurves::prelude::*;

use crate::common::{dose_response_plate, id};

fn base_config() -> AnalysisConfig {
    AnalysisConfig::default()
        .with_replicates("A:B:C")
        .with_positive_controls("A06:A,B06:B,C06:C")
        .with_concentrations("16:2", "mg/l")
        .with_columns(6)
        .with_lag(LagMode::OdValue, "5")
}

#[test]
fn test_anova_thresholds() {
    let config = base_config().with_loec(LoecMode::AnovaAuc, "");
    let output = dose_response_plate().analyze(&config).unwrap();

    let thresholds = output.thresholds.unwrap();
    assert_eq!(thresholds.len(), 1);
    assert_eq!(thresholds[0].group, "ABC");
    assert_eq!(thresholds[0].loec, Some(id("ABC03")));
    assert_eq!(thresholds[0].noec, Some(id("ABC04")));

    let concentrations = output.concentrations.unwrap();
    let loec_column = thresholds[0].loec.as_ref().unwrap().column();
    assert_eq!(concentrations.get(loec_column).unwrap().label, "4mg/l");
    assert!(output.warnings.is_empty());
}

#[test]
fn test_percent_yield_thresholds() {
    let config = base_config().with_loec(LoecMode::PercentYield, "50");
    let output = dose_response_plate().analyze(&config).unwrap();

    let thresholds = output.thresholds.unwrap();
    let groups: Vec<&str> = thresholds.iter().map(|t| t.group.as_str()).collect();
    assert_eq!(groups, vec!["A", "B", "C"]);
    assert_eq!(thresholds[0].loec, Some(id("A03")));
    assert_eq!(thresholds[0].noec, Some(id("A04")));
}

#[test]
fn test_percent_yield_on_averages() {
    let config = base_config()
        .with_average(true)
        .with_loec(LoecMode::PercentYield, "50");
    let output = dose_response_plate().analyze(&config).unwrap();

    // one control per row, still a single averaged group
    let thresholds = output.thresholds.unwrap();
    assert_eq!(thresholds.len(), 1);
    assert_eq!(thresholds[0].group, "ABC");
    assert_eq!(thresholds[0].loec, Some(id("ABC03")));
    assert_eq!(thresholds[0].noec, Some(id("ABC04")));
}

#[test]
fn test_percent_lag_on_wells() {
    let config = base_config().with_lag(LagMode::PercentMaxOd, "10");
    let output = dose_response_plate().analyze(&config).unwrap();

    let lag = |s: &str| output.metrics.get(&id(s)).unwrap().lag_len;
    assert_relative_eq!(lag("A01"), LAG_FALLBACK);
    assert!(lag("A04") < LAG_FALLBACK);
    assert_relative_eq!(lag("A04"), lag("A06"));
    assert_relative_eq!(lag("B05"), lag("B06"));
}

#[test]
fn test_percent_lag_on_averages() {
    let config = base_config()
        .with_average(true)
        .with_lag(LagMode::PercentMaxOd, "10");
    let output = dose_response_plate().analyze(&config).unwrap();

    assert_eq!(output.metrics.len(), 6);
    let lag = |s: &str| output.metrics.get(&id(s)).unwrap().lag_len;
    assert_relative_eq!(lag("ABC01"), LAG_FALLBACK);
    assert_relative_eq!(lag("ABC04"), lag("ABC06"));

    let variance = output.variance.unwrap();
    assert_eq!(variance.len(), 6);
    let growing = variance.iter().find(|v| v.group == id("ABC04")).unwrap();
    assert_relative_eq!(growing.auc, 0.08);
    assert_relative_eq!(growing.lag_len, 0.0);
}

#[test]
fn test_mic_per_row() {
    let config = base_config().with_mic(MicMode::MaxOd, "1");
    let output = dose_response_plate().analyze(&config).unwrap();

    let mic = output.mic.unwrap();
    assert_eq!(mic.len(), 3);
    assert_eq!(mic[0].row, "A");
    assert_eq!(mic[0].mic, Some(id("A03")));
    let column = mic[0].mic.as_ref().unwrap().column();
    assert_eq!(column, Column::new(3).unwrap());
}

#[test]
fn test_preset_round_trip() {
    let config = base_config().with_loec(LoecMode::AnovaAuc, "");
    let preset = config.to_json().unwrap();
    let restored = AnalysisConfig::from_json(&preset).unwrap();

    let plate = dose_response_plate();
    let a = plate.analyze(&config).unwrap();
    let b = plate.analyze(&restored).unwrap();
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(a.thresholds, b.thresholds);
}

#[test]
fn test_output_json() {
    let config = base_config().with_loec(LoecMode::AnovaAuc, "");
    let output = dose_response_plate().analyze(&config).unwrap();
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["thresholds"][0]["loec"], "ABC03");
    assert_eq!(json["concentrations"]["entries"][0]["label"], "16mg/l");
    assert_eq!(json["working"]["Hour"].as_array().unwrap().len(), 25);
}
