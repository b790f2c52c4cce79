//! Descriptor parsing through the public API

use growthcurves::config::{AnalysisConfig, ConfigError, LagMode};
use growthcurves::layout::*;

use crate::common::id;

#[test]
fn test_dilution_series_labels() {
    let columns: Vec<Column> = Column::used(4).collect();
    let series = ConcentrationSeries::parse("16:2", "mg/l", &columns).unwrap();
    assert_eq!(series.labels(), vec!["16mg/l", "8mg/l", "4mg/l", "2mg/l"]);
}

#[test]
fn test_row_replicates_expand_per_column() {
    let layout = ReplicateLayout::parse("A:B,C:D").unwrap();
    let ids: Vec<String> = layout
        .groups(2)
        .into_iter()
        .map(|g| g.id.to_string())
        .collect();
    assert_eq!(ids, vec!["AB01", "AB02", "CD01", "CD02"]);
}

#[test]
fn test_well_replicates() {
    let layout = ReplicateLayout::parse("A01:A02:A03, A04:A05:A06").unwrap();
    assert!(!layout.is_row_wise());
    let groups = layout.groups(12);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].id, id("A04A05A06"));
    assert_eq!(groups[1].members, vec![id("A04"), id("A05"), id("A06")]);
}

#[test]
fn test_replicate_errors_are_collected() {
    let errors = ReplicateLayout::parse("A:B:A,C").unwrap_err();
    assert!(errors.len() >= 2);
    assert!(errors
        .iter()
        .any(|e| matches!(e, DescriptorError::SingletonGroup { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, DescriptorError::OverlappingGroups { .. })));

    assert!(matches!(
        ReplicateLayout::parse("A:A01").unwrap_err()[0],
        DescriptorError::MixedReplicateTokens { .. }
    ));
}

#[test]
fn test_background_pairings() {
    let layout = BackgroundLayout::parse("AB:CD, EF:GH").unwrap();
    assert_eq!(layout.pairings()[1].background, Row::parse_set("GH").unwrap());
    assert!(layout.background_rows().contains(&Row::new('C').unwrap()));

    assert!(matches!(
        BackgroundLayout::parse("AB:B").unwrap_err()[0],
        DescriptorError::BackgroundOverlap { .. }
    ));
}

#[test]
fn test_positive_controls() {
    let controls = PositiveControls::parse("A11+A12:A,B11+B12:B").unwrap();
    assert_eq!(controls.assignments().len(), 2);
    let columns: Vec<String> = controls.columns().iter().map(|c| c.to_string()).collect();
    assert_eq!(columns, vec!["11", "12"]);

    assert!(PositiveControls::parse("A13:A").is_err());
    assert!(PositiveControls::parse("Z01:A").is_err());
}

#[test]
fn test_sample_ids_render_and_parse() {
    for text in ["A01", "AB12", "A01A02A03", "CD01_bg"] {
        assert_eq!(id(text).to_string(), text);
    }
    assert_eq!(id("AB07").prefix(), "AB");
    assert_eq!(id("A01A02A03").column().to_string(), "03");
    assert!(id("CD01_bg").is_background());
}

#[test]
fn test_config_reports_every_descriptor_problem() {
    let errors = AnalysisConfig::default()
        .with_replicates("A:Q")
        .with_positive_controls("A1x:A")
        .with_concentrations("1, two", "")
        .with_lag(LagMode::OdValue, "0.1")
        .validate()
        .unwrap_err();

    let fields: Vec<&str> = errors
        .iter()
        .filter_map(|e| match e {
            ConfigError::Descriptor { field, .. } => Some(*field),
            _ => None,
        })
        .collect();
    assert!(fields.contains(&"replicate"));
    assert!(fields.contains(&"positive control"));
    assert!(fields.contains(&"concentration"));
    assert!(errors.to_string().contains("problem(s) found"));
}
