//! Concentration descriptor: `1, 0.5, 0.25` or `<start>:<dilution-factor>`
//!
//! Concentrations are assigned to the plate columns that are not occupied by
//! positive controls, in ascending column order. LOEC/NOEC/MIC selection
//! assumes the highest concentration sits in the lowest column index and
//! concentrations descend to the right; [`ConcentrationSeries::is_descending`]
//! reports whether a series follows that convention.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::DescriptorError;
use super::well::Column;

/// One plate column and its concentration label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub column: Column,
    pub value: f64,
    /// Value followed by the unit, e.g. `8mg/l`
    pub label: String,
}

/// Concentrations assigned to the usable plate columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationSeries {
    entries: Vec<Concentration>,
}

/// Columns `01..=columns` without the positive-control columns
pub fn usable_columns(columns: u8, controls: &BTreeSet<Column>) -> Vec<Column> {
    Column::used(columns)
        .filter(|c| !controls.contains(c))
        .collect()
}

/// Round to `decimals` places, half away from zero
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl ConcentrationSeries {
    /// Parse a concentration descriptor against the usable columns
    ///
    /// An explicit list must have exactly one entry per usable column. A
    /// dilution series divides the start value by the factor once per column,
    /// rounding each value to 6 decimals.
    pub fn parse(
        descriptor: &str,
        unit: &str,
        usable: &[Column],
    ) -> Result<Self, Vec<DescriptorError>> {
        let descriptor = descriptor.trim();
        let unit = unit.trim();
        let has_list = descriptor.contains(',');
        let has_dilution = descriptor.contains(':');

        if has_list && has_dilution {
            return Err(vec![DescriptorError::AmbiguousConcentrations]);
        }
        if !has_list && !has_dilution {
            return Err(vec![DescriptorError::Separator {
                context: "concentration",
                expected: "a list of concentrations (1, 2, 3) or highest concentration and dilution (12:4)",
            }]);
        }

        if has_dilution {
            Self::parse_dilution(descriptor, unit, usable)
        } else {
            Self::parse_list(descriptor, unit, usable)
        }
    }

    fn parse_list(
        descriptor: &str,
        unit: &str,
        usable: &[Column],
    ) -> Result<Self, Vec<DescriptorError>> {
        let mut errors = Vec::new();
        let mut values = Vec::new();

        for token in descriptor.split(',').map(str::trim) {
            if token.is_empty() {
                errors.push(DescriptorError::EmptyToken {
                    context: "concentration",
                });
                continue;
            }
            match token.parse::<f64>() {
                Ok(value) => values.push((value, format!("{}{}", token, unit))),
                Err(_) => errors.push(DescriptorError::InvalidConcentration {
                    found: token.to_string(),
                }),
            }
        }

        if errors.is_empty() && values.len() != usable.len() {
            errors.push(DescriptorError::ConcentrationCount {
                expected: usable.len(),
                found: values.len(),
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let entries = usable
            .iter()
            .zip(values)
            .map(|(&column, (value, label))| Concentration {
                column,
                value,
                label,
            })
            .collect();
        Ok(Self { entries })
    }

    fn parse_dilution(
        descriptor: &str,
        unit: &str,
        usable: &[Column],
    ) -> Result<Self, Vec<DescriptorError>> {
        let parts: Vec<&str> = descriptor.split(':').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(vec![DescriptorError::Separator {
                context: "concentration",
                expected: "highest concentration followed by dilution factor, e.g. 12:4",
            }]);
        }

        let mut errors = Vec::new();
        let mut number = |token: &str| match token.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.push(DescriptorError::InvalidConcentration {
                    found: token.to_string(),
                });
                None
            }
        };
        let start = number(parts[0]);
        let factor = number(parts[1]);

        let (Some(start), Some(factor)) = (start, factor) else {
            return Err(errors);
        };
        if !(factor.is_finite() && factor > 0.0) {
            return Err(vec![DescriptorError::InvalidDilution { factor }]);
        }

        let mut current = start;
        let entries = usable
            .iter()
            .enumerate()
            .map(|(i, &column)| {
                if i > 0 {
                    current /= factor;
                }
                let value = round_to(current, 6);
                Concentration {
                    column,
                    value,
                    label: format!("{}{}", value, unit),
                }
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Concentration] {
        &self.entries
    }

    /// Concentration assigned to `column`
    pub fn get(&self, column: Column) -> Option<&Concentration> {
        self.entries.iter().find(|e| e.column == column)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Whether concentrations never increase from left to right
    pub fn is_descending(&self) -> bool {
        self.entries.windows(2).all(|w| w[1].value <= w[0].value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(n: u8) -> Vec<Column> {
        Column::used(n).collect()
    }

    #[test]
    fn test_dilution_series() {
        let series = ConcentrationSeries::parse("16:2", "mg/l", &columns(4)).unwrap();
        assert_eq!(series.labels(), vec!["16mg/l", "8mg/l", "4mg/l", "2mg/l"]);
        assert_eq!(series.entries()[0].column.to_string(), "01");
        assert_eq!(series.entries()[3].column.to_string(), "04");
        assert!(series.is_descending());
    }

    #[test]
    fn test_dilution_rounding() {
        let series = ConcentrationSeries::parse("1:3", "", &columns(3)).unwrap();
        assert_eq!(series.labels(), vec!["1", "0.333333", "0.111111"]);
    }

    #[test]
    fn test_list_skips_control_columns() {
        let controls: BTreeSet<Column> = [Column::new(1).unwrap(), Column::new(2).unwrap()]
            .into_iter()
            .collect();
        let usable = usable_columns(5, &controls);
        let series = ConcentrationSeries::parse("10, 5, 1", "ug/l", &usable).unwrap();
        let cols: Vec<String> = series.entries().iter().map(|e| e.column.to_string()).collect();
        assert_eq!(cols, vec!["03", "04", "05"]);
        assert_eq!(series.get(Column::new(4).unwrap()).unwrap().label, "5ug/l");
        assert!(series.get(Column::new(1).unwrap()).is_none());
    }

    #[test]
    fn test_list_length_mismatch() {
        let errors = ConcentrationSeries::parse("1,2,3", "", &columns(4)).unwrap_err();
        assert_eq!(
            errors,
            vec![DescriptorError::ConcentrationCount {
                expected: 4,
                found: 3
            }]
        );
    }

    #[test]
    fn test_invalid_forms() {
        assert_eq!(
            ConcentrationSeries::parse("1,2:3", "", &columns(2)).unwrap_err(),
            vec![DescriptorError::AmbiguousConcentrations]
        );
        assert!(ConcentrationSeries::parse("12:4:2", "", &columns(2)).is_err());
        assert!(ConcentrationSeries::parse("a:2", "", &columns(2)).is_err());
        assert!(ConcentrationSeries::parse("1, x", "", &columns(2)).is_err());
        assert!(ConcentrationSeries::parse("8:0", "", &columns(2)).is_err());
        assert!(matches!(
            ConcentrationSeries::parse("5", "", &columns(1)).unwrap_err()[0],
            DescriptorError::Separator { .. }
        ));
    }

    #[test]
    fn test_ascending_detected() {
        let series = ConcentrationSeries::parse("1:0.5", "", &columns(3)).unwrap();
        assert_eq!(series.labels(), vec!["1", "2", "4"]);
        assert!(!series.is_descending());
    }
}
