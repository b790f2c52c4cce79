//! Plate identifiers: rows, columns, wells and sample ids
//!
//! A [`SampleId`] names every curve the engine produces. Raw wells render as
//! `A01`, row-wise replicate averages as `AB01`, column-wise replicate
//! averages as `A01A02A03` and background curves carry a `_bg` suffix.
//! Rendering ([`fmt::Display`]) and parsing ([`FromStr`]) are an exact pair,
//! so ids survive a trip through an external spreadsheet writer unchanged.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::error::DescriptorError;

/// Number of rows on a 96-well plate
pub const PLATE_ROWS: u8 = 8;
/// Number of columns on a 96-well plate
pub const PLATE_COLUMNS: u8 = 12;

const BACKGROUND_SUFFIX: &str = "_bg";

/// Plate row letter (`A`–`H`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row(char);

impl Row {
    /// Create a row from its letter, rejecting anything outside `A`–`H`
    pub fn new(letter: char) -> Result<Self, DescriptorError> {
        if ('A'..='H').contains(&letter) {
            Ok(Self(letter))
        } else {
            Err(DescriptorError::InvalidRow { found: letter })
        }
    }

    /// The row letter
    pub fn letter(&self) -> char {
        self.0
    }

    /// Parse a string of row letters such as `"AB"`
    pub fn parse_set(text: &str) -> Result<Vec<Row>, DescriptorError> {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(Row::new)
            .collect()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Row {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Row::new(letter),
            (None, _) => Err(DescriptorError::EmptyToken { context: "row" }),
            (Some(_), Some(_)) => Err(DescriptorError::InvalidWell {
                found: s.to_string(),
            }),
        }
    }
}

/// Plate column number (`1`–`12`), rendered zero-padded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column(u8);

impl Column {
    pub fn new(number: u8) -> Result<Self, DescriptorError> {
        if (1..=PLATE_COLUMNS).contains(&number) {
            Ok(Self(number))
        } else {
            Err(DescriptorError::ColumnOutOfRange {
                column: number as u32,
            })
        }
    }

    /// The column number (1-based)
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Columns `01..=count` in plate order
    pub fn used(count: u8) -> impl Iterator<Item = Column> {
        (1..=count.min(PLATE_COLUMNS)).map(Column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for Column {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: u32 = s.trim().parse().map_err(|_| DescriptorError::InvalidColumn {
            found: s.to_string(),
        })?;
        if !(1..=PLATE_COLUMNS as u32).contains(&number) {
            return Err(DescriptorError::ColumnOutOfRange { column: number });
        }
        Ok(Self(number as u8))
    }
}

/// A single well, e.g. `A01`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Well {
    pub row: Row,
    pub column: Column,
}

impl Well {
    pub fn new(row: Row, column: Column) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

impl FromStr for Well {
    type Err = DescriptorError;

    /// Parses `A1`, `A01` or `A12`; the column part must be an integer ≤ 12
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(DescriptorError::EmptyToken {
            context: "well",
        })?;
        let row = Row::new(letter)?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return Err(DescriptorError::InvalidWell {
                found: s.to_string(),
            });
        }
        let column = rest.parse::<Column>()?;
        Ok(Self { row, column })
    }
}

/// Identifier of a curve in a [`PlateTable`](crate::data::PlateTable)
///
/// Ordering is rows first, then column, so `A01 < A02 < A10 < AB01 < B01`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SampleId {
    /// A raw well (one row) or a row-wise replicate average (several rows)
    Rows { rows: Vec<Row>, column: Column },
    /// A column-wise replicate average
    Wells(Vec<Well>),
    /// An averaged background curve
    Background(Box<SampleId>),
}

impl SampleId {
    /// Id of a single raw well
    pub fn well(well: Well) -> Self {
        Self::Rows {
            rows: vec![well.row],
            column: well.column,
        }
    }

    pub fn rows(rows: &[Row], column: Column) -> Self {
        Self::Rows {
            rows: rows.to_vec(),
            column,
        }
    }

    /// Background curve id for `inner`
    pub fn background(inner: SampleId) -> Self {
        Self::Background(Box::new(inner))
    }

    /// Column suffix of the id (last well for column-wise ids)
    pub fn column(&self) -> Column {
        match self {
            Self::Rows { column, .. } => *column,
            Self::Wells(wells) => wells
                .last()
                .map(|w| w.column)
                .unwrap_or(Column(1)),
            Self::Background(inner) => inner.column(),
        }
    }

    /// Distinct rows contributing to this curve
    pub fn member_rows(&self) -> BTreeSet<Row> {
        match self {
            Self::Rows { rows, .. } => rows.iter().copied().collect(),
            Self::Wells(wells) => wells.iter().map(|w| w.row).collect(),
            Self::Background(inner) => inner.member_rows(),
        }
    }

    /// Raw wells that were combined into this curve
    pub fn member_wells(&self) -> Vec<Well> {
        match self {
            Self::Rows { rows, column } => rows.iter().map(|&r| Well::new(r, *column)).collect(),
            Self::Wells(wells) => wells.clone(),
            Self::Background(inner) => inner.member_wells(),
        }
    }

    /// Rendered id without its two-digit column suffix
    ///
    /// This is the key results are grouped by: `AB` for `AB07`, `A01A02A` for
    /// `A01A02A03`.
    pub fn prefix(&self) -> String {
        match self {
            Self::Rows { rows, .. } => rows.iter().map(|r| r.letter()).collect(),
            Self::Wells(_) | Self::Background(_) => {
                let rendered = self.to_string();
                let stem = rendered
                    .strip_suffix(BACKGROUND_SUFFIX)
                    .unwrap_or(&rendered)
                    .to_string();
                stem[..stem.len().saturating_sub(2)].to_string()
            }
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self, Self::Background(_))
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows { rows, column } => {
                for row in rows {
                    write!(f, "{}", row)?;
                }
                write!(f, "{}", column)
            }
            Self::Wells(wells) => {
                for well in wells {
                    write!(f, "{}", well)?;
                }
                Ok(())
            }
            Self::Background(inner) => write!(f, "{}{}", inner, BACKGROUND_SUFFIX),
        }
    }
}

impl FromStr for SampleId {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix(BACKGROUND_SUFFIX) {
            return Ok(Self::background(inner.parse()?));
        }

        let invalid = || DescriptorError::InvalidSampleId {
            found: s.to_string(),
        };
        if !s.is_ascii() || s.len() < 3 {
            return Err(invalid());
        }

        // Column-wise replicate ids are two or more concatenated wells
        if s.len() >= 6 && s.len() % 3 == 0 {
            let wells: Result<Vec<Well>, _> = (0..s.len())
                .step_by(3)
                .map(|i| {
                    let chunk = &s[i..i + 3];
                    if chunk[1..].chars().all(|c| c.is_ascii_digit()) {
                        chunk.parse::<Well>()
                    } else {
                        Err(invalid())
                    }
                })
                .collect();
            if let Ok(wells) = wells {
                return Ok(Self::Wells(wells));
            }
        }

        let (letters, digits) = s.split_at(s.len() - 2);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let rows = Row::parse_set(letters)?;
        if rows.is_empty() {
            return Err(invalid());
        }
        Ok(Self::Rows {
            rows,
            column: digits.parse()?,
        })
    }
}

/// Serde through the rendered form, so identifiers read the same in JSON as
/// in table headers
macro_rules! serde_as_string {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let text = String::deserialize(deserializer)?;
                    text.parse().map_err(de::Error::custom)
                }
            }
        )*
    };
}

serde_as_string!(Row, Column, Well, SampleId);
