//! Row model and validity rule for the nutrition table
//!
//! On-disk layout, one header row followed by data rows:
//!
//! ```text
//! Name,Protein,Fat,Carbs,Calories,DateTime
//! Burger,20,5,500,500,2024-06-01 12:30:00.000000
//! ```
//!
//! A data row is valid iff its trimmed `Name` is non-empty and its `DateTime`
//! parses as a point in time. Nutrient cells are not part of the rule; they are
//! kept as text and parsed on demand by the aggregator.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Header field names, in on-disk order
pub const HEADER: [&str; 6] = ["Name", "Protein", "Fat", "Carbs", "Calories", "DateTime"];

/// Format used when writing timestamps. Sortable and locale-independent.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Accepted full date-time layouts. `%.f` also matches an absent fraction.
const DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// The four numeric values of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Nutrients {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub calories: f64,
}

impl Nutrients {
    pub fn new(protein: f64, fat: f64, carbs: f64, calories: f64) -> Self {
        Self {
            protein,
            fat,
            carbs,
            calories,
        }
    }

    /// Applies `f` to each field independently.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            protein: f(self.protein),
            fat: f(self.fat),
            carbs: f(self.carbs),
            calories: f(self.calories),
        }
    }
}

impl std::ops::Add for Nutrients {
    type Output = Nutrients;

    fn add(self, rhs: Nutrients) -> Nutrients {
        Nutrients {
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carbs: self.carbs + rhs.carbs,
            calories: self.calories + rhs.calories,
        }
    }
}

/// A valid row of the table.
///
/// Nutrient fields hold the persisted text unchanged, so a record can be
/// re-appended byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub name: String,
    pub protein: String,
    pub fat: String,
    pub carbs: String,
    pub calories: String,
    #[serde(rename = "DateTime", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(ts))
}

/// Classification of one data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Valid(Record),
    Corrupt,
}

impl RowOutcome {
    /// Applies the validity rule to a row's cells, looked up by field name.
    ///
    /// `field` returns the cell for a header name, or `None` when the column or
    /// cell is missing; missing cells read as the empty string.
    pub fn classify<'a>(field: impl Fn(&str) -> Option<&'a str>) -> Self {
        let cell = |name: &str| field(name).unwrap_or("");

        let name = cell("Name");
        if name.trim().is_empty() {
            return RowOutcome::Corrupt;
        }
        let timestamp = match parse_timestamp(cell("DateTime")) {
            Some(ts) => ts,
            None => return RowOutcome::Corrupt,
        };

        RowOutcome::Valid(Record {
            name: name.to_string(),
            protein: cell("Protein").to_string(),
            fat: cell("Fat").to_string(),
            carbs: cell("Carbs").to_string(),
            calories: cell("Calories").to_string(),
            timestamp,
        })
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, RowOutcome::Corrupt)
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            RowOutcome::Valid(record) => Some(record),
            RowOutcome::Corrupt => None,
        }
    }
}

/// Renders a timestamp in the on-disk format.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses an ISO-8601 style timestamp as written by this tool or by hand.
///
/// Offsets are accepted and dropped; the written wall-clock time is kept.
/// A bare date reads as midnight. Surrounding whitespace is not accepted.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() || s.trim() != s {
        return None;
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
