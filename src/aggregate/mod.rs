//! Summaries over fetched records
//!
//! Pure computation, no I/O. Both summaries share one reduction: every record's
//! nutrient cells are parsed with `parse_or_zero` and summed. `average` then
//! divides the raw sums by the record count; each field is rounded to two
//! decimals only at the very end.
//!
//! Rounding is half away from zero (`f64::round`), so `0.125 -> 0.13` and
//! `-0.125 -> -0.13`, subject to the binary representation of the input.

use serde::Serialize;

use crate::store::{Nutrients, Record};

/// What a `Summary` holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryKind {
    /// Field-wise sum
    Total,
    /// Field-wise sum divided by the record count
    Average,
}

/// Single-row reduction of a record list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub kind: SummaryKind,
    /// Number of records reduced
    pub count: usize,
    pub values: Nutrients,
}

/// Parses a nutrient cell. Anything that is not a finite number counts as 0.
pub fn parse_or_zero(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Numeric view of a record's nutrient cells.
pub fn nutrients_of(record: &Record) -> Nutrients {
    Nutrients::new(
        parse_or_zero(&record.protein),
        parse_or_zero(&record.fat),
        parse_or_zero(&record.carbs),
        parse_or_zero(&record.calories),
    )
}

/// Unrounded field-wise sum, or `None` for an empty list.
fn reduce(records: &[Record]) -> Option<Nutrients> {
    if records.is_empty() {
        return None;
    }
    Some(
        records
            .iter()
            .map(nutrients_of)
            .fold(Nutrients::default(), |acc, n| acc + n),
    )
}

/// Sums the four nutrient fields. `None` when there are no records.
pub fn summarize(records: &[Record]) -> Option<Summary> {
    let sums = reduce(records)?;
    Some(Summary {
        kind: SummaryKind::Total,
        count: records.len(),
        values: sums.map(round2),
    })
}

/// Per-record average of the four nutrient fields. `None` when there are no
/// records, so the division never sees a zero count.
pub fn average(records: &[Record]) -> Option<Summary> {
    let sums = reduce(records)?;
    let count = records.len() as f64;
    Some(Summary {
        kind: SummaryKind::Average,
        count: records.len(),
        values: sums.map(|v| round2(v / count)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::parse_timestamp;

    fn record(name: &str, cells: [&str; 4]) -> Record {
        Record {
            name: name.to_string(),
            protein: cells[0].to_string(),
            fat: cells[1].to_string(),
            carbs: cells[2].to_string(),
            calories: cells[3].to_string(),
            timestamp: parse_timestamp("2024-06-01 12:00:00").unwrap(),
        }
    }

    #[test]
    fn test_parse_or_zero() {
        assert_eq!(parse_or_zero("12.5"), 12.5);
        assert_eq!(parse_or_zero(" 7 "), 7.0);
        assert_eq!(parse_or_zero(""), 0.0);
        assert_eq!(parse_or_zero("abc"), 0.0);
        assert_eq!(parse_or_zero("NaN"), 0.0);
        assert_eq!(parse_or_zero("inf"), 0.0);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(0.5), 0.5);
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(20.0 / 3.0), 6.67);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_empty_input_has_no_summary() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn test_summarize_sums_each_field() {
        let records = vec![
            record("A", ["20", "5", "30", "500"]),
            record("B", ["30", "1.25", "10", "600"]),
        ];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.kind, SummaryKind::Total);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.values, Nutrients::new(50.0, 6.25, 40.0, 1100.0));
    }

    #[test]
    fn test_unparseable_cells_count_as_zero() {
        let records = vec![
            record("A", ["x", "5", "", "100"]),
            record("B", ["10", "n/a", "3", "100"]),
        ];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.values, Nutrients::new(10.0, 5.0, 3.0, 200.0));
        // The bad cells still count towards the divisor
        assert_eq!(average(&records).unwrap().values.protein, 5.0);
    }

    #[test]
    fn test_single_record_sum_equals_average() {
        let records = vec![record("Solo", ["12.345", "1", "2", "3"])];
        assert_eq!(
            summarize(&records).unwrap().values,
            average(&records).unwrap().values
        );
    }

    #[test]
    fn test_average_rounds_each_field_after_dividing() {
        let records = vec![
            record("A", ["0.004", "1", "1", "3.333"]),
            record("B", ["0.004", "1", "1", "3.333"]),
            record("C", ["0.004", "1", "2", "3.334"]),
        ];
        let summary = summarize(&records).unwrap();
        let avg = average(&records).unwrap();

        assert_eq!(summary.values, Nutrients::new(0.01, 3.0, 4.0, 10.0));
        assert_eq!(avg.kind, SummaryKind::Average);
        assert_eq!(avg.count, 3);
        assert_eq!(avg.values, Nutrients::new(0.0, 1.0, 1.33, 3.33));
    }
}
