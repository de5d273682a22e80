//! Output rendering for the CLI
//!
//! Two formats:
//! - Text: fixed-width tables, one warning line per corrupted-row scan
//! - JSON: single object `{"status": "ok", "data": ...}` per command

use std::io::Write;

use serde_json::Value;

use super::errors::CliResult;
use crate::aggregate::Summary;
use crate::store::{Nutrients, Record};

const NAME_WIDTH: usize = 30;
const CELL_WIDTH: usize = 10;
const RULE_WIDTH: usize = 80;

/// Write a success response as one JSON line
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write an error response as one JSON line
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write a plain text line
pub fn write_line<W: Write>(out: &mut W, line: &str) -> CliResult<()> {
    writeln!(out, "{}", line)?;
    Ok(())
}

fn header_row<W: Write>(out: &mut W) -> CliResult<()> {
    writeln!(
        out,
        "{:<nw$} {:<cw$} {:<cw$} {:<cw$} {:<cw$}",
        "Name",
        "Protein",
        "Fat",
        "Carbs",
        "Calories",
        nw = NAME_WIDTH,
        cw = CELL_WIDTH
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    Ok(())
}

fn body_row<W: Write>(out: &mut W, name: &str, cells: [&str; 4]) -> CliResult<()> {
    writeln!(
        out,
        "{:<nw$} {:<cw$} {:<cw$} {:<cw$} {:<cw$}",
        name,
        format!("{}g", cells[0]),
        format!("{}g", cells[1]),
        format!("{}g", cells[2]),
        format!("{} kcal", cells[3]),
        nw = NAME_WIDTH,
        cw = CELL_WIDTH
    )?;
    Ok(())
}

/// Render records as a table, or `empty_message` when there are none
pub fn render_records<W: Write>(
    out: &mut W,
    title: &str,
    empty_message: &str,
    records: &[Record],
) -> CliResult<()> {
    if records.is_empty() {
        return write_line(out, empty_message);
    }

    write_line(out, title)?;
    header_row(out)?;
    for r in records {
        body_row(
            out,
            &r.name,
            [
                r.protein.as_str(),
                r.fat.as_str(),
                r.carbs.as_str(),
                r.calories.as_str(),
            ],
        )?;
    }
    Ok(())
}

/// Render a summary as a one-row table labelled `label`
pub fn render_summary<W: Write>(
    out: &mut W,
    title: &str,
    label: &str,
    empty_message: &str,
    summary: Option<&Summary>,
) -> CliResult<()> {
    let Some(summary) = summary else {
        return write_line(out, empty_message);
    };

    let Nutrients {
        protein,
        fat,
        carbs,
        calories,
    } = summary.values;
    let cells = [
        protein.to_string(),
        fat.to_string(),
        carbs.to_string(),
        calories.to_string(),
    ];

    write_line(out, title)?;
    header_row(out)?;
    body_row(
        out,
        label,
        [
            cells[0].as_str(),
            cells[1].as_str(),
            cells[2].as_str(),
            cells[3].as_str(),
        ],
    )
}

/// Warn about skipped rows. Prints nothing when `corrupt` is zero.
pub fn render_corruption_warning<W: Write>(out: &mut W, corrupt: usize) -> CliResult<()> {
    if corrupt == 0 {
        return Ok(());
    }
    write_line(
        out,
        &format!("Warning: {} corrupted row(s) were skipped.", corrupt),
    )
}
