//! Table writer
//!
//! The table is append-only: rows are added at the end, existing rows are never
//! rewritten. The only destructive operation is `write_header_only`, which the
//! store uses to (re)create an empty table.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::errors::{StoreError, StoreResult};
use super::record::HEADER;

/// One row of cells ready to be written, in header order.
pub type Row<'a> = [&'a str; 6];

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

/// Creates the parent directory if needed and writes a table holding only the
/// header row, discarding any previous content.
pub fn write_header_only(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::io_error(
                    format!("Failed to create store directory: {}", parent.display()),
                    e,
                )
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        StoreError::write_failed(format!("Failed to create store file: {}", path.display()), e)
    })?;

    write_rows(path, file, &[HEADER])
}

/// Appends one row to an existing table.
///
/// The file is opened without `create`, so a table removed out from under the
/// caller surfaces as `NUTRI_STORE_NOT_FOUND` instead of being silently
/// recreated. A table truncated to zero bytes gets its header row back before
/// the new row.
pub fn append_row(path: &Path, row: Row<'_>) -> StoreResult<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::not_found(path)
            } else {
                StoreError::write_failed(
                    format!("Failed to open store file: {}", path.display()),
                    e,
                )
            }
        })?;

    let tail = Tail::of(&mut file)
        .map_err(|e| StoreError::read_failed("Failed to inspect store file tail", e))?;

    match tail {
        Tail::Empty => write_rows(path, file, &[HEADER, row]),
        Tail::Terminated => write_rows(path, file, &[row]),
        // A hand edit may leave the last line unterminated
        Tail::Unterminated => {
            file.write_all(b"\n")
                .map_err(|e| StoreError::write_failed("Failed to terminate last row", e))?;
            write_rows(path, file, &[row])
        }
    }
}

/// State of the last byte of the table.
enum Tail {
    Empty,
    Terminated,
    Unterminated,
}

impl Tail {
    fn of(file: &mut File) -> std::io::Result<Tail> {
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(Tail::Empty);
        }
        file.seek(SeekFrom::Start(len - 1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(if last[0] == b'\n' {
            Tail::Terminated
        } else {
            Tail::Unterminated
        })
    }
}

fn write_rows(path: &Path, file: File, rows: &[Row<'_>]) -> StoreResult<()> {
    let mut writer = csv_writer(file);
    for row in rows {
        writer.write_record(row).map_err(|e| {
            StoreError::write_failed(
                format!("Failed to write row: {}", e),
                std::io::Error::new(ErrorKind::Other, e.to_string()),
            )
        })?;
    }

    let file = writer.into_inner().map_err(|e| {
        StoreError::write_failed(
            format!("Failed to flush store file: {}", path.display()),
            std::io::Error::new(e.error().kind(), e.error().to_string()),
        )
    })?;

    // fsync - an acknowledged row must survive a crash
    file.sync_all().map_err(|e| {
        StoreError::write_failed(format!("fsync failed for store file: {}", path.display()), e)
    })
}
