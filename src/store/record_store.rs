//! File-backed record store
//!
//! Owns the location of the table and exposes append, full scan, the three
//! filtered scans and the corruption count. No handle is held between calls:
//! each operation opens the file, does one pass, and closes it.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use super::errors::StoreResult;
use super::reader::StoreReader;
use super::record::{format_timestamp, Nutrients, Record, RowOutcome};
use super::writer;
use crate::observability::{log_event_with_fields, Event};

/// Default trailing window for `scan_last_days`
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Result of `RecordStore::ensure_exists`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The table was already there and readable
    Present,
    /// The table was absent and has been created with only the header row
    Created,
}

/// Append-only nutrition table at an explicit path.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the table path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Makes sure the table exists and can be opened for reading.
    ///
    /// Idempotent. An absent table is created holding only the header row.
    /// Any failure other than "not found" is returned unchanged.
    pub fn ensure_exists(&self) -> StoreResult<EnsureOutcome> {
        match StoreReader::open(&self.path) {
            Ok(_) => Ok(EnsureOutcome::Present),
            Err(e) if e.is_not_found() => {
                writer::write_header_only(&self.path)?;
                let path = self.path_str();
                log_event_with_fields(Event::StoreCreated, &[("path", path.as_str())]);
                Ok(EnsureOutcome::Created)
            }
            Err(e) => Err(e),
        }
    }

    /// (Re)creates the table with only the header row. Destroys prior content.
    pub fn initialize(&self) -> StoreResult<()> {
        writer::write_header_only(&self.path)?;
        let path = self.path_str();
        log_event_with_fields(Event::StoreInitialized, &[("path", path.as_str())]);
        Ok(())
    }

    /// Appends one entry stamped with `timestamp`.
    ///
    /// Does not repair a missing table: a `NUTRI_STORE_NOT_FOUND` error is
    /// returned and the caller decides whether to `initialize` and retry.
    pub fn append(
        &self,
        name: &str,
        nutrients: &Nutrients,
        timestamp: NaiveDateTime,
    ) -> StoreResult<()> {
        let cells = [
            nutrients.protein.to_string(),
            nutrients.fat.to_string(),
            nutrients.carbs.to_string(),
            nutrients.calories.to_string(),
        ];
        self.append_cells(
            name,
            [
                cells[0].as_str(),
                cells[1].as_str(),
                cells[2].as_str(),
                cells[3].as_str(),
            ],
            timestamp,
        )
    }

    /// Appends a copy of `record` under a new timestamp.
    ///
    /// Nutrient cells are copied verbatim, without a numeric round trip.
    pub fn reappend(&self, record: &Record, timestamp: NaiveDateTime) -> StoreResult<()> {
        self.append_cells(
            &record.name,
            [
                record.protein.as_str(),
                record.fat.as_str(),
                record.carbs.as_str(),
                record.calories.as_str(),
            ],
            timestamp,
        )
    }

    /// Re-logs the first entry named `name` at `timestamp`.
    ///
    /// Returns the copied record, or `None` if no valid entry has that name,
    /// in which case nothing is written.
    pub fn reuse(&self, name: &str, timestamp: NaiveDateTime) -> StoreResult<Option<Record>> {
        let Some(found) = self.find_first_by_name(name)? else {
            return Ok(None);
        };
        self.reappend(&found, timestamp)?;
        log_event_with_fields(Event::RecordReused, &[("name", name)]);
        Ok(Some(Record {
            timestamp,
            ..found
        }))
    }

    fn append_cells(
        &self,
        name: &str,
        nutrients: [&str; 4],
        timestamp: NaiveDateTime,
    ) -> StoreResult<()> {
        let ts = format_timestamp(&timestamp);
        let row = [
            name,
            nutrients[0],
            nutrients[1],
            nutrients[2],
            nutrients[3],
            ts.as_str(),
        ];
        writer::append_row(&self.path, row).map_err(|e| {
            if e.is_not_found() {
                let path = self.path_str();
                log_event_with_fields(Event::StoreMissing, &[("path", path.as_str())]);
            }
            e
        })?;
        log_event_with_fields(
            Event::RecordAppended,
            &[("name", name), ("timestamp", ts.as_str())],
        );
        Ok(())
    }

    /// All valid records in file order.
    pub fn scan_all(&self) -> StoreResult<Vec<Record>> {
        self.scan("all", |_| true)
    }

    /// Valid records whose calendar date equals `date`.
    pub fn scan_by_date(&self, date: NaiveDate) -> StoreResult<Vec<Record>> {
        self.scan("by_date", |r| r.timestamp.date() == date)
    }

    /// Valid records logged on the current local date.
    pub fn scan_today(&self) -> StoreResult<Vec<Record>> {
        self.scan_by_date(Local::now().date_naive())
    }

    /// Valid records with `timestamp >= window_start`.
    pub fn scan_within_window(&self, window_start: NaiveDateTime) -> StoreResult<Vec<Record>> {
        self.scan("within_window", |r| r.timestamp >= window_start)
    }

    /// Valid records from the last `days` days, measured from now.
    pub fn scan_last_days(&self, days: i64) -> StoreResult<Vec<Record>> {
        let now = Local::now().naive_local();
        self.scan_within_window(now - Duration::days(days))
    }

    /// The earliest valid record whose name is exactly `name`.
    ///
    /// Case-sensitive, untrimmed. Stops reading at the first match.
    pub fn find_first_by_name(&self, name: &str) -> StoreResult<Option<Record>> {
        let mut reader = StoreReader::open(&self.path)?;
        while let Some(row) = reader.read_next()? {
            if let RowOutcome::Valid(record) = row {
                if record.name == name {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Number of data rows failing the validity rule. Always reads the whole
    /// table and never modifies it.
    pub fn scan_for_corruption(&self) -> StoreResult<usize> {
        let mut reader = StoreReader::open(&self.path)?;
        let mut corrupt = 0;
        while let Some(row) = reader.read_next()? {
            if row.is_corrupt() {
                corrupt += 1;
            }
        }
        if corrupt > 0 {
            let count = corrupt.to_string();
            let path = self.path_str();
            log_event_with_fields(
                Event::CorruptRowsDetected,
                &[("count", count.as_str()), ("path", path.as_str())],
            );
        }
        Ok(corrupt)
    }

    fn scan(&self, kind: &str, keep: impl Fn(&Record) -> bool) -> StoreResult<Vec<Record>> {
        let mut reader = StoreReader::open(&self.path)?;
        let mut records = Vec::new();
        while let Some(row) = reader.read_next()? {
            if let Some(record) = row.into_record() {
                if keep(&record) {
                    records.push(record);
                }
            }
        }
        let matched = records.len().to_string();
        let rows = reader.rows_read().to_string();
        log_event_with_fields(
            Event::ScanComplete,
            &[("kind", kind), ("matched", matched.as_str()), ("rows", rows.as_str())],
        );
        Ok(records)
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}
