//! Sequential table reader
//!
//! Every scan opens the table afresh and reads it front to back. Rows are
//! classified one at a time; corrupt rows are reported as `RowOutcome::Corrupt`
//! rather than as errors so a hand-edited file degrades instead of failing.

use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::record::RowOutcome;

/// Forward-only reader over the data rows of one table.
pub struct StoreReader {
    path: PathBuf,
    reader: csv::Reader<File>,
    /// Header name -> column position
    columns: HashMap<String, usize>,
    record: csv::StringRecord,
    rows_read: usize,
}

impl StoreReader {
    /// Opens the table and reads its header row.
    ///
    /// A missing file yields `NUTRI_STORE_NOT_FOUND`. An empty file is a table
    /// with no columns and no rows.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::not_found(path)
            } else {
                StoreError::read_failed(
                    format!("Failed to open store file: {}", path.display()),
                    e,
                )
            }
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let columns = match reader.headers() {
            Ok(headers) => Self::column_index(headers),
            // A header that is not UTF-8 names no usable columns
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => HashMap::new(),
            Err(e) => return Err(Self::codec_error(path, e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            columns,
            record: csv::StringRecord::new(),
            rows_read: 0,
        })
    }

    /// Maps header names to positions. The first occurrence of a duplicate wins.
    fn column_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
        let mut columns = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            columns.entry(name.to_string()).or_insert(i);
        }
        columns
    }

    fn codec_error(path: &Path, e: csv::Error) -> StoreError {
        let details = format!("path: {}", path.display());
        match e.into_kind() {
            csv::ErrorKind::Io(io) => {
                StoreError::read_failed("Failed to read store file", io).with_details(details)
            }
            other => StoreError::read_failed_no_source(format!("Malformed store file: {:?}", other))
                .with_details(details),
        }
    }

    /// Returns the table path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows consumed so far, corrupt ones included.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Reads and classifies the next data row.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(outcome))` for each data row
    /// - `Ok(None)` at end of file
    /// - `Err(NUTRI_STORE_READ_FAILED)` if the underlying read fails
    pub fn read_next(&mut self) -> StoreResult<Option<RowOutcome>> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.rows_read += 1;
                let columns = &self.columns;
                let record = &self.record;
                Ok(Some(RowOutcome::classify(|name| {
                    columns.get(name).and_then(|&i| record.get(i))
                })))
            }
            Ok(false) => Ok(None),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                self.rows_read += 1;
                Ok(Some(RowOutcome::Corrupt))
            }
            Err(e) => Err(Self::codec_error(&self.path, e)),
        }
    }

    /// Reads every remaining row.
    pub fn read_all(&mut self) -> StoreResult<Vec<RowOutcome>> {
        let mut rows = Vec::new();
        while let Some(row) = self.read_next()? {
            rows.push(row);
        }
        Ok(rows)
    }
}
