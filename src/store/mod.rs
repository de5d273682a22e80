//! Record store for nutrition entries
//!
//! The store holds every logged entry in a single flat CSV table with a fixed
//! header row. It is append-only: entries are never updated or deleted, and
//! re-logging an entry appends a fresh row.
//!
//! # Design Principles
//!
//! - Explicit location, no process-wide path
//! - One open per operation, no cached state
//! - Field access by header name, missing cells read as empty
//! - Corrupt rows (blank name, unparseable timestamp) are skipped, never fatal
//! - A missing table is a distinct, catchable error; the store never repairs
//!   itself behind the caller's back

mod errors;
mod reader;
mod record;
mod record_store;
mod writer;

pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use reader::StoreReader;
pub use record::{
    format_timestamp, parse_timestamp, Nutrients, Record, RowOutcome, HEADER, TIMESTAMP_FORMAT,
};
pub use record_store::{EnsureOutcome, RecordStore, DEFAULT_WINDOW_DAYS};
