//! nutrilog - a single-user nutrition log kept in a flat CSV file
//!
//! Entries (a name plus protein, fat, carbs and calories) are appended with a
//! timestamp. Reads are full scans that skip corrupt rows; summaries are the
//! same-day total and the trailing-window average.

pub mod aggregate;
pub mod cli;
pub mod observability;
pub mod store;
