//! Observability for nutrilog
//!
//! Structured JSON log lines on stderr, one per event, filtered by a
//! process-wide minimum severity.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never fails an operation
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use nutrilog::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Info);
//! log_event_with_fields(Event::RecordAppended, &[("name", "Burger")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
