//! Observable events
//!
//! Every store operation that touches the table reports one of these. Events
//! are explicit and typed; each carries a fixed severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in nutrilog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Table lifecycle
    /// Table was absent and has been created
    StoreCreated,
    /// Table (re)written with only the header row
    StoreInitialized,
    /// An operation found the table missing
    StoreMissing,
    /// Table recreated after going missing mid-operation
    StoreRepaired,

    // Writes
    /// New row appended
    RecordAppended,
    /// Existing entry re-logged under a new timestamp
    RecordReused,

    // Reads
    /// A scan finished
    ScanComplete,
    /// Corrupt rows were counted
    CorruptRowsDetected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::StoreCreated => "STORE_CREATED",
            Event::StoreInitialized => "STORE_INITIALIZED",
            Event::StoreMissing => "STORE_MISSING",
            Event::StoreRepaired => "STORE_REPAIRED",

            Event::RecordAppended => "RECORD_APPENDED",
            Event::RecordReused => "RECORD_REUSED",

            Event::ScanComplete => "SCAN_COMPLETE",
            Event::CorruptRowsDetected => "CORRUPT_ROWS_DETECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ScanComplete => Severity::Trace,
            Event::StoreMissing | Event::StoreRepaired | Event::CorruptRowsDetected => {
                Severity::Warn
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::StoreCreated,
            Event::StoreInitialized,
            Event::StoreMissing,
            Event::StoreRepaired,
            Event::RecordAppended,
            Event::RecordReused,
            Event::ScanComplete,
            Event::CorruptRowsDetected,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severities() {
        assert_eq!(Event::CorruptRowsDetected.severity(), Severity::Warn);
        assert_eq!(Event::StoreMissing.severity(), Severity::Warn);
        assert_eq!(Event::ScanComplete.severity(), Severity::Trace);
        assert_eq!(Event::RecordAppended.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::StoreCreated), "STORE_CREATED");
    }
}
