//! Store error types
//!
//! Error codes:
//! - NUTRI_STORE_NOT_FOUND - backing table is absent, recoverable by `initialize`
//! - NUTRI_STORE_IO_ERROR
//! - NUTRI_STORE_WRITE_FAILED
//! - NUTRI_STORE_READ_FAILED
//!
//! Corrupt rows are never errors. They are skipped by every scan and only
//! surface through `RecordStore::scan_for_corruption`.

use std::fmt;
use std::io;
use std::path::Path;

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// The backing table does not exist
    NotFound,
    /// Generic filesystem failure (directories, metadata)
    IoError,
    /// Row or header write failed
    WriteFailed,
    /// Table could not be read
    ReadFailed,
}

impl StoreErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::NotFound => "NUTRI_STORE_NOT_FOUND",
            StoreErrorCode::IoError => "NUTRI_STORE_IO_ERROR",
            StoreErrorCode::WriteFailed => "NUTRI_STORE_WRITE_FAILED",
            StoreErrorCode::ReadFailed => "NUTRI_STORE_READ_FAILED",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message and optional context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StoreError {
    /// The backing table is missing at `path`
    pub fn not_found(path: &Path) -> Self {
        Self {
            code: StoreErrorCode::NotFound,
            message: "Store file not found".to_string(),
            details: Some(format!("path: {}", path.display())),
            source: None,
        }
    }

    /// Create a new filesystem error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::IoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::WriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::ReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Read failure reported by the table codec rather than the OS
    pub fn read_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::ReadFailed,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach context such as the table path or a row position
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Whether the store was missing. Callers recover by calling
    /// `RecordStore::initialize` and retrying once.
    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::NotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
