//! CLI-specific error types

use std::fmt;
use std::io;

use thiserror::Error;

use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, config file)
    IoError,
    /// Input rejected before reaching the store
    InvalidInput,
    /// Store operation failed
    StoreFailed,
    /// Named entry does not exist
    EntryNotFound,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "NUTRI_CLI_CONFIG_ERROR",
            Self::IoError => "NUTRI_CLI_IO_ERROR",
            Self::InvalidInput => "NUTRI_CLI_INVALID_INPUT",
            Self::StoreFailed => "NUTRI_CLI_STORE_FAILED",
            Self::EntryNotFound => "NUTRI_CLI_ENTRY_NOT_FOUND",
        }
    }
}

/// Input rejected by the guards in front of the store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("name cannot be a number")]
    NumericName,

    #[error("name cannot be longer than {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} cannot be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} cannot exceed {max} (got {value})")]
    TooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("window must be between 1 and {max} days (got {days})")]
    WindowOutOfRange { days: i64, max: i64 },
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// No entry with this name
    pub fn entry_not_found(name: &str) -> Self {
        Self::new(
            CliErrorCode::EntryNotFound,
            format!("No entry named '{}' in the nutrition log", name),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreFailed, e.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        Self::new(CliErrorCode::InvalidInput, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
