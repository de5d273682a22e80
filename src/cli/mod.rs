//! CLI module for nutrilog
//!
//! Provides command-line interface for:
//! - init: Create (or recreate) the store file
//! - add / reuse: Log entries
//! - list / today / week: Read entries and summaries
//! - check: Count corrupted rows

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    add, check, init, list, reuse, run, run_command, today, validate_amount, validate_name, week,
    Config, MAX_NAME_LENGTH, MAX_NUMERIC_VALUE, STORE_ENV_VAR,
};
pub use errors::{CliError, CliErrorCode, CliResult, ValidationError};
