//! CLI argument definitions using clap
//!
//! Commands:
//! - nutrilog init [--force]
//! - nutrilog add <name> --protein <g> --fat <g> --carbs <g> --calories <kcal>
//! - nutrilog reuse <name>
//! - nutrilog list
//! - nutrilog today [--date <YYYY-MM-DD>]
//! - nutrilog week [--days <n>]
//! - nutrilog check

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nutrilog - log what you eat to a flat CSV file
#[derive(Parser, Debug)]
#[command(name = "nutrilog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./nutrilog.json")]
    pub config: PathBuf,

    /// Store file; overrides the config file and NUTRILOG_STORE
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the store file if it is missing
    Init {
        /// Recreate the store with only the header row, discarding all entries
        #[arg(long)]
        force: bool,
    },

    /// Log a new entry
    Add {
        /// Entry name
        name: String,

        /// Protein in grams
        #[arg(long, allow_negative_numbers = true)]
        protein: f64,

        /// Fat in grams
        #[arg(long, allow_negative_numbers = true)]
        fat: f64,

        /// Carbs in grams
        #[arg(long, allow_negative_numbers = true)]
        carbs: f64,

        /// Energy in kcal
        #[arg(long, allow_negative_numbers = true)]
        calories: f64,
    },

    /// Log an existing entry again, stamped with the current time
    Reuse {
        /// Exact name of a previously logged entry
        name: String,
    },

    /// List all entries
    List,

    /// Show the total intake for one day
    Today {
        /// Day to total instead of today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the average intake per entry over a trailing window
    Week {
        /// Window length in days; defaults to the configured window
        #[arg(long)]
        days: Option<i64>,
    },

    /// Count corrupted rows in the store
    Check,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
