//! nutrilog CLI entry point
//!
//! Runs one command through `cli::run`; on failure prints the error to stderr
//! and exits with status 1.

use nutrilog::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
