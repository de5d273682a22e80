//! CLI command implementations
//!
//! Every command resolves the configuration, makes sure the store exists, runs
//! one store operation and renders the result. Commands write to any `Write`
//! so they can be driven from tests; `run` wires them to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::aggregate::{average, summarize};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::store::{EnsureOutcome, Nutrients, RecordStore, StoreResult, DEFAULT_WINDOW_DAYS};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult, ValidationError};
use super::io::{
    render_corruption_warning, render_records, render_summary, write_error, write_line,
    write_response,
};

/// Environment variable overriding `store_path`
pub const STORE_ENV_VAR: &str = "NUTRILOG_STORE";

/// Longest accepted entry name, in characters
pub const MAX_NAME_LENGTH: usize = 30;

/// Upper bound for every nutrient value
pub const MAX_NUMERIC_VALUE: f64 = 10_000.0;

/// Longest accepted statistics window
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Location of the CSV table (optional, default "data/data.csv")
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Trailing window for `week`, in days (optional, default 7)
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data").join("data.csv")
}
fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            window_days: default_window_days(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file. A missing file means all defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let config = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(CliError::config_error(format!(
                    "Failed to read config: {}",
                    e
                )))
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// Applies overrides in increasing precedence: environment, then flag.
    pub fn with_overrides(mut self, env_store: Option<String>, flag_store: Option<PathBuf>) -> Self {
        if let Some(env) = env_store.filter(|s| !s.is_empty()) {
            self.store_path = PathBuf::from(env);
        }
        if let Some(flag) = flag_store {
            self.store_path = flag;
        }
        self
    }

    fn validate(&self) -> CliResult<()> {
        self.severity()?;

        validate_window(self.window_days)
            .map_err(|e| CliError::config_error(format!("Invalid window_days: {}", e)))?;

        if self.store_path.as_os_str().is_empty() {
            return Err(CliError::config_error("store_path must not be empty"));
        }

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// The store this configuration points at
    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.store_path)
    }
}

/// Checks an entry name the way the console prompt does.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NumericName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Checks one nutrient value: finite, 0..=MAX_NUMERIC_VALUE.
pub fn validate_amount(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    if value > MAX_NUMERIC_VALUE {
        return Err(ValidationError::TooLarge {
            field,
            value,
            max: MAX_NUMERIC_VALUE,
        });
    }
    Ok(value)
}

fn validate_window(days: i64) -> Result<i64, ValidationError> {
    if (1..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ValidationError::WindowOutOfRange {
            days,
            max: MAX_WINDOW_DAYS,
        })
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let config = Config::load(&cli.config)?
        .with_overrides(std::env::var(STORE_ENV_VAR).ok(), cli.store.clone());
    Logger::set_min_severity(config.severity()?);
    let store_path = config.store_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("store_path", store_path.as_str())]);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run_command(&config, cli.command, cli.json, &mut out);
    if let (Err(e), true) = (&result, cli.json) {
        write_error(&mut out, e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command against the configured store
pub fn run_command<W: Write>(
    config: &Config,
    cmd: Command,
    json: bool,
    out: &mut W,
) -> CliResult<()> {
    let store = config.store();

    // Like the console loop: every operation starts from an existing table
    if !matches!(cmd, Command::Init { .. }) {
        store.ensure_exists()?;
    }

    match cmd {
        Command::Init { force } => init(&store, force, json, out),
        Command::Add {
            name,
            protein,
            fat,
            carbs,
            calories,
        } => {
            validate_name(&name)?;
            let nutrients = Nutrients::new(
                validate_amount("protein", protein)?,
                validate_amount("fat", fat)?,
                validate_amount("carbs", carbs)?,
                validate_amount("calories", calories)?,
            );
            add(&store, &name, &nutrients, json, out)
        }
        Command::Reuse { name } => reuse(&store, &name, json, out),
        Command::List => list(&store, json, out),
        Command::Today { date } => today(&store, date, json, out),
        Command::Week { days } => {
            let days = validate_window(days.unwrap_or(config.window_days))?;
            week(&store, days, json, out)
        }
        Command::Check => check(&store, json, out),
    }
}

/// Runs a write once; if the table vanished in between, recreates it and
/// tries exactly one more time.
fn with_one_repair<T>(store: &RecordStore, op: impl Fn() -> StoreResult<T>) -> StoreResult<T> {
    match op() {
        Err(e) if e.is_not_found() => {
            let path = store.path().display().to_string();
            log_event_with_fields(Event::StoreRepaired, &[("path", path.as_str())]);
            store.initialize()?;
            op()
        }
        other => other,
    }
}

/// Create the store, or recreate it empty with `force`
pub fn init<W: Write>(store: &RecordStore, force: bool, json: bool, out: &mut W) -> CliResult<()> {
    let state = if force {
        store.initialize()?;
        "reinitialized"
    } else {
        match store.ensure_exists()? {
            EnsureOutcome::Created => "created",
            EnsureOutcome::Present => "present",
        }
    };

    if json {
        write_response(
            out,
            json!({"store": store.path().display().to_string(), "state": state}),
        )
    } else {
        write_line(out, &format!("Store {}: {}", state, store.path().display()))
    }
}

/// Append a new entry stamped with the current local time
pub fn add<W: Write>(
    store: &RecordStore,
    name: &str,
    nutrients: &Nutrients,
    json: bool,
    out: &mut W,
) -> CliResult<()> {
    let now = Local::now().naive_local();
    with_one_repair(store, || store.append(name, nutrients, now))?;

    if json {
        write_response(out, json!({"added": name}))
    } else {
        write_line(out, "Nutrition Data Added Successfully!")
    }
}

/// Re-log the first entry with this exact name
pub fn reuse<W: Write>(store: &RecordStore, name: &str, json: bool, out: &mut W) -> CliResult<()> {
    let now = Local::now().naive_local();
    let copied = with_one_repair(store, || store.reuse(name, now))?
        .ok_or_else(|| CliError::entry_not_found(name))?;

    if json {
        write_response(out, json!({"reused": copied}))
    } else {
        write_line(out, "Nutrition Data Added Successfully!")
    }
}

/// List every valid entry
pub fn list<W: Write>(store: &RecordStore, json: bool, out: &mut W) -> CliResult<()> {
    let records = store.scan_all()?;
    let corrupt = store.scan_for_corruption()?;

    if json {
        return write_response(out, json!({"entries": records, "corrupt_rows": corrupt}));
    }
    render_records(out, "Nutrition Entries:", "No Entries Found.", &records)?;
    render_corruption_warning(out, corrupt)
}

/// Total intake for one calendar day (default today)
pub fn today<W: Write>(
    store: &RecordStore,
    date: Option<NaiveDate>,
    json: bool,
    out: &mut W,
) -> CliResult<()> {
    let now = Local::now().date_naive();
    let date = date.unwrap_or(now);
    let empty_message = if date == now {
        "No Entries Found for Today".to_string()
    } else {
        format!("No Entries Found for {}", date)
    };
    let records = store.scan_by_date(date)?;
    let totals = summarize(&records);
    let corrupt = store.scan_for_corruption()?;

    if json {
        return write_response(
            out,
            json!({"date": date.to_string(), "summary": totals, "corrupt_rows": corrupt}),
        );
    }
    render_summary(
        out,
        "Daily Total Intake",
        "Daily Total",
        &empty_message,
        totals.as_ref(),
    )?;
    render_corruption_warning(out, corrupt)
}

/// Average intake per entry over the trailing `days`
pub fn week<W: Write>(store: &RecordStore, days: i64, json: bool, out: &mut W) -> CliResult<()> {
    let window_start = Local::now().naive_local() - Duration::days(days);
    let records = store.scan_within_window(window_start)?;
    let averages = average(&records);
    let corrupt = store.scan_for_corruption()?;

    if json {
        return write_response(
            out,
            json!({"days": days, "summary": averages, "corrupt_rows": corrupt}),
        );
    }
    render_summary(
        out,
        "Weekly Average Intake",
        "Weekly Average",
        "No Entries Found for this Week",
        averages.as_ref(),
    )?;
    render_corruption_warning(out, corrupt)
}

/// Count corrupted rows
pub fn check<W: Write>(store: &RecordStore, json: bool, out: &mut W) -> CliResult<()> {
    let corrupt = store.scan_for_corruption()?;

    if json {
        return write_response(out, json!({"corrupt_rows": corrupt}));
    }
    if corrupt == 0 {
        write_line(out, "No corrupted rows found.")
    } else {
        render_corruption_warning(out, corrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn config_in(temp_dir: &TempDir) -> Config {
        Config::default().with_overrides(None, Some(temp_dir.path().join("log.csv")))
    }

    fn run_to_string(config: &Config, cmd: Command, json: bool) -> CliResult<String> {
        let mut buf = Vec::new();
        run_command(config, cmd, json, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    fn add_cmd(name: &str, protein: f64, calories: f64) -> Command {
        Command::Add {
            name: name.to_string(),
            protein,
            fat: 1.0,
            carbs: 2.0,
            calories,
        }
    }

    #[test]
    fn test_config_defaults_when_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(&temp_dir.path().join("nutrilog.json")).unwrap();
        assert_eq!(config.store_path, PathBuf::from("data").join("data.csv"));
        assert_eq!(config.window_days, 7);
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nutrilog.json");
        fs::write(&config_path, json!({"window_days": 14}).to_string()).unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.window_days, 14);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nutrilog.json");

        for bad in [
            json!({"window_days": 0}),
            json!({"log_level": "loud"}),
            json!({"store_path": ""}),
        ] {
            fs::write(&config_path, bad.to_string()).unwrap();
            let err = Config::load(&config_path).unwrap_err();
            assert_eq!(err.code(), &CliErrorCode::ConfigError);
        }

        fs::write(&config_path, "{ not json").unwrap();
        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_override_precedence() {
        let base = Config::default();
        let from_env = base.clone().with_overrides(Some("env.csv".to_string()), None);
        assert_eq!(from_env.store_path, PathBuf::from("env.csv"));

        let from_flag = base
            .clone()
            .with_overrides(Some("env.csv".to_string()), Some(PathBuf::from("flag.csv")));
        assert_eq!(from_flag.store_path, PathBuf::from("flag.csv"));

        let empty_env = base.with_overrides(Some(String::new()), None);
        assert_eq!(empty_env.store_path, default_store_path());
    }

    #[test]
    fn test_validate_name_rules() {
        assert!(validate_name("Burger").is_ok());
        assert!(validate_name("7up").is_ok());
        assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert_eq!(validate_name("12345"), Err(ValidationError::NumericName));
        assert_eq!(
            validate_name(&"x".repeat(31)),
            Err(ValidationError::NameTooLong { len: 31, max: 30 })
        );
        assert!(validate_name(&"é".repeat(30)).is_ok());
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert_eq!(validate_amount("fat", 0.0), Ok(0.0));
        assert_eq!(validate_amount("fat", 10_000.0), Ok(10_000.0));
        assert!(validate_amount("fat", -0.1).is_err());
        assert!(validate_amount("fat", 10_000.1).is_err());
        assert!(validate_amount("fat", f64::NAN).is_err());
    }

    #[test]
    fn test_init_reports_state() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let first = run_to_string(&config, Command::Init { force: false }, true).unwrap();
        let parsed: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed["data"]["state"], "created");

        let second = run_to_string(&config, Command::Init { force: false }, true).unwrap();
        let parsed: Value = serde_json::from_str(&second).unwrap();
        assert_eq!(parsed["data"]["state"], "present");
    }

    #[test]
    fn test_init_force_discards_entries() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        run_to_string(&config, add_cmd("Soup", 5.0, 100.0), false).unwrap();

        run_to_string(&config, Command::Init { force: true }, false).unwrap();

        assert!(config.store().scan_all().unwrap().is_empty());
    }

    #[test]
    fn test_add_creates_store_and_appends() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let text = run_to_string(&config, add_cmd("Burger", 20.0, 500.0), false).unwrap();
        assert_eq!(text, "Nutrition Data Added Successfully!\n");

        let records = config.store().scan_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Burger");
        assert_eq!(records[0].calories, "500");
    }

    #[test]
    fn test_add_rejects_invalid_input_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let err = run_to_string(&config, add_cmd("42", 1.0, 1.0), false).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidInput);

        let err = run_to_string(&config, add_cmd("Cake", -1.0, 1.0), false).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidInput);

        assert!(config.store().scan_all().unwrap().is_empty());
    }

    #[test]
    fn test_reuse_missing_entry_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let err = run_to_string(
            &config,
            Command::Reuse {
                name: "Ghost".to_string(),
            },
            false,
        )
        .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::EntryNotFound);
    }

    #[test]
    fn test_reuse_appends_copy() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        run_to_string(&config, add_cmd("Oats", 10.0, 300.0), false).unwrap();

        let out = run_to_string(
            &config,
            Command::Reuse {
                name: "Oats".to_string(),
            },
            true,
        )
        .unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["data"]["reused"]["Name"], "Oats");
        assert_eq!(parsed["data"]["reused"]["Protein"], "10");

        assert_eq!(config.store().scan_all().unwrap().len(), 2);
    }

    #[test]
    fn test_list_warns_about_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        run_to_string(&config, add_cmd("Pizza", 12.0, 700.0), false).unwrap();
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&config.store_path)
            .unwrap();
        writeln!(file, ",1,1,1,1,2024-06-01 12:00:00").unwrap();

        let text = run_to_string(&config, Command::List, false).unwrap();
        assert!(text.contains("Pizza"));
        assert!(text.ends_with("Warning: 1 corrupted row(s) were skipped.\n"));

        let json_out = run_to_string(&config, Command::Check, true).unwrap();
        let parsed: Value = serde_json::from_str(&json_out).unwrap();
        assert_eq!(parsed["data"]["corrupt_rows"], 1);
    }

    #[test]
    fn test_today_totals_and_empty_day() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        run_to_string(&config, add_cmd("A", 20.0, 500.0), false).unwrap();
        run_to_string(&config, add_cmd("B", 30.0, 600.0), false).unwrap();

        let out = run_to_string(&config, Command::Today { date: None }, true).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["data"]["summary"]["kind"], "Total");
        assert_eq!(parsed["data"]["summary"]["values"]["Protein"], 50.0);
        assert_eq!(parsed["data"]["summary"]["values"]["Calories"], 1100.0);

        let text = run_to_string(
            &config,
            Command::Today {
                date: NaiveDate::from_ymd_opt(2000, 1, 1),
            },
            false,
        )
        .unwrap();
        assert_eq!(text, "No Entries Found for 2000-01-01\n");
    }

    #[test]
    fn test_week_average_and_window_validation() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        run_to_string(&config, add_cmd("A", 10.0, 100.0), false).unwrap();
        run_to_string(&config, add_cmd("B", 20.0, 200.0), false).unwrap();

        let out = run_to_string(&config, Command::Week { days: None }, true).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["data"]["days"], 7);
        assert_eq!(parsed["data"]["summary"]["kind"], "Average");
        assert_eq!(parsed["data"]["summary"]["values"]["Protein"], 15.0);

        let err = run_to_string(&config, Command::Week { days: Some(0) }, false).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidInput);
    }

    #[test]
    fn test_add_recreates_removed_store_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = config_in(&temp_dir).store();
        store.ensure_exists().unwrap();
        fs::remove_file(store.path()).unwrap();

        let mut buf = Vec::new();
        add(&store, "Tea", &Nutrients::new(0.0, 0.0, 1.0, 2.0), false, &mut buf).unwrap();

        let records = store.scan_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Tea");
        assert_eq!(String::from_utf8(buf).unwrap(), "Nutrition Data Added Successfully!\n");
    }

    #[test]
    fn test_reuse_on_removed_store_leaves_empty_table() {
        let temp_dir = TempDir::new().unwrap();
        let store = config_in(&temp_dir).store();
        store.ensure_exists().unwrap();
        fs::remove_file(store.path()).unwrap();

        let mut buf = Vec::new();
        let err = reuse(&store, "Tea", false, &mut buf).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::EntryNotFound);

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "Name,Protein,Fat,Carbs,Calories,DateTime\n"
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_today_empty_message_names_today() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let text = run_to_string(&config, Command::Today { date: None }, false).unwrap();
        assert_eq!(text, "No Entries Found for Today\n");
    }
}
