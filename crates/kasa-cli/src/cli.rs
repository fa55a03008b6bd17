use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kasa_client::EntryKind;
use kasa_client::commands::watch::DEFAULT_INTERVAL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_entry_kind(value: &str) -> Result<EntryKind, String> {
    value
        .parse::<EntryKind>()
        .map_err(|_| "kind must be `income` or `expense`".to_string())
}

pub fn parse_interval_secs(value: &str) -> Result<u64, String> {
    match value.parse::<u64>() {
        Ok(0) => Err("interval must be at least 1 second".to_string()),
        Ok(seconds) => Ok(seconds),
        Err(_) => Err("interval must be a whole number of seconds".to_string()),
    }
}

/// Extended help shown after `kasa income add --help` and `kasa expense add --help`.
pub const ENTRY_ADD_AFTER_HELP: &str = "\
Field rules:
  --amount accepts `.` or `,` as the decimal separator (1234.56, 1234,56, 1.234,56).
  It must be greater than 0.
  --date defaults to today (YYYY-MM-DD). A time may follow: \"2024-01-10 09:30:00\".
  --category defaults to General. Any label is accepted.

Suggested categories:
  income   Sales, Service, Other
  expense  Rent, Electricity, Water, Staff, Other
  Run `kasa categories <kind>` to also see labels already in use.
";

#[derive(Debug, Parser)]
#[command(
    name = "kasa",
    version,
    about = "small-business income and expense ledger",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record and list income entries
    #[command(arg_required_else_help = true)]
    Income {
        #[command(subcommand)]
        command: EntryCommand,
    },
    /// Record and list expense entries
    #[command(arg_required_else_help = true)]
    Expense {
        #[command(subcommand)]
        command: EntryCommand,
    },
    /// Totals, net and per-category sums, optionally within a date range
    Report {
        /// First day to include (YYYY-MM-DD); omit for no lower bound
        #[arg(long, value_parser = parse_iso_date)]
        from: Option<IsoDate>,
        /// Last day to include (YYYY-MM-DD); omit for no upper bound
        #[arg(long, value_parser = parse_iso_date)]
        to: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Keep totals and recent entries on screen, refreshing when the ledger changes
    Watch {
        /// Seconds between refresh checks
        #[arg(
            long,
            default_value_t = DEFAULT_INTERVAL.as_secs(),
            value_parser = parse_interval_secs
        )]
        interval_secs: u64,
        /// Stop after this many checks instead of running until interrupted
        #[arg(long)]
        count: Option<u64>,
        /// Emit one JSON object per refresh
        #[arg(long)]
        json: bool,
    },
    /// Show suggested and already-used categories for income or expense
    Categories {
        /// `income` or `expense`
        #[arg(value_parser = parse_entry_kind)]
        kind: EntryKind,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Database discovery commands
    #[command(arg_required_else_help = true)]
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum EntryCommand {
    /// Add one entry to the ledger
    #[command(after_long_help = ENTRY_ADD_AFTER_HELP)]
    Add {
        /// What the entry is for
        #[arg(long)]
        description: String,
        /// Positive amount; `.` or `,` decimal separator
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Category label (defaults to General)
        #[arg(long)]
        category: Option<String>,
        /// Entry date, YYYY-MM-DD with optional HH:MM:SS (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List entries, newest first
    List {
        /// Only show entries with exactly this category
        #[arg(long)]
        category: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DbCommand {
    /// Show the ledger database path, tables and data range
    Schema {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
