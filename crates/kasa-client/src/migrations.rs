use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");

pub const EXPECTED_USER_VERSION: i64 = 1;

pub const REQUIRED_INDEX_NAMES: [&str; 4] = [
    "idx_income_entries_date",
    "idx_income_entries_category",
    "idx_expense_entries_date",
    "idx_expense_entries_category",
];

pub const REQUIRED_META_KEYS: [(&str, &str); 1] = [("schema_version", "v1")];

/// Canonical DDL for objects setup may recreate when they go missing.
pub fn safe_repair_statement(object_name: &str) -> Option<&'static str> {
    match object_name {
        "idx_income_entries_date" => Some(
            "CREATE INDEX IF NOT EXISTS idx_income_entries_date ON income_entries (date DESC, id DESC);",
        ),
        "idx_income_entries_category" => Some(
            "CREATE INDEX IF NOT EXISTS idx_income_entries_category ON income_entries (category);",
        ),
        "idx_expense_entries_date" => Some(
            "CREATE INDEX IF NOT EXISTS idx_expense_entries_date ON expense_entries (date DESC, id DESC);",
        ),
        "idx_expense_entries_category" => Some(
            "CREATE INDEX IF NOT EXISTS idx_expense_entries_category ON expense_entries (category);",
        ),
        _ => None,
    }
}

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(BOOTSTRAP_SQL)])
}

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    migrations().to_latest(conn)
}
