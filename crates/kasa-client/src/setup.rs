use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};

use crate::contracts::types::{DataRange, TableContract};
use crate::ledger::EntryKind;
use crate::migrations::{
    EXPECTED_USER_VERSION, REQUIRED_INDEX_NAMES, REQUIRED_META_KEYS, run_pending,
    safe_repair_statement,
};
use crate::state::{
    ensure_ledger_directory, ledger_db_path, map_sqlite_error, open_connection, resolve_ledger_home,
};
use crate::{ClientError, ClientResult};

const INTERNAL_META_COLUMNS: [&str; 2] = ["key", "value"];
const ENTRY_COLUMNS: [&str; 6] = [
    "id",
    "date",
    "description",
    "amount",
    "category",
    "created_at",
];

const MIGRATION_ATTEMPTS: u32 = 3;
const MIGRATION_RETRY_DELAY: Duration = Duration::from_millis(50);

const REQUIRED_CORE_TABLES: [(&str, &[&str]); 3] = [
    ("internal_meta", &INTERNAL_META_COLUMNS),
    ("income_entries", &ENTRY_COLUMNS),
    ("expense_entries", &ENTRY_COLUMNS),
];

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub home: PathBuf,
    pub db_path: PathBuf,
    pub schema_version: String,
}

pub fn ensure_initialized_at(home_override: &Path) -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(Some(home_override))
}

pub fn ensure_initialized_with_home_override(
    home_override: Option<&Path>,
) -> ClientResult<SetupContext> {
    let ledger_home = resolve_ledger_home(home_override)?;
    ensure_ledger_directory(&ledger_home)?;

    let db_path = ledger_db_path(&ledger_home);
    let mut connection = open_connection(&db_path)?;
    enable_wal(&connection, &db_path)?;

    migrate(&mut connection, &db_path)?;

    verify_core_tables(&connection, &db_path)?;
    repair_safe_objects(&connection, &db_path)?;
    verify_indexes_and_meta(&connection, &db_path)?;
    let schema_version = read_schema_version(&connection, &db_path)?;

    tracing::debug!(db_path = %db_path.display(), %schema_version, "ledger ready");

    Ok(SetupContext {
        home: ledger_home,
        db_path,
        schema_version,
    })
}

pub fn table_contracts() -> Vec<TableContract> {
    EntryKind::ALL
        .iter()
        .map(|kind| TableContract {
            kind: kind.as_str().to_string(),
            name: kind.table_name().to_string(),
            columns: ENTRY_COLUMNS.iter().map(|column| column.to_string()).collect(),
            suggested_categories: kind
                .suggested_categories()
                .iter()
                .map(|category| category.to_string())
                .collect(),
        })
        .collect()
}

pub(crate) fn read_data_range(connection: &Connection, db_path: &Path) -> ClientResult<DataRange> {
    connection
        .query_row(
            "SELECT MIN(first_date), MAX(last_date) FROM (
                SELECT MIN(substr(date, 1, 10)) AS first_date, MAX(substr(date, 1, 10)) AS last_date
                  FROM income_entries
                UNION ALL
                SELECT MIN(substr(date, 1, 10)), MAX(substr(date, 1, 10))
                  FROM expense_entries
             )",
            [],
            |row| {
                Ok(DataRange {
                    earliest: row.get(0)?,
                    latest: row.get(1)?,
                })
            },
        )
        .map_err(|error| map_sqlite_error(db_path, &error))
}

fn enable_wal(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    connection
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(())
}

/// Several processes may open a fresh ledger at once. Only one of them gets
/// to create the schema; the others fail their migration and then find the
/// expected version already committed.
fn migrate(connection: &mut Connection, db_path: &Path) -> ClientResult<()> {
    let mut attempt = 1;
    loop {
        let error = match run_pending(connection) {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };

        if read_user_version(connection, db_path)? == EXPECTED_USER_VERSION {
            tracing::debug!(
                db_path = %db_path.display(),
                "schema was created by a concurrent opener"
            );
            return Ok(());
        }
        if attempt >= MIGRATION_ATTEMPTS {
            return Err(map_migration_error(db_path, &error));
        }

        tracing::debug!(db_path = %db_path.display(), attempt, %error, "retrying migration");
        attempt += 1;
        thread::sleep(MIGRATION_RETRY_DELAY);
    }
}

fn read_user_version(connection: &Connection, db_path: &Path) -> ClientResult<i64> {
    connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    match error {
        rusqlite_migration::Error::RusqliteError { query: _, err } => {
            let mapped = map_sqlite_error(db_path, err);
            if mapped.code == "ledger_locked"
                || mapped.code == "ledger_corrupt"
                || mapped.code == "ledger_init_permission_denied"
            {
                mapped
            } else {
                ClientError::migration_failed(db_path, &error.to_string())
            }
        }
        _ => ClientError::migration_failed(db_path, &error.to_string()),
    }
}

fn verify_core_tables(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    for (table_name, required_columns) in REQUIRED_CORE_TABLES {
        if !sqlite_object_exists(connection, "table", table_name, db_path)? {
            return Err(ClientError::ledger_corrupt(db_path));
        }

        let columns = table_columns(connection, table_name, db_path)?;
        for required_column in required_columns {
            if !columns.iter().any(|column| column == required_column) {
                return Err(ClientError::ledger_corrupt(db_path));
            }
        }
    }

    Ok(())
}

fn repair_safe_objects(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    // Insert-only: a missing key is restored, a drifted value fails verification.
    for (meta_key, default_value) in REQUIRED_META_KEYS {
        connection
            .execute(
                "INSERT OR IGNORE INTO internal_meta (key, value) VALUES (?1, ?2)",
                params![meta_key, default_value],
            )
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    }

    for index_name in REQUIRED_INDEX_NAMES {
        if !sqlite_object_exists(connection, "index", index_name, db_path)? {
            let sql = safe_repair_statement(index_name).ok_or_else(|| {
                ClientError::ledger_init_failed(db_path, "Missing canonical SQL for index repair.")
            })?;
            connection
                .execute_batch(sql)
                .map_err(|error| map_sqlite_error(db_path, &error))?;
            tracing::info!(index_name, "recreated missing ledger index");
        }
    }

    Ok(())
}

fn verify_indexes_and_meta(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    if read_user_version(connection, db_path)? != EXPECTED_USER_VERSION {
        return Err(ClientError::ledger_corrupt(db_path));
    }

    for index_name in REQUIRED_INDEX_NAMES {
        if !sqlite_object_exists(connection, "index", index_name, db_path)? {
            return Err(ClientError::ledger_corrupt(db_path));
        }
    }

    for (meta_key, expected_value) in REQUIRED_META_KEYS {
        let value = connection
            .query_row(
                "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
                [meta_key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(db_path, &error))?;

        if value.as_deref() != Some(expected_value) {
            return Err(ClientError::ledger_corrupt(db_path));
        }
    }

    Ok(())
}

fn sqlite_object_exists(
    connection: &Connection,
    object_type: &str,
    object_name: &str,
    db_path: &Path,
) -> ClientResult<bool> {
    let exists = connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2 LIMIT 1",
            params![object_type, object_name],
            |_row| Ok(true),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?
        .unwrap_or(false);

    Ok(exists)
}

fn table_columns(
    connection: &Connection,
    table_name: &str,
    db_path: &Path,
) -> ClientResult<Vec<String>> {
    if !is_required_core_table(table_name) {
        return Err(ClientError::ledger_init_failed(
            db_path,
            "Refused PRAGMA table inspection for non-core table.",
        ));
    }

    // SAFETY: `table_name` comes from REQUIRED_CORE_TABLES, never from user input.
    let sql = format!("PRAGMA table_info({table_name})");
    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let column_iter = statement
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut columns: Vec<String> = Vec::new();
    for row in column_iter {
        columns.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    Ok(columns)
}

fn is_required_core_table(table_name: &str) -> bool {
    REQUIRED_CORE_TABLES
        .iter()
        .any(|(required_name, _)| required_name == &table_name)
}

fn read_schema_version(connection: &Connection, db_path: &Path) -> ClientResult<String> {
    let value = connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = 'schema_version' LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(value.unwrap_or_else(|| "v1".to_string()))
}
