use std::path::{Path, PathBuf};

use rusqlite::{Connection, Row, TransactionBehavior, params};
use serde::Serialize;

use crate::contracts::types::DataRange;
use crate::ledger::date::now_stamp;
use crate::ledger::entry::{LedgerEntry, NewEntry};
use crate::ledger::kind::EntryKind;
use crate::setup::{SetupContext, ensure_initialized_with_home_override, read_data_range};
use crate::state::{map_sqlite_error, map_write_error, open_connection};
use crate::{ClientError, ClientResult};

/// Handle to one ledger database.
///
/// Holds paths only. Every call opens its own connection, so a `Ledger` can
/// be cloned into several surfaces and threads.
#[derive(Debug, Clone)]
pub struct Ledger {
    db_path: PathBuf,
    schema_version: String,
}

/// Cheap change detector used by the refresh poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerFingerprint {
    pub income_count: i64,
    pub income_max_id: i64,
    pub expense_count: i64,
    pub expense_max_id: i64,
}

impl Ledger {
    /// Opens the ledger under `home_override`, or the resolved default home,
    /// creating and migrating the database when needed.
    pub fn open(home_override: Option<&Path>) -> ClientResult<Self> {
        let setup = ensure_initialized_with_home_override(home_override)?;
        Ok(Self::from_setup(setup))
    }

    pub fn from_setup(setup: SetupContext) -> Self {
        Self {
            db_path: setup.db_path,
            schema_version: setup.schema_version,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Appends `entry` to the `kind` collection and returns the stored row.
    ///
    /// The row is committed before this returns. On error nothing is stored.
    pub fn add(&self, kind: EntryKind, entry: &NewEntry) -> ClientResult<LedgerEntry> {
        let mut connection = self.connect()?;
        let transaction = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|error| map_write_error(&self.db_path, &error))?;

        // SAFETY: table names come from EntryKind, never from user input.
        let insert_sql = format!(
            "INSERT INTO {} (date, description, amount, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            kind.table_name()
        );
        transaction
            .execute(
                &insert_sql,
                params![
                    entry.date(),
                    entry.description(),
                    entry.amount(),
                    entry.category(),
                    now_stamp()
                ],
            )
            .map_err(|error| map_write_error(&self.db_path, &error))?;

        let id = transaction.last_insert_rowid();
        let select_sql = format!(
            "SELECT id, date, description, amount, category, created_at FROM {} WHERE id = ?1",
            kind.table_name()
        );
        let stored = transaction
            .query_row(&select_sql, [id], entry_from_row)
            .map_err(|error| map_write_error(&self.db_path, &error))?;

        transaction
            .commit()
            .map_err(|error| map_write_error(&self.db_path, &error))?;

        tracing::info!(
            kind = kind.as_str(),
            id = stored.id,
            amount = stored.amount,
            category = %stored.category,
            "entry committed"
        );
        Ok(stored)
    }

    /// Lists `kind` entries newest first, optionally narrowed to one exact
    /// category. Entries sharing a date come out in descending id order.
    pub fn list(&self, kind: EntryKind, category: Option<&str>) -> ClientResult<Vec<LedgerEntry>> {
        let connection = self.connect()?;
        let sql = format!(
            "SELECT id, date, description, amount, category, created_at
               FROM {}
              WHERE (?1 IS NULL OR category = ?1)
              ORDER BY date DESC, id DESC",
            kind.table_name()
        );
        let mut statement = connection
            .prepare(&sql)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        let rows_iter = statement
            .query_map(params![category], entry_from_row)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut entries = Vec::new();
        for row in rows_iter {
            entries.push(row.map_err(|error| map_sqlite_error(&self.db_path, &error))?);
        }

        tracing::debug!(kind = kind.as_str(), count = entries.len(), "entries listed");
        Ok(entries)
    }

    /// Categories already used in the `kind` collection, alphabetically.
    pub fn used_categories(&self, kind: EntryKind) -> ClientResult<Vec<String>> {
        let connection = self.connect()?;
        let sql = format!(
            "SELECT DISTINCT category FROM {} ORDER BY category ASC",
            kind.table_name()
        );
        let mut statement = connection
            .prepare(&sql)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        let rows_iter = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut categories = Vec::new();
        for row in rows_iter {
            categories.push(row.map_err(|error| map_sqlite_error(&self.db_path, &error))?);
        }
        Ok(categories)
    }

    pub fn fingerprint(&self) -> ClientResult<LedgerFingerprint> {
        let connection = self.connect()?;
        connection
            .query_row(
                "SELECT
                    (SELECT COUNT(*) FROM income_entries),
                    (SELECT COALESCE(MAX(id), 0) FROM income_entries),
                    (SELECT COUNT(*) FROM expense_entries),
                    (SELECT COALESCE(MAX(id), 0) FROM expense_entries)",
                [],
                |row| {
                    Ok(LedgerFingerprint {
                        income_count: row.get(0)?,
                        income_max_id: row.get(1)?,
                        expense_count: row.get(2)?,
                        expense_max_id: row.get(3)?,
                    })
                },
            )
            .map_err(|error| map_sqlite_error(&self.db_path, &error))
    }

    /// Earliest and latest entry dates across both collections.
    pub fn data_range(&self) -> ClientResult<DataRange> {
        let connection = self.connect()?;
        read_data_range(&connection, &self.db_path)
    }

    pub(crate) fn connect(&self) -> ClientResult<Connection> {
        if !self.db_path.exists() {
            return Err(ClientError::ledger_init_failed(
                &self.db_path,
                "Ledger database file is missing.",
            ));
        }
        open_connection(&self.db_path)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    Ok(LedgerEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        created_at: row.get(5)?,
    })
}
