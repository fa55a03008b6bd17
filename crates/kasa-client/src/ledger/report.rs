//! Totals and per-category sums over a date window.
//!
//! Everything here is a pure read: calling the same function twice without
//! an intervening write gives the same answer.

use rusqlite::params;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::ClientResult;
use crate::ledger::date::DateRange;
use crate::ledger::kind::EntryKind;
use crate::ledger::store::Ledger;
use crate::state::map_sqlite_error;

const RANGE_FILTER: &str =
    "(?1 IS NULL OR substr(date, 1, 10) >= ?1) AND (?2 IS NULL OR substr(date, 1, 10) <= ?2)";

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Totals {
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Category sums ordered by total descending, then category ascending.
///
/// Serializes as a JSON object keyed by category, keeping that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals(pub Vec<CategoryTotal>);

impl CategoryTotals {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.0.iter()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|item| item.category == category)
            .map(|item| item.total)
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for item in &self.0 {
            map.serialize_entry(&item.category, &item.total)?;
        }
        map.end()
    }
}

pub fn totals(ledger: &Ledger, range: &DateRange) -> ClientResult<Totals> {
    let total_income = sum_amount(ledger, EntryKind::Income, range)?;
    let total_expense = sum_amount(ledger, EntryKind::Expense, range)?;

    Ok(Totals {
        total_income,
        total_expense,
        net: round2(total_income - total_expense),
    })
}

pub fn by_category(
    ledger: &Ledger,
    kind: EntryKind,
    range: &DateRange,
) -> ClientResult<CategoryTotals> {
    let connection = ledger.connect()?;
    let db_path = ledger.db_path();

    // SAFETY: table names come from EntryKind, never from user input.
    let sql = format!(
        "SELECT category, ROUND(SUM(amount), 2) AS total
           FROM {}
          WHERE {RANGE_FILTER}
          GROUP BY category
          ORDER BY total DESC, category ASC",
        kind.table_name()
    );
    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let rows_iter = statement
        .query_map(params![range.start_bound(), range.end_bound()], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut items = Vec::new();
    for row in rows_iter {
        items.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    tracing::debug!(kind = kind.as_str(), groups = items.len(), "category totals computed");
    Ok(CategoryTotals(items))
}

pub(crate) fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid rendering "-0.00" for a balanced ledger.
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn sum_amount(ledger: &Ledger, kind: EntryKind, range: &DateRange) -> ClientResult<f64> {
    let connection = ledger.connect()?;
    let db_path = ledger.db_path();
    let sql = format!(
        "SELECT ROUND(COALESCE(SUM(amount), 0), 2) FROM {} WHERE {RANGE_FILTER}",
        kind.table_name()
    );
    connection
        .query_row(&sql, params![range.start_bound(), range.end_bound()], |row| {
            row.get::<_, f64>(0)
        })
        .map_err(|error| map_sqlite_error(db_path, &error))
}

#[cfg(test)]
mod tests {
    use super::{CategoryTotal, CategoryTotals, round2};

    #[test]
    fn category_totals_serialize_as_ordered_object() {
        let totals = CategoryTotals(vec![
            CategoryTotal {
                category: "Sales".to_string(),
                total: 700.0,
            },
            CategoryTotal {
                category: "Other".to_string(),
                total: 50.5,
            },
        ]);
        let rendered = serde_json::to_string(&totals);
        assert_eq!(
            rendered.ok().as_deref(),
            Some(r#"{"Sales":700.0,"Other":50.5}"#)
        );
        assert_eq!(totals.get("Other"), Some(50.5));
        assert_eq!(totals.get("Rent"), None);
    }

    #[test]
    fn round2_keeps_cents_and_drops_negative_zero() {
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(200.004), 200.0);
        assert!(round2(-0.001).is_sign_positive());
    }
}
