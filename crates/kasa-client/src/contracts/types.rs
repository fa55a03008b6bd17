use serde::Serialize;

use crate::ledger::date::RangeEcho;
use crate::ledger::{CategoryTotals, LedgerEntry, LedgerFingerprint};

#[derive(Debug, Clone, Serialize)]
pub struct DataRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableContract {
    pub kind: String,
    pub name: String,
    pub columns: Vec<String>,
    pub suggested_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummaryData {
    pub db_path: String,
    pub schema_version: String,
    pub tables: Vec<TableContract>,
    pub data_range: DataRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryAddedData {
    pub kind: String,
    pub entry: LedgerEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryListData {
    pub kind: String,
    pub category: Option<String>,
    pub count: usize,
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    pub income_by_category: CategoryTotals,
    pub expense_by_category: CategoryTotals,
    pub range_echo: RangeEcho,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesData {
    pub kind: String,
    pub suggested: Vec<String>,
    pub used: Vec<String>,
}

/// One refresh of the live view: the all-time report plus the newest rows.
#[derive(Debug, Clone, Serialize)]
pub struct WatchSnapshot {
    pub fingerprint: LedgerFingerprint,
    pub report: ReportData,
    pub recent_income: Vec<LedgerEntry>,
    pub recent_expense: Vec<LedgerEntry>,
}
