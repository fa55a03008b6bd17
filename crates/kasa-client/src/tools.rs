//! The five callable ledger tools, independent of any transport.
//!
//! Each call returns a JSON value: the result on success, or
//! `{"error": "<message>"}` when the call was rejected. Tool callers read
//! the error as an ordinary result and decide what to tell the user.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::contracts::types::ReportData;
use crate::ledger::date::{BoundNames, build_range};
use crate::ledger::{
    AmountInput, DateRange, EntryDefaults, EntryKind, Ledger, RawEntry, report, validate_entry,
};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddEntryRequest {
    pub description: String,
    pub amount: AmountInput,
    /// Falls back to the surface's default category.
    #[serde(default)]
    pub category: Option<String>,
    /// Falls back to the current local date and time.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListEntriesRequest {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ToolSurface {
    ledger: Ledger,
    defaults: EntryDefaults,
}

impl ToolSurface {
    pub fn new(ledger: Ledger) -> Self {
        Self::with_defaults(ledger, EntryDefaults::for_tools())
    }

    pub fn with_defaults(ledger: Ledger, defaults: EntryDefaults) -> Self {
        Self { ledger, defaults }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn add_income(&self, request: AddEntryRequest) -> Value {
        self.add(EntryKind::Income, request)
    }

    pub fn add_expense(&self, request: AddEntryRequest) -> Value {
        self.add(EntryKind::Expense, request)
    }

    pub fn list_income(&self, request: ListEntriesRequest) -> Value {
        self.list(EntryKind::Income, request)
    }

    pub fn list_expense(&self, request: ListEntriesRequest) -> Value {
        self.list(EntryKind::Expense, request)
    }

    pub fn report(&self, request: ReportRequest) -> Value {
        let start = non_empty(request.start_date);
        let end = non_empty(request.end_date);
        to_tool_value(build_report(
            &self.ledger,
            start.as_deref(),
            end.as_deref(),
            BoundNames::TOOL,
            "report",
        ))
    }

    fn add(&self, kind: EntryKind, request: AddEntryRequest) -> Value {
        let raw = RawEntry {
            date: request.date,
            description: request.description,
            amount: request.amount,
            category: request.category,
        };
        to_tool_value(
            validate_entry(raw, &self.defaults).and_then(|entry| self.ledger.add(kind, &entry)),
        )
    }

    fn list(&self, kind: EntryKind, request: ListEntriesRequest) -> Value {
        let category = non_empty(request.category);
        to_tool_value(self.ledger.list(kind, category.as_deref()))
    }
}

/// Computes the full report payload shared by the tool and CLI surfaces.
pub fn build_report(
    ledger: &Ledger,
    start: Option<&str>,
    end: Option<&str>,
    names: BoundNames,
    command: &str,
) -> ClientResult<ReportData> {
    let range = build_range(start, end, names, command)?;
    report_for_range(ledger, &range)
}

pub(crate) fn report_for_range(ledger: &Ledger, range: &DateRange) -> ClientResult<ReportData> {
    let totals = report::totals(ledger, range)?;
    Ok(ReportData {
        total_income: totals.total_income,
        total_expense: totals.total_expense,
        net: totals.net,
        income_by_category: report::by_category(ledger, EntryKind::Income, range)?,
        expense_by_category: report::by_category(ledger, EntryKind::Expense, range)?,
        range_echo: range.echo(),
    })
}

/// Tool callers often send `""` for a parameter they mean to leave out.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

fn to_tool_value<T>(result: ClientResult<T>) -> Value
where
    T: serde::Serialize,
{
    match result.and_then(|value| {
        serde_json::to_value(value)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))
    }) {
        Ok(value) => value,
        Err(error) => json!({ "error": error.message }),
    }
}
