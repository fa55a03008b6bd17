use std::path::Path;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{EntryAddedData, EntryListData};
use crate::ledger::{AmountInput, EntryDefaults, EntryKind, Ledger, RawEntry, validate_entry};

#[derive(Debug, Clone)]
pub struct AddOptions<'a> {
    pub kind: EntryKind,
    pub description: String,
    pub amount: String,
    pub category: Option<String>,
    pub date: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions<'a> {
    pub category: Option<String>,
    pub home_override: Option<&'a Path>,
}

/// Form-style add: a missing date is stamped with today's date only.
pub fn add_with_options(options: AddOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let raw = RawEntry {
        date: options.date,
        description: options.description,
        amount: AmountInput::Text(options.amount),
        category: options.category,
    };
    // Validate before touching storage so a rejected form never creates a ledger file.
    let entry = validate_entry(raw, &EntryDefaults::for_form())?;

    let ledger = Ledger::open(options.home_override)?;
    let stored = ledger.add(options.kind, &entry)?;
    success(
        &format!("{} add", options.kind),
        EntryAddedData {
            kind: options.kind.as_str().to_string(),
            entry: stored,
        },
    )
}

pub fn list_with_options(kind: EntryKind, options: ListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let ledger = Ledger::open(options.home_override)?;
    let entries = ledger.list(kind, options.category.as_deref())?;
    success(
        &format!("{kind} list"),
        EntryListData {
            kind: kind.as_str().to_string(),
            category: options.category,
            count: entries.len(),
            entries,
        },
    )
}
