use std::path::Path;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::CategoriesData;
use crate::ledger::{EntryKind, Ledger};

pub fn run(kind: EntryKind) -> ClientResult<SuccessEnvelope> {
    run_with_home_override(kind, None)
}

/// Suggested categories for `kind` plus any other label already stored.
#[doc(hidden)]
pub fn run_with_home_override(
    kind: EntryKind,
    home_override: Option<&Path>,
) -> ClientResult<SuccessEnvelope> {
    let ledger = Ledger::open(home_override)?;
    let suggested: Vec<String> = kind
        .suggested_categories()
        .iter()
        .map(|category| category.to_string())
        .collect();
    let used = ledger.used_categories(kind)?;

    success(
        "categories",
        CategoriesData {
            kind: kind.as_str().to_string(),
            suggested,
            used,
        },
    )
}
