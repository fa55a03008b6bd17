use serde::Serialize;

/// A stored income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub created_at: String,
}

/// A validated entry that has not been persisted yet.
///
/// Only [`crate::ledger::validate_entry`] builds these, so holding one means
/// the amount is positive and the text fields are non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) amount: f64,
    pub(crate) category: String,
}

impl NewEntry {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}
