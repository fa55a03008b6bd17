use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ClientError;

const INCOME_CATEGORIES: [&str; 3] = ["Sales", "Service", "Other"];
const EXPENSE_CATEGORIES: [&str; 5] = ["Rent", "Electricity", "Water", "Staff", "Other"];

/// Which of the two collections an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub const ALL: [EntryKind; 2] = [EntryKind::Income, EntryKind::Expense];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub(crate) const fn table_name(self) -> &'static str {
        match self {
            Self::Income => "income_entries",
            Self::Expense => "expense_entries",
        }
    }

    /// Categories offered to form-style callers. Not enforced by the store.
    pub const fn suggested_categories(self) -> &'static [&'static str] {
        match self {
            Self::Income => &INCOME_CATEGORIES,
            Self::Expense => &EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ClientError::invalid_argument(&format!(
                "Unknown entry kind `{other}`; expected `income` or `expense`."
            ))),
        }
    }
}
