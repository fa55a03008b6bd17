use serde::{Deserialize, Serialize};

use crate::ledger::date::{is_valid_entry_date, now_stamp, today_stamp};
use crate::ledger::entry::NewEntry;
use crate::{ClientError, ClientResult};

/// Category applied when a tool-style caller leaves it out.
pub const DEFAULT_CATEGORY: &str = "General";

/// An amount as it arrives from a caller: a JSON number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn received(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Unvalidated entry fields as a surface received them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub date: Option<String>,
    pub description: String,
    pub amount: AmountInput,
    pub category: Option<String>,
}

/// How a missing date is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStamp {
    /// `YYYY-MM-DD`, used by the form-style CLI.
    Today,
    /// `YYYY-MM-DD HH:MM:SS` local time, used by tool calls.
    Now,
}

impl DateStamp {
    fn stamp(self) -> String {
        match self {
            Self::Today => today_stamp(),
            Self::Now => now_stamp(),
        }
    }
}

/// Values a surface substitutes for fields the caller left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDefaults {
    pub category: String,
    pub date: DateStamp,
}

impl EntryDefaults {
    pub fn for_tools() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            date: DateStamp::Now,
        }
    }

    pub fn for_form() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            date: DateStamp::Today,
        }
    }
}

pub fn validate_entry(raw: RawEntry, defaults: &EntryDefaults) -> ClientResult<NewEntry> {
    // Only literal emptiness is rejected; whitespace-only text is stored as given.
    if raw.description.is_empty() {
        return Err(reject(
            "description",
            "Description must not be empty.",
            &raw.description,
        ));
    }

    let amount = match &raw.amount {
        AmountInput::Number(value) => *value,
        AmountInput::Text(text) => parse_amount(text).ok_or_else(|| {
            reject(
                "amount",
                &format!("Amount `{text}` is not a number."),
                text,
            )
        })?,
    };
    if !amount.is_finite() {
        return Err(reject(
            "amount",
            "Amount must be a finite number.",
            &raw.amount.received(),
        ));
    }
    if amount <= 0.0 {
        return Err(reject(
            "amount",
            "Amount must be greater than 0.",
            &raw.amount.received(),
        ));
    }

    let category = raw
        .category
        .unwrap_or_else(|| defaults.category.clone());
    if category.is_empty() {
        return Err(reject("category", "Category must not be empty.", &category));
    }

    let date = match raw.date {
        Some(value) => {
            if !is_valid_entry_date(&value) {
                return Err(reject(
                    "date",
                    "Date must be YYYY-MM-DD, optionally followed by HH:MM:SS.",
                    &value,
                ));
            }
            value
        }
        None => defaults.date.stamp(),
    };

    Ok(NewEntry {
        date,
        description: raw.description,
        amount,
        category,
    })
}

/// Parses an amount typed with either `.` or `,` as the decimal separator.
///
/// When both separators appear, the right-most one is the decimal separator
/// and the other one groups thousands: `1.234,56` and `1,234.56` both read
/// as `1234.56`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let last_dot = text.rfind('.');
    let last_comma = text.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => text.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => text.replace(',', ""),
        (None, Some(_)) => text.replace(',', "."),
        _ => text.to_string(),
    };

    if !normalized
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }

    normalized.parse::<f64>().ok()
}

fn reject(field: &str, message: &str, received: &str) -> ClientError {
    tracing::warn!(field, received, "entry rejected: {message}");
    ClientError::validation_failed(field, message, received)
}
