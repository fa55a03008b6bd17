//! Tool parameter types.
//!
//! These mirror the request structs in `kasa_client::tools` and add the
//! JSON Schema that MCP clients see in `tools/list`.

use kasa_client::ledger::AmountInput;
use kasa_client::tools::{AddEntryRequest, ListEntriesRequest, ReportRequest};
use schemars::JsonSchema;
use serde::Deserialize;

/// A positive amount, either as a number or as text such as `"12,50"`.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AmountParam {
    Number(f64),
    Text(String),
}

impl From<AmountParam> for AmountInput {
    fn from(value: AmountParam) -> Self {
        match value {
            AmountParam::Number(number) => Self::Number(number),
            AmountParam::Text(text) => Self::Text(text),
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddEntryParams {
    #[schemars(description = "What the money was for. Must not be empty.")]
    pub description: String,

    #[schemars(
        description = "Amount greater than 0. Numbers or text; a comma is accepted as the decimal separator."
    )]
    pub amount: AmountParam,

    #[schemars(description = "Category label (default: General)")]
    #[serde(default)]
    pub category: Option<String>,

    #[schemars(description = "Entry date as YYYY-MM-DD (default: now, as YYYY-MM-DD HH:MM:SS)")]
    #[serde(default)]
    pub date: Option<String>,
}

impl From<AddEntryParams> for AddEntryRequest {
    fn from(params: AddEntryParams) -> Self {
        Self {
            description: params.description,
            amount: params.amount.into(),
            category: params.category,
            date: params.date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListEntriesParams {
    #[schemars(description = "Only return entries with exactly this category")]
    #[serde(default)]
    pub category: Option<String>,
}

impl From<ListEntriesParams> for ListEntriesRequest {
    fn from(params: ListEntriesParams) -> Self {
        Self {
            category: params.category,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ReportParams {
    #[schemars(description = "First day to include, YYYY-MM-DD (default: no lower bound)")]
    #[serde(default)]
    pub start_date: Option<String>,

    #[schemars(description = "Last day to include, YYYY-MM-DD (default: no upper bound)")]
    #[serde(default)]
    pub end_date: Option<String>,
}

impl From<ReportParams> for ReportRequest {
    fn from(params: ReportParams) -> Self {
        Self {
            start_date: params.start_date,
            end_date: params.end_date,
        }
    }
}
