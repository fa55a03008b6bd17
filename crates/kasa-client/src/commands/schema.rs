use std::path::Path;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SchemaSummaryData;
use crate::ledger::Ledger;
use crate::setup::table_contracts;

pub fn summary() -> ClientResult<SuccessEnvelope> {
    summary_with_home_override(None)
}

#[doc(hidden)]
pub fn summary_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let ledger = Ledger::open(home_override)?;
    let data = SchemaSummaryData {
        db_path: ledger.db_path().display().to_string(),
        schema_version: ledger.schema_version().to_string(),
        tables: table_contracts(),
        data_range: ledger.data_range()?,
    };
    success("db schema", data)
}
