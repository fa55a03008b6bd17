use std::path::Path;

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::ledger::Ledger;
use crate::ledger::date::BoundNames;
use crate::tools::build_report;

#[derive(Debug, Clone, Default)]
pub struct ReportOptions<'a> {
    pub from: Option<String>,
    pub to: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(from: Option<&str>, to: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ReportOptions {
        from: from.map(str::to_string),
        to: to.map(str::to_string),
        home_override: None,
    })
}

pub fn run_with_options(options: ReportOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let ledger = Ledger::open(options.home_override)?;
    let data = build_report(
        &ledger,
        options.from.as_deref(),
        options.to.as_deref(),
        BoundNames::CLI,
        "report",
    )?;
    success("report", data)
}
