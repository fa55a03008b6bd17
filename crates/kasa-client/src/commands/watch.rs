//! Polling refresh for the live view.
//!
//! A tick costs one cheap fingerprint query. The full snapshot (report plus
//! newest rows) is rebuilt only when the fingerprint moved since the last
//! tick, so an idle ledger is not re-aggregated every second.

use std::time::Duration;

use crate::ClientResult;
use crate::contracts::types::WatchSnapshot;
use crate::ledger::{DateRange, EntryKind, Ledger, LedgerFingerprint};
use crate::tools::report_for_range;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct RefreshPoller {
    ledger: Ledger,
    recent_limit: usize,
    last_seen: Option<LedgerFingerprint>,
}

impl RefreshPoller {
    pub fn new(ledger: Ledger) -> Self {
        Self::with_recent_limit(ledger, RECENT_LIMIT)
    }

    pub fn with_recent_limit(ledger: Ledger, recent_limit: usize) -> Self {
        Self {
            ledger,
            recent_limit,
            last_seen: None,
        }
    }

    /// Returns a fresh snapshot when the ledger changed since the previous
    /// call. The first call always returns one.
    pub fn poll(&mut self) -> ClientResult<Option<WatchSnapshot>> {
        let fingerprint = self.ledger.fingerprint()?;
        if self.last_seen == Some(fingerprint) {
            return Ok(None);
        }

        let snapshot = snapshot(&self.ledger, fingerprint, self.recent_limit)?;
        self.last_seen = Some(fingerprint);
        tracing::debug!(?fingerprint, "ledger changed, snapshot rebuilt");
        Ok(Some(snapshot))
    }
}

fn snapshot(
    ledger: &Ledger,
    fingerprint: LedgerFingerprint,
    recent_limit: usize,
) -> ClientResult<WatchSnapshot> {
    let report = report_for_range(ledger, &DateRange::all_time())?;
    let mut recent_income = ledger.list(EntryKind::Income, None)?;
    recent_income.truncate(recent_limit);
    let mut recent_expense = ledger.list(EntryKind::Expense, None)?;
    recent_expense.truncate(recent_limit);

    Ok(WatchSnapshot {
        fingerprint,
        report,
        recent_income,
        recent_expense,
    })
}
