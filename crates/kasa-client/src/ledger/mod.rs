//! Income/expense ledger: storage, input validation and reporting.
//!
//! Every surface (CLI form, tool calls, refresh poller) goes through
//! [`Ledger`] for reads and writes and through [`report`] for summaries.

pub mod date;
pub mod entry;
pub mod kind;
pub mod report;
pub mod store;
pub mod validate;

pub use date::DateRange;
pub use entry::{LedgerEntry, NewEntry};
pub use kind::EntryKind;
pub use report::{CategoryTotal, CategoryTotals, Totals};
pub use store::{Ledger, LedgerFingerprint};
pub use validate::{
    AmountInput, DEFAULT_CATEGORY, DateStamp, EntryDefaults, RawEntry, parse_amount, validate_entry,
};
