//! Ledger core shared by the `kasa` CLI and the `kasa-mcp` tool server.
//!
//! Two append-only collections (income and expense) live in one SQLite file.
//! Surfaces validate input with [`ledger::validate_entry`], write through
//! [`ledger::Ledger`] and summarize with [`ledger::report`].

pub mod commands;
pub mod contracts;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod setup;
pub mod state;
pub mod tools;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult, ErrorClass};
pub use ledger::{EntryKind, Ledger};
pub use tools::ToolSurface;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
