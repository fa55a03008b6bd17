//! Tool server for the kasa ledger.
//!
//! Serves the five ledger tools (`add_income`, `add_expense`, `list_income`,
//! `list_expense`, `report`) over MCP stdio. The server is also usable
//! in-process:
//!
//! ```rust,ignore
//! use kasa_mcp::{LedgerMcpServer, McpConfig};
//!
//! let server = LedgerMcpServer::from_config(&McpConfig::load()?)?;
//! ```

pub mod config;
pub mod init;
pub mod params;
pub mod server;

pub use config::McpConfig;
pub use server::LedgerMcpServer;
