//! MCP server exposing the ledger tools.
//!
//! Rejected input is not a protocol failure: the tool still succeeds and its
//! JSON body is `{"error": "<message>"}`. `McpError` is reserved for faults
//! in the server itself.

use std::path::Path;

use anyhow::Result;
use kasa_client::{Ledger, ToolSurface};
use rmcp::{
    ErrorData as McpError,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::Value;

use crate::config::McpConfig;
use crate::params::{AddEntryParams, ListEntriesParams, ReportParams};

#[derive(Clone)]
pub struct LedgerMcpServer {
    surface: ToolSurface,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LedgerMcpServer {
    pub fn new(surface: ToolSurface) -> Self {
        Self {
            surface,
            tool_router: Self::tool_router(),
        }
    }

    /// Opens (and if needed creates) the configured ledger.
    pub fn from_config(config: &McpConfig) -> Result<Self> {
        let ledger = Ledger::open(config.ledger_home.as_deref())
            .map_err(|error| anyhow::anyhow!("{}: {}", error.code, error.message))?;
        Ok(Self::new(ToolSurface::with_defaults(
            ledger,
            config.entry_defaults(),
        )))
    }

    pub fn db_path(&self) -> &Path {
        self.surface.ledger().db_path()
    }

    #[tool(
        description = "Record money received. Returns the stored entry {id, date, description, amount, category, created_at} or {error}."
    )]
    pub async fn add_income(
        &self,
        Parameters(params): Parameters<AddEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(description = %params.description, "add_income");
        let surface = self.surface.clone();
        let value = run_blocking(move || surface.add_income(params.into())).await?;
        json_result(&value)
    }

    #[tool(
        description = "Record money spent. Returns the stored entry {id, date, description, amount, category, created_at} or {error}."
    )]
    pub async fn add_expense(
        &self,
        Parameters(params): Parameters<AddEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(description = %params.description, "add_expense");
        let surface = self.surface.clone();
        let value = run_blocking(move || surface.add_expense(params.into())).await?;
        json_result(&value)
    }

    #[tool(description = "List income entries, newest first. Optionally filter by exact category.")]
    pub async fn list_income(
        &self,
        Parameters(params): Parameters<ListEntriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let surface = self.surface.clone();
        let value = run_blocking(move || surface.list_income(params.into())).await?;
        json_result(&value)
    }

    #[tool(description = "List expense entries, newest first. Optionally filter by exact category.")]
    pub async fn list_expense(
        &self,
        Parameters(params): Parameters<ListEntriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let surface = self.surface.clone();
        let value = run_blocking(move || surface.list_expense(params.into())).await?;
        json_result(&value)
    }

    #[tool(
        description = "Totals, net and per-category sums for an optional inclusive date range. Missing bounds are echoed as \"All time\"."
    )]
    pub async fn report(
        &self,
        Parameters(params): Parameters<ReportParams>,
    ) -> Result<CallToolResult, McpError> {
        let surface = self.surface.clone();
        let value = run_blocking(move || surface.report(params.into())).await?;
        json_result(&value)
    }
}

#[tool_handler]
impl rmcp::ServerHandler for LedgerMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Kasa ledger - records income and expenses for a small business and \
                 reports totals. Use add_income/add_expense to record entries, \
                 list_income/list_expense to review them and report for totals over a \
                 date range. Rejected input comes back as {\"error\": \"...\"}."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Ledger calls block on SQLite, so they run off the async workers.
async fn run_blocking<F>(call: F) -> Result<Value, McpError>
where
    F: FnOnce() -> Value + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))
}

fn json_result(value: &Value) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
