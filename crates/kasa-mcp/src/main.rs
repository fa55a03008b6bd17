//! Kasa MCP Server
//!
//! Income and expense ledger tools for MCP clients.
//!
//! # Configuration
//! Set `KASA_MCP_CONFIG` or place `mcp.toml` in the ledger home
//! (`KASA_HOME`, default `~/.kasa`).

use kasa_mcp::{LedgerMcpServer, McpConfig, init};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init::init_tracing("kasa_mcp")?;

    tracing::info!("Starting Kasa MCP Server");

    let config = McpConfig::load()?;
    let server = LedgerMcpServer::from_config(&config)?;
    tracing::info!(db_path = %server.db_path().display(), "ledger ready");

    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
