//! Configuration loading for kasa-mcp
//!
//! Configuration is loaded from:
//! 1. The file named by `KASA_MCP_CONFIG` (must exist when set)
//! 2. `<ledger home>/mcp.toml`, where the ledger home is `KASA_HOME` or `~/.kasa`
//! 3. Default values

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kasa_client::ledger::{DEFAULT_CATEGORY, DateStamp, EntryDefaults};
use kasa_client::state::resolve_ledger_home;
use serde::Deserialize;

pub const CONFIG_ENV_VAR: &str = "KASA_MCP_CONFIG";
pub const CONFIG_FILE_NAME: &str = "mcp.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpConfig {
    /// Directory holding `ledger.db`. Falls back to `KASA_HOME` or `~/.kasa`.
    #[serde(default)]
    pub ledger_home: Option<PathBuf>,

    /// Category applied when a tool call leaves it out.
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            ledger_home: None,
            default_category: default_category(),
        }
    }
}

impl McpConfig {
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        let home = resolve_ledger_home(None)?;
        let path = home.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.default_category.trim().is_empty() {
            anyhow::bail!("default_category must not be empty");
        }
        Ok(config)
    }

    /// Defaults handed to the tool surface. Tool calls stamp date and time.
    pub fn entry_defaults(&self) -> EntryDefaults {
        EntryDefaults {
            category: self.default_category.clone(),
            date: DateStamp::Now,
        }
    }
}
