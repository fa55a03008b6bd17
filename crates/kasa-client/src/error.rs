use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

/// Broad family a [`ClientError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input rejected before it reached the store. Nothing was written.
    Validation,
    /// Storage unavailable, locked, corrupt, or the write did not commit.
    Persistence,
    /// Malformed command arguments such as an inverted date range.
    InvalidArgument,
    Internal,
}

impl ErrorClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Persistence => "persistence",
            Self::InvalidArgument => "invalid_argument",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn class(&self) -> ErrorClass {
        match self.code.as_str() {
            "validation_failed" => ErrorClass::Validation,
            "invalid_argument" => ErrorClass::InvalidArgument,
            "ledger_init_permission_denied"
            | "ledger_locked"
            | "ledger_corrupt"
            | "ledger_write_failed"
            | "migration_failed"
            | "ledger_init_failed" => ErrorClass::Persistence,
            _ => ErrorClass::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.class() == ErrorClass::Validation
    }

    pub fn is_persistence(&self) -> bool {
        self.class() == ErrorClass::Persistence
    }

    /// The field a validation failure points at, when one is recorded.
    pub fn field(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.get("field"))
            .and_then(Value::as_str)
    }

    pub fn validation_failed(field: &str, message: &str, received: &str) -> Self {
        Self::new(
            "validation_failed",
            message,
            vec![format!("Correct `{field}` and submit the entry again.")],
        )
        .with_data(json!({
            "field": field,
            "received": received,
        }))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `kasa {cmd} --help` for usage."),
            None => "Run `kasa --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn ledger_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_permission_denied",
            &format!("Cannot open ledger at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `KASA_HOME` to a writable directory."
            )],
        )
    }

    pub fn ledger_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_locked",
            &format!("Ledger database is locked at `{location}`."),
            vec![
                format!("Close other processes writing to `{location}` and retry."),
                "Nothing was written by this attempt.".to_string(),
            ],
        )
    }

    pub fn ledger_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_corrupt",
            &format!("Ledger database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite ledger file or restore from backup."
            )],
        )
    }

    pub fn ledger_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_write_failed",
            &format!("Entry was not committed to `{location}`: {detail}"),
            vec!["Retry the entry; no partial record was stored.".to_string()],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Ledger migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn ledger_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_init_failed",
            &format!("Ledger initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ClientError, ErrorClass};

    #[test]
    fn validation_errors_carry_field_and_received_value() {
        let error = ClientError::validation_failed("amount", "amount must be positive", "-3");
        assert_eq!(error.class(), ErrorClass::Validation);
        assert_eq!(error.field(), Some("amount"));
        assert!(error.recovery_steps[0].contains("amount"));
    }

    #[test]
    fn storage_errors_are_classified_as_persistence() {
        let path = Path::new("/tmp/ledger.db");
        for error in [
            ClientError::ledger_locked(path),
            ClientError::ledger_corrupt(path),
            ClientError::ledger_write_failed(path, "disk full"),
            ClientError::migration_failed(path, "boom"),
        ] {
            assert!(error.is_persistence(), "{} should be persistence", error.code);
            assert!(!error.is_validation());
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_internal() {
        let error = ClientError::internal_serialization("bad json");
        assert_eq!(error.class(), ErrorClass::Internal);
        assert!(error.field().is_none());
    }
}
