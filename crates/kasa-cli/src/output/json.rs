use std::io;

use kasa_client::contracts::envelope::failure_from_error;
use kasa_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::Value;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        // Lists and reports print the same shape the tool surface returns.
        "income list" | "expense list" => {
            let entries = success
                .data
                .get("entries")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new()));
            serialize_json_pretty(&entries)
        }
        "report" => serialize_json_pretty(&success.data),
        _ => serialize_json_pretty(success),
    }
}

/// One compact line per refresh so the stream can be piped line by line.
pub fn render_watch_json(success: &SuccessEnvelope) -> io::Result<String> {
    serde_json::to_string(success).map_err(io::Error::other)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
