mod categories_text;
mod entries_text;
mod error_text;
mod format;
mod json;
mod mode;
mod report_text;
mod schema_text;

use std::io;

use kasa_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::{write_stdout_line, write_stdout_line_strict};

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

/// Prints one refresh of `kasa watch`. Text mode redraws the screen.
/// A closed stdout is returned as `BrokenPipe` rather than swallowed.
pub fn print_watch_snapshot(
    success: &SuccessEnvelope,
    mode: OutputMode,
    refreshed_at: &str,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => write_stdout_line_strict(&json::render_watch_json(success)?),
        OutputMode::Text => {
            let body = report_text::render_watch_snapshot(&success.data, refreshed_at)?;
            write_stdout_line_strict(&format!("\x1b[2J\x1b[H{body}"))
        }
    }
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "income add" | "expense add" => entries_text::render_entry_added(&success.data),
        "income list" | "expense list" => entries_text::render_entry_list(&success.data),
        "report" => report_text::render_report(&success.data),
        "categories" => categories_text::render_categories(&success.data),
        "db schema" => schema_text::render_schema_summary(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
