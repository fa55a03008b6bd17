mod cli;
mod dispatch;
mod logging;
mod output;
mod stdout_io;
mod watch;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use dispatch::Dispatched;
use kasa_client::{ClientError, ErrorClass};
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "Kasa - small-business income and expense ledger

Usage:
  kasa <command>

Start here:
  kasa income add --description \"Consulting\" --amount 500
  kasa report
  kasa --help
";

const TOP_LEVEL_HELP: &str = "Kasa - small-business income and expense ledger

USAGE: kasa <command>

Record entries:
  kasa income add --description <text> --amount <amount>    Add income (category defaults to General)
  kasa expense add --description <text> --amount <amount>   Add an expense
  kasa income add --help                                    Field rules and suggested categories

Review:
  kasa income list [--category <name>]                      Income entries, newest first
  kasa expense list [--category <name>]                     Expense entries, newest first
  kasa report [--from YYYY-MM-DD] [--to YYYY-MM-DD]         Totals, net and per-category sums
  kasa watch                                                Live totals, refreshed when entries change

Other commands:
  kasa categories <income|expense>                          Suggested and already-used categories
  kasa db schema                                            Database path, tables and data range

Every command accepts --json for machine-readable output.
The ledger lives in ~/.kasa unless KASA_HOME points elsewhere.
";

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(Dispatched::Envelope(success)) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(Dispatched::Watch { interval, count }) => watch::run(interval, count, mode),
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        let text = if err.kind() == ErrorKind::DisplayHelp && is_top_level_help_request(raw_args) {
            TOP_LEVEL_HELP.to_string()
        } else {
            err.to_string()
        };
        if write_stdout_text(&text).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let command_hint = if matches!(
        err.kind(),
        ErrorKind::MissingRequiredArgument
            | ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::UnknownArgument
            | ErrorKind::InvalidSubcommand
    ) {
        command_path_from_args(raw_args)
    } else {
        None
    };
    let clean_message = strip_clap_boilerplate(&err.to_string());
    let parse_error = ClientError::invalid_argument_for_command(&clean_message, command_hint);
    let mode = infer_requested_output_mode(raw_args);
    if output::print_failure(&parse_error, mode).is_err() {
        return Err(ExitCode::from(2));
    }
    Err(ExitCode::from(1))
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so our "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Maps raw args to the subcommand path used in `--help` hints.
fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    match non_flags.as_slice() {
        ["income", "add", ..] => Some("income add"),
        ["income", "list", ..] => Some("income list"),
        ["income", ..] => Some("income"),
        ["expense", "add", ..] => Some("expense add"),
        ["expense", "list", ..] => Some("expense list"),
        ["expense", ..] => Some("expense"),
        ["report", ..] => Some("report"),
        ["watch", ..] => Some("watch"),
        ["categories", ..] => Some("categories"),
        ["db", "schema", ..] => Some("db schema"),
        ["db", ..] => Some("db"),
        _ => None,
    }
}

pub(crate) fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

/// Storage and internal failures exit with 2; rejected input exits with 1.
fn is_internal_error(error: &ClientError) -> bool {
    matches!(error.class(), ErrorClass::Persistence | ErrorClass::Internal)
}
