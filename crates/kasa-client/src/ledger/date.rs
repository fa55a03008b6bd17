use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::{ClientError, ClientResult};

pub const ALL_TIME_LABEL: &str = "All time";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Inclusive date window. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub const fn all_time() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub(crate) fn start_bound(&self) -> Option<String> {
        self.start.as_ref().map(format_iso_date)
    }

    pub(crate) fn end_bound(&self) -> Option<String> {
        self.end.as_ref().map(format_iso_date)
    }

    pub fn echo(&self) -> RangeEcho {
        RangeEcho {
            start: self
                .start_bound()
                .unwrap_or_else(|| ALL_TIME_LABEL.to_string()),
            end: self
                .end_bound()
                .unwrap_or_else(|| ALL_TIME_LABEL.to_string()),
        }
    }
}

/// The range a report was computed over, as shown back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeEcho {
    pub start: String,
    pub end: String,
}

/// What a caller calls the two range bounds, so errors name the inputs it
/// actually exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundNames {
    pub start: &'static str,
    pub end: &'static str,
}

impl BoundNames {
    pub const CLI: Self = Self {
        start: "--from",
        end: "--to",
    };
    pub const TOOL: Self = Self {
        start: "start_date",
        end: "end_date",
    };
}

pub fn build_range(
    start: Option<&str>,
    end: Option<&str>,
    names: BoundNames,
    command: &str,
) -> ClientResult<DateRange> {
    let parsed_start = match start {
        Some(value) => Some(parse_iso_date_strict(value, names.start, command)?),
        None => None,
    };
    let parsed_end = match end {
        Some(value) => Some(parse_iso_date_strict(value, names.end, command)?),
        None => None,
    };

    if let (Some(first), Some(last)) = (parsed_start, parsed_end)
        && first > last
    {
        return Err(ClientError::invalid_argument_for_command(
            &format!(
                "Invalid date range: `{}` must be on or before `{}`.",
                names.start, names.end
            ),
            Some(command),
        ));
    }

    Ok(DateRange {
        start: parsed_start,
        end: parsed_end,
    })
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date, as stamped by form-style callers.
pub fn today_stamp() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Current local date and time, as stamped by tool callers.
pub fn now_stamp() -> String {
    Local::now()
        .format(&format!("{DATE_FORMAT} {TIME_FORMAT}"))
        .to_string()
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` with real calendar and
/// clock values. Anything else would break lexicographic date ordering.
pub fn is_valid_entry_date(value: &str) -> bool {
    let (date_part, time_part) = match value.len() {
        10 => (value, None),
        19 => match (value.get(..10), value.get(10..11), value.get(11..)) {
            (Some(date), Some(" "), Some(time)) => (date, Some(time)),
            _ => return false,
        },
        _ => return false,
    };

    if !looks_like_iso_date(date_part) || NaiveDate::parse_from_str(date_part, DATE_FORMAT).is_err()
    {
        return false;
    }

    match time_part {
        Some(time) => NaiveTime::parse_from_str(time, TIME_FORMAT).is_ok(),
        None => true,
    }
}

fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> ClientResult<NaiveDate> {
    if !looks_like_iso_date(value) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ClientError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    [0usize, 1, 2, 3, 5, 6, 8, 9]
        .iter()
        .all(|index| bytes[*index].is_ascii_digit())
}
