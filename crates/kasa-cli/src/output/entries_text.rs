use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

const ENTRY_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "ID",
        align: Align::Right,
        wraps: false,
    },
    Column {
        name: "Date",
        align: Align::Left,
        wraps: false,
    },
    Column {
        name: "Description",
        align: Align::Left,
        wraps: true,
    },
    Column {
        name: "Category",
        align: Align::Left,
        wraps: true,
    },
    Column {
        name: "Amount",
        align: Align::Right,
        wraps: false,
    },
];

pub fn render_entry_added(data: &Value) -> io::Result<String> {
    let kind = get_string(data, "kind").unwrap_or("entry");
    let entry = data
        .get("entry")
        .ok_or_else(|| io::Error::other("entry add output requires entry"))?;

    let mut lines = vec![format!("Saved {kind} entry."), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("ID:", display_id(entry)),
            ("Date:", get_string(entry, "date").unwrap_or("").to_string()),
            (
                "Description:",
                get_string(entry, "description").unwrap_or("").to_string(),
            ),
            (
                "Category:",
                get_string(entry, "category").unwrap_or("").to_string(),
            ),
            ("Amount:", display_amount(entry)),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push(format!("See all {kind} entries with `kasa {kind} list`."));
    Ok(lines.join("\n"))
}

pub fn render_entry_list(data: &Value) -> io::Result<String> {
    let kind = get_string(data, "kind").unwrap_or("entry");
    let entries = data
        .get("entries")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("entry list output requires entries"))?;
    let category = get_string(data, "category");

    if entries.is_empty() {
        let scope = match category {
            Some(value) => format!(" in category `{value}`"),
            None => String::new(),
        };
        return Ok(format!(
            "No {kind} entries{scope} yet.\n\nAdd one with `kasa {kind} add --description <text> --amount <amount>`."
        ));
    }

    let heading = match category {
        Some(value) => format!("{kind} entries in `{value}`, newest first ({}):", entries.len()),
        None => format!("{kind} entries, newest first ({}):", entries.len()),
    };
    let mut lines = vec![capitalize(&heading), String::new()];
    lines.extend(entry_table(entries, format::terminal_width()));
    Ok(lines.join("\n"))
}

/// Table rows for a slice of serialized ledger entries.
pub fn entry_table(entries: &[Value], max_width: usize) -> Vec<String> {
    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                display_id(entry),
                get_string(entry, "date").unwrap_or("").to_string(),
                get_string(entry, "description").unwrap_or("").to_string(),
                get_string(entry, "category").unwrap_or("").to_string(),
                display_amount(entry),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    format::render_table(&ENTRY_COLUMNS, &rows, max_width)
}

fn display_id(entry: &Value) -> String {
    entry
        .get("id")
        .and_then(Value::as_i64)
        .map(|id| id.to_string())
        .unwrap_or_default()
}

fn display_amount(entry: &Value) -> String {
    entry
        .get("amount")
        .and_then(Value::as_f64)
        .map(format::format_amount)
        .unwrap_or_default()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn get_string<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
