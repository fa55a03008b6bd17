use std::io;

use serde_json::{Map, Value};

use super::entries_text::entry_table;
use super::format::{self, Align, Column};

const CATEGORY_COLUMNS: [Column<'static>; 2] = [
    Column {
        name: "Category",
        align: Align::Left,
        wraps: true,
    },
    Column {
        name: "Total",
        align: Align::Right,
        wraps: false,
    },
];

pub fn render_report(data: &Value) -> io::Result<String> {
    let mut lines = report_lines(data)?;
    lines.push(String::new());
    lines.push("Narrow the range with `kasa report --from YYYY-MM-DD --to YYYY-MM-DD`.".to_string());
    Ok(lines.join("\n"))
}

pub fn render_watch_snapshot(data: &Value, refreshed_at: &str) -> io::Result<String> {
    let report = data
        .get("report")
        .ok_or_else(|| io::Error::other("watch output requires report"))?;

    let mut lines = vec![format!("Refreshed {refreshed_at}"), String::new()];
    lines.extend(report_lines(report)?);

    let width = format::terminal_width();
    for (label, key) in [
        ("Recent income:", "recent_income"),
        ("Recent expenses:", "recent_expense"),
    ] {
        lines.push(String::new());
        lines.push(label.to_string());
        match data.get(key).and_then(Value::as_array) {
            Some(entries) if !entries.is_empty() => lines.extend(entry_table(entries, width)),
            _ => lines.push("  (none)".to_string()),
        }
    }

    lines.push(String::new());
    lines.push("Press Ctrl-C to stop.".to_string());
    Ok(lines.join("\n"))
}

fn report_lines(data: &Value) -> io::Result<Vec<String>> {
    let range = data
        .get("range_echo")
        .ok_or_else(|| io::Error::other("report output requires range_echo"))?;
    let start = range.get("start").and_then(Value::as_str).unwrap_or("");
    let end = range.get("end").and_then(Value::as_str).unwrap_or("");

    let mut lines = vec![format!("Report for {start} to {end}"), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Total income:", amount_at(data, "total_income")),
            ("Total expense:", amount_at(data, "total_expense")),
            ("Net:", amount_at(data, "net")),
        ],
        2,
    ));

    for (label, key) in [
        ("Income by category:", "income_by_category"),
        ("Expense by category:", "expense_by_category"),
    ] {
        lines.push(String::new());
        lines.push(label.to_string());
        lines.extend(category_lines(data.get(key).and_then(Value::as_object)));
    }

    Ok(lines)
}

fn category_lines(groups: Option<&Map<String, Value>>) -> Vec<String> {
    let Some(groups) = groups.filter(|groups| !groups.is_empty()) else {
        return vec!["  (none)".to_string()];
    };

    let rows = groups
        .iter()
        .map(|(category, total)| {
            vec![
                category.clone(),
                total.as_f64().map(format::format_amount).unwrap_or_default(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    format::render_table(&CATEGORY_COLUMNS, &rows, format::terminal_width())
}

fn amount_at(data: &Value, key: &str) -> String {
    format::format_amount(data.get(key).and_then(Value::as_f64).unwrap_or(0.0))
}
