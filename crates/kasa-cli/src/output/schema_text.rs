use std::io;

use serde_json::Value;

use super::format;

pub fn render_schema_summary(data: &Value) -> io::Result<String> {
    let db_path = get_string(data, "db_path").unwrap_or("unknown");
    let schema_version = get_string(data, "schema_version").unwrap_or("unknown");
    let tables = data
        .get("tables")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("schema summary requires tables"))?;
    let range = data.get("data_range");
    let earliest = range
        .and_then(|value| get_string(value, "earliest"))
        .unwrap_or("no entries yet");
    let latest = range
        .and_then(|value| get_string(value, "latest"))
        .unwrap_or("no entries yet");

    let mut lines = vec![
        "Your ledger is a local SQLite file and can be read with sqlite3 or any SQL client."
            .to_string(),
        String::new(),
        "Summary:".to_string(),
    ];
    lines.extend(format::key_value_rows(
        &[
            ("Database path:", db_path.to_string()),
            ("Schema version:", schema_version.to_string()),
            ("Earliest date:", earliest.to_string()),
            ("Latest date:", latest.to_string()),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Tables:".to_string());
    for table in tables {
        let name = get_string(table, "name").unwrap_or("unknown");
        let kind = get_string(table, "kind").unwrap_or("unknown");
        lines.push(String::new());
        lines.push(format!("Table: {name} ({kind})"));
        lines.extend(format::key_value_rows(
            &[
                ("Columns:", join_strings(table.get("columns"))),
                ("Suggested categories:", join_strings(table.get("suggested_categories"))),
            ],
            2,
        ));
    }

    lines.push(String::new());
    lines.push("Example query:".to_string());
    lines.push(format!(
        "  sqlite3 \"{db_path}\" \"SELECT * FROM expense_entries ORDER BY date DESC LIMIT 5;\""
    ));

    Ok(lines.join("\n"))
}

fn join_strings(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn get_string<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
