use std::io;

use serde_json::Value;

pub fn render_categories(data: &Value) -> io::Result<String> {
    let kind = data.get("kind").and_then(Value::as_str).unwrap_or("entry");
    let suggested = strings_at(data, "suggested")?;
    let used = strings_at(data, "used")?;

    let mut lines = vec![format!("Suggested {kind} categories:")];
    lines.extend(suggested.iter().map(|category| format!("  {category}")));

    let custom = used
        .iter()
        .filter(|category| !suggested.contains(category))
        .collect::<Vec<&&str>>();
    if !custom.is_empty() {
        lines.push(String::new());
        lines.push("Also in use:".to_string());
        lines.extend(custom.iter().map(|category| format!("  {category}")));
    }

    lines.push(String::new());
    lines.push("Any other label is accepted; entries without one are filed under General.".to_string());
    Ok(lines.join("\n"))
}

fn strings_at<'a>(data: &'a Value, key: &str) -> io::Result<Vec<&'a str>> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .ok_or_else(|| io::Error::other(format!("categories output requires {key}")))
}
