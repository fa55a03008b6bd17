use kasa_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        headline(error).to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if let Some(field) = error.field() {
        lines.push(format!("  Field:    {field}"));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

fn headline(error: &ClientError) -> &'static str {
    if error.is_validation() {
        "That entry was not saved."
    } else if error.is_persistence() {
        "The ledger could not be read or written."
    } else {
        "Something went wrong, but it's easy to fix."
    }
}
