use anyhow::Context;
use serde_json::Value;
use std::io::Read;

use crate::cli::OutputFormat;

/// Read a JSON document from stdin
pub fn read_stdin_json() -> anyhow::Result<Value> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read stdin")?;
    if raw.trim().is_empty() {
        anyhow::bail!("expected a JSON document on stdin");
    }
    serde_json::from_str(&raw).context("stdin is not valid JSON")
}

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => println!("✓ {}", message),
    }
    Ok(())
}

/// Output a single document
pub fn output_document(output_format: OutputFormat, data: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => {
            if let Some(map) = data.as_object() {
                for (key, value) in map {
                    let rendered = match value {
                        Value::String(s) => s.clone(),
                        Value::Array(items) => items
                            .iter()
                            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                            .collect::<Vec<_>>()
                            .join(", "),
                        other => other.to_string(),
                    };
                    println!("{:<12} {}", key, rendered);
                }
            } else {
                println!("{}", data);
            }
        }
    }
    Ok(())
}

/// Output a list of documents, one summary line each in text mode
pub fn output_list(output_format: OutputFormat, data: &Value, empty_message: &str) -> anyhow::Result<()> {
    let items = data.as_array().cloned().unwrap_or_default();
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_message);
            }
            for item in &items {
                println!("{}", summary_line(item));
            }
        }
    }
    Ok(())
}

fn summary_line(item: &Value) -> String {
    let field = |name: &str| item.get(name).and_then(Value::as_str).unwrap_or("");
    if item.get("title").is_some() {
        format!("{}  {:<8}  {}  [{}]", field("id"), field("type"), field("title"), field("category"))
    } else {
        format!("{}  {}  (created {})", field("id"), field("name"), field("createdAt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summarizes_resources_and_lockers() {
        let resource = json!({ "id": "r1", "type": "note", "title": "Borrowing", "category": "rust" });
        assert_eq!(summary_line(&resource), "r1  note      Borrowing  [rust]");

        let locker = json!({ "id": "l1", "name": "Exams", "createdAt": "2026-01-01T00:00:00Z" });
        assert_eq!(summary_line(&locker), "l1  Exams  (created 2026-01-01T00:00:00Z)");
    }
}
