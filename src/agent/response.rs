use serde_json::Value;

/// Extract the assistant's text from a responses API body.
///
/// Tries `output_text`, then the `output` list (text parts of message items,
/// or the first item as-is), then falls back to the JSON rendering.
pub fn extract_output_text(response: &Value) -> String {
    if let Some(text) = response.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    match response.get("output") {
        Some(Value::Array(items)) if !items.is_empty() => {
            let texts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("content").and_then(Value::as_array))
                .flatten()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();

            if !texts.is_empty() {
                return texts.join("\n");
            }
            render(&items[0])
        }
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => render(response),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
