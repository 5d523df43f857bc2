use serde_json::Value;

/// A model reply that was asked to be JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonReply {
    /// A JSON object, possibly recovered from inside code fences or prose
    Parsed(Value),
    /// Anything else, trimmed
    Fallback(String),
}

impl JsonReply {
    pub fn parse(raw: &str) -> Self {
        let body = raw
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        if let Some(value) = parse_object(body) {
            return JsonReply::Parsed(value);
        }
        if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
            if start < end {
                if let Some(value) = parse_object(&body[start..=end]) {
                    return JsonReply::Parsed(value);
                }
            }
        }
        JsonReply::Fallback(raw.trim().to_string())
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            JsonReply::Parsed(value) => value.get(key),
            JsonReply::Fallback(_) => None,
        }
    }
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// Render a JSON value as plain text: strings as is, scalars printed, and
/// containers depth-first with leaves joined by a space.
pub fn flatten_value(value: &Value) -> String {
    let mut parts = Vec::new();
    collect_leaves(value, &mut parts);
    parts.join(" ")
}

fn collect_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            if !s.trim().is_empty() {
                out.push(s.trim().to_string());
            }
        }
        Value::Bool(b) => out.push(b.to_string()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
    }
}
