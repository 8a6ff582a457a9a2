//! Property value builders
//!
//! Construct the JSON property values Notion expects in page create and
//! update bodies.

use serde_json::{json, Value};

/// Rich-text property.
pub fn text(content: &str) -> Value {
    json!({"rich_text": [{"text": {"content": content}}]})
}

pub fn title(content: &str) -> Value {
    json!({"title": [{"text": {"content": content}}]})
}

pub fn number(value: f64) -> Value {
    json!({ "number": value })
}

pub fn checkbox(checked: bool) -> Value {
    json!({ "checkbox": checked })
}

pub fn select(option: &str) -> Value {
    json!({"select": {"name": option}})
}

pub fn multi_select<S: AsRef<str>>(options: &[S]) -> Value {
    let options: Vec<Value> = options
        .iter()
        .map(|option| json!({"name": option.as_ref()}))
        .collect();
    json!({ "multi_select": options })
}

/// Date or date range. Dates are ISO 8601 strings (`2026-01-10`).
pub fn date(start: &str, end: Option<&str>) -> Value {
    let mut date = json!({ "start": start });
    if let Some(end) = end.filter(|e| !e.is_empty()) {
        date["end"] = json!(end);
    }
    json!({ "date": date })
}

pub fn url(url: &str) -> Value {
    json!({ "url": url })
}

pub fn email(email: &str) -> Value {
    json!({ "email": email })
}

pub fn phone(phone: &str) -> Value {
    json!({ "phone_number": phone })
}

/// Relation to the given pages.
pub fn relation<S: AsRef<str>>(page_ids: &[S]) -> Value {
    let ids: Vec<Value> = page_ids
        .iter()
        .map(|id| json!({"id": id.as_ref()}))
        .collect();
    json!({ "relation": ids })
}
