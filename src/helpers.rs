//! Title formatting for Notion objects

use serde_json::Value;

const UNTITLED: &str = "Untitled";

/// Joins the text of a rich-text array with spaces.
fn join_rich_text(items: &[Value]) -> Option<String> {
    let parts: Vec<&str> = items
        .iter()
        .filter_map(|item| {
            item.pointer("/text/content")
                .or_else(|| item.get("plain_text"))
                .and_then(Value::as_str)
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Title of a database object, `"Untitled"` when it has none.
pub fn format_database_title(database: &Value) -> String {
    database
        .get("title")
        .and_then(Value::as_array)
        .and_then(|title| join_rich_text(title))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Title of a page object, taken from its first non-empty `title` property.
pub fn format_page_title(page: &Value) -> String {
    page.get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|properties| properties.values())
        .filter(|property| property.get("type").and_then(Value::as_str) == Some("title"))
        .find_map(|property| {
            property
                .get("title")
                .and_then(Value::as_array)
                .and_then(|title| join_rich_text(title))
        })
        .unwrap_or_else(|| UNTITLED.to_string())
}
