//! Cache Key Scheme
//!
//! Maps a logical read onto a partition-local key:
//! - plain fetches use the resource id unchanged
//! - parametrized fetches append `:` and a canonical JSON encoding of the
//!   parameters, so every cached page of a listing shares the `id:` prefix
//! - unfiltered list endpoints use [`ALL_SENTINEL`]

use std::fmt::Write;

use serde_json::Value;

/// Key of an unfiltered "list everything" read within a partition.
pub const ALL_SENTINEL: &str = "__all__";

/// Separates a resource id from its parameter encoding.
pub const PARAM_SEPARATOR: char = ':';

/// Key for a plain resource fetch.
pub fn resource_key(id: &str) -> String {
    id.to_string()
}

/// Key for a fetch of `id` qualified by a parameter set.
pub fn parametrized_key(id: &str, params: &Value) -> String {
    let mut key = children_prefix(id);
    write_canonical(&mut key, params);
    key
}

/// Prefix shared by every parametrized key of `id`.
pub fn children_prefix(id: &str) -> String {
    format!("{id}{PARAM_SEPARATOR}")
}

/// Serializes `value` with object keys sorted at every depth.
///
/// Arrays keep their order: sort lists and compound filters are ordered.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}", Value::String(key.clone()));
                out.push(':');
                write_canonical(out, &map[key.as_str()]);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}
