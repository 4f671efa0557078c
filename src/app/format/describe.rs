//! Label/value "describe" blocks built from JSON documents.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::AppError;

/// Keys that carry navigation links rather than data.
const IGNORED_KEYS: &[&str] = &["links"];

/// Rewrite a camel-case identifier as a Title Case label.
///
/// Runs of two or more capitals are kept together as acronyms, so
/// `multicastTTL` becomes `Multicast TTL` and `UUID` is unchanged.
/// The rewrite is idempotent.
pub fn create_camel_case_label(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut label = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
            continue;
        }
        if c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                label.push(' ');
            }
        }
        label.push(c);
    }
    label
}

/// Render `json` as aligned `Label : value` lines.
///
/// Nested objects are flattened with dotted keys. Keys listed in `primary`
/// are emitted first in that order; the rest follow in key order.
pub fn format_json_for_describe(json: &[u8], primary: &[&str]) -> Result<String, AppError> {
    let value: Value = serde_json::from_slice(json)?;
    let Value::Object(object) = value else {
        return Err(AppError::parse("describe document", "expected a JSON object"));
    };
    let mut flat = BTreeMap::new();
    flatten(&object, "", &mut flat);
    Ok(render_pairs(order_pairs(flat, primary)))
}

/// Render each fragment as its own titled describe block.
pub fn format_fragments(fragments: &BTreeMap<String, Vec<u8>>) -> Result<String, AppError> {
    let mut out = String::new();
    for (name, body) in fragments {
        let title = create_camel_case_label(name);
        out.push('\n');
        out.push_str(&title);
        out.push('\n');
        out.push_str(&"-".repeat(title.chars().count()));
        out.push('\n');
        out.push_str(&format_json_for_describe(body, &[])?);
    }
    Ok(out)
}

/// Align pre-labelled pairs on the colon.
pub fn render_pairs(pairs: Vec<(String, String)>) -> String {
    let width = pairs.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    pairs.into_iter().map(|(label, value)| format!("{label:<width$} : {value}\n")).collect()
}

fn order_pairs(mut flat: BTreeMap<String, String>, primary: &[&str]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(flat.len());
    for key in primary {
        if let Some(value) = flat.remove(*key) {
            pairs.push((label_for_key(key), value));
        }
    }
    pairs.extend(flat.into_iter().map(|(key, value)| (label_for_key(&key), value)));
    pairs
}

fn label_for_key(key: &str) -> String {
    key.split('.').map(create_camel_case_label).collect::<Vec<_>>().join(" ")
}

fn flatten(object: &Map<String, Value>, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (key, value) in object {
        if IGNORED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match value {
            Value::Object(inner) => flatten(inner, &path, out),
            other => {
                out.insert(path, scalar_text(other));
            }
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            items.iter().map(scalar_text).collect::<Vec<_>>().join(", ")
        }
        Value::Object(_) => value.to_string(),
        other => other.to_string(),
    }
}
