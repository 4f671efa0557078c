//! Verb handlers. Each returns the text to print; mutating handlers confirm first.

pub mod caches;
pub mod cluster;
pub mod contexts;
pub mod diagnostics;
pub mod discovery;
pub mod elastic_data;
pub mod executors;
pub mod federation;
pub mod health;
pub mod http_sessions;
pub mod jfr;
pub mod members;
pub mod persistence;
pub mod preferences;
pub mod proxies;
pub mod reporters;
pub mod reset;
pub mod services;
pub mod thread_dumps;
pub mod topics;
pub mod version;

use serde_json::Value;

use crate::app::fanout::fan_out;
use crate::domain::cluster::{
    MEMBERS_KEY, Member, SERVICES_KEY, Service, StatusDocument, decode_collection,
};
use crate::domain::AppError;
use crate::ports::{Fetcher, Mutation, Query};

pub(crate) const OPERATION_COMPLETED: &str = "operation completed\n";

/// Members sorted by node id.
pub(crate) fn fetch_members(fetcher: &dyn Fetcher) -> Result<Vec<Member>, AppError> {
    decode_members(&fetcher.query(&Query::Members)?)
}

pub(crate) fn decode_members(body: &[u8]) -> Result<Vec<Member>, AppError> {
    let mut members: Vec<Member> = decode_collection(body, MEMBERS_KEY)?;
    members.sort_by_key(|m| m.node_id);
    Ok(members)
}

pub(crate) fn member_ids(fetcher: &dyn Fetcher) -> Result<Vec<i32>, AppError> {
    Ok(fetch_members(fetcher)?.iter().map(|m| m.node_id).collect())
}

/// Services sorted by name, optionally restricted to one service type.
pub(crate) fn fetch_services(
    fetcher: &dyn Fetcher,
    service_type: Option<&str>,
) -> Result<Vec<Service>, AppError> {
    decode_services(&fetcher.query(&Query::Services)?, service_type)
}

pub(crate) fn decode_services(
    body: &[u8],
    service_type: Option<&str>,
) -> Result<Vec<Service>, AppError> {
    let mut services: Vec<Service> = decode_collection(body, SERVICES_KEY)?;
    if let Some(kind) = service_type {
        services.retain(|s| s.service_type == kind);
    }
    services.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(services)
}

pub(crate) fn require_service<'a>(
    services: &'a [Service],
    name: &str,
) -> Result<&'a Service, AppError> {
    services
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| AppError::not_found(format!("unable to find service with name '{name}'")))
}

/// Apply a per-node mutation to every node concurrently.
pub(crate) fn mutate_nodes<F>(
    fetcher: &dyn Fetcher,
    nodes: &[i32],
    build: F,
) -> Result<(), AppError>
where
    F: Fn(i32) -> Mutation + Sync,
{
    fan_out(nodes, |node_id| fetcher.mutate(&build(*node_id)).map(|_| ())).into_result()
}

/// Text of a status document, or `fallback` when the response carries none.
pub(crate) fn status_text(body: &[u8], fallback: &str) -> String {
    let status =
        serde_json::from_slice::<StatusDocument>(body).map(|d| d.status).unwrap_or_default();
    let mut text = if status.trim().is_empty() { fallback.to_string() } else { status };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// The collection response with its `key` items restricted to those whose `field` is `wanted`.
pub(crate) fn filter_collection(
    body: &[u8],
    key: &str,
    field: &str,
    wanted: Option<&str>,
) -> Result<Value, AppError> {
    let mut value: Value = serde_json::from_slice(body)?;
    if let (Some(wanted), Some(Value::Array(items))) = (wanted, value.get_mut(key)) {
        items.retain(|item| item.get(field).and_then(Value::as_str) == Some(wanted));
    }
    Ok(value)
}

/// Combine several responses into one JSON document for json/jsonpath output.
pub(crate) fn combine(parts: Vec<(&str, &[u8])>) -> Result<Value, AppError> {
    let mut object = serde_json::Map::new();
    for (key, body) in parts {
        object.insert(key.to_string(), serde_json::from_slice(body)?);
    }
    Ok(Value::Object(object))
}

/// Concatenate the `key` arrays of several normalized collection responses.
pub(crate) fn merge_collections(bodies: &[Vec<u8>], key: &str) -> Result<Value, AppError> {
    let mut merged = Vec::new();
    for body in bodies {
        let value: Value = serde_json::from_slice(body)?;
        if let Some(Value::Array(items)) = value.get(key) {
            merged.extend(items.iter().cloned());
        }
    }
    Ok(serde_json::json!({ key: merged }))
}

/// `n item(s)` phrasing used in confirmation prompts.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 { format!("{count} {noun}") } else { format!("{count} {noun}s") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_falls_back() {
        assert_eq!(status_text(br#"{"status":"Started"}"#, "done"), "Started\n");
        assert_eq!(status_text(b"{}", "done"), "done\n");
        assert_eq!(status_text(b"not json", "done"), "done\n");
    }

    #[test]
    fn collections_are_merged() {
        let bodies = vec![br#"{"caches":[{"name":"a"}]}"#.to_vec(), br#"{"caches":[{"name":"b"}]}"#.to_vec()];
        let merged = merge_collections(&bodies, "caches").unwrap();
        assert_eq!(merged["caches"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn plural_phrasing() {
        assert_eq!(plural(1, "node"), "1 node");
        assert_eq!(plural(3, "node"), "3 nodes");
    }
}
