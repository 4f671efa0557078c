//! Reporter verbs.

use serde_json::Value;

use crate::app::AppContext;
use crate::app::commands::{OPERATION_COMPLETED, mutate_nodes, plural};
use crate::app::format::units::format_large_integer;
use crate::app::format::{FormattedTable, L, R, render_pairs};
use crate::domain::cluster::{REPORTERS_KEY, Reporter, decode_collection};
use crate::domain::targets::{REPORTER_ATTRIBUTES, validate_attribute};
use crate::domain::{AppError, NodeSelection};
use crate::ports::{Fetcher, Mutation, Query};

pub(crate) fn fetch_reporters(
    fetcher: &dyn Fetcher,
) -> Result<(Vec<u8>, Vec<Reporter>), AppError> {
    let raw = fetcher.query(&Query::Reporters)?;
    let mut reporters: Vec<Reporter> = decode_collection(&raw, REPORTERS_KEY)?;
    reporters.sort_by_key(|r| r.node_id);
    Ok((raw, reporters))
}

pub(crate) fn reporter_ids(fetcher: &dyn Fetcher) -> Result<Vec<i32>, AppError> {
    Ok(fetch_reporters(fetcher)?.1.iter().map(|r| r.node_id).collect())
}

pub fn get_reporters(ctx: &AppContext) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let (raw, reporters) = fetch_reporters(fetcher.as_ref())?;
    ctx.output().render(&raw, || {
        let mut table = FormattedTable::new()
            .with_alignment(&[R, L, L, L, R, R, L])
            .with_header(&[
                "NODE ID",
                "STATE",
                "CONFIG FILE",
                "OUTPUT PATH",
                "BATCH",
                "INTERVAL",
                "AUTO START",
            ]);
        for r in reporters {
            table.add_row(vec![
                r.node_id.to_string(),
                r.state,
                r.config_file,
                r.output_path,
                format_large_integer(r.current_batch),
                r.interval_seconds.to_string(),
                r.auto_start.to_string(),
            ])?;
        }
        Ok(table.render())
    })
}

pub fn describe_reporter(ctx: &AppContext, node_id: i32) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let (raw, reporters) = fetch_reporters(fetcher.as_ref())?;
    let reporter = reporters
        .into_iter()
        .find(|r| r.node_id == node_id)
        .ok_or_else(|| AppError::not_found(format!("no reporter found for node id {node_id}")))?;

    let all: Value = serde_json::from_slice(&raw)?;
    let item = all[REPORTERS_KEY]
        .as_array()
        .and_then(|items| {
            items.iter().find(|r| match &r["nodeId"] {
                Value::String(s) => s.trim() == node_id.to_string(),
                other => other.as_i64() == Some(i64::from(node_id)),
            })
        })
        .cloned()
        .unwrap_or_default();
    ctx.output().render_value(&item, || {
        Ok(render_pairs(vec![
            ("Node Id".to_string(), reporter.node_id.to_string()),
            ("State".to_string(), reporter.state),
            ("Config File".to_string(), reporter.config_file),
            ("Output Path".to_string(), reporter.output_path),
            ("Interval Seconds".to_string(), reporter.interval_seconds.to_string()),
            ("Current Batch".to_string(), reporter.current_batch.to_string()),
            ("Last Execute Time".to_string(), reporter.last_execute_time.to_string()),
            ("Auto Start".to_string(), reporter.auto_start.to_string()),
        ]))
    })
}

pub fn set_reporter(
    ctx: &AppContext,
    selection: &NodeSelection,
    attribute: &str,
    raw_value: &str,
    yes: bool,
) -> Result<String, AppError> {
    let value = validate_attribute(REPORTER_ATTRIBUTES, attribute, raw_value)?;
    let fetcher = ctx.fetcher()?;
    let nodes = selection.resolve(&reporter_ids(fetcher.as_ref())?)?;
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to set the value of attribute {attribute} to {raw_value} for {}?",
            plural(nodes.len(), "reporter")
        ),
    )?;
    mutate_nodes(fetcher.as_ref(), &nodes, |node_id| Mutation::SetReporterAttribute {
        node_id,
        attribute: attribute.to_string(),
        value: value.clone(),
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}

/// Start or stop the reporter on the selected members.
pub fn toggle_reporter(
    ctx: &AppContext,
    selection: &NodeSelection,
    start: bool,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let nodes = selection.resolve(&reporter_ids(fetcher.as_ref())?)?;
    let verb = if start { "start" } else { "stop" };
    ctx.confirm(
        yes,
        &format!("Are you sure you want to {verb} {}?", plural(nodes.len(), "reporter")),
    )?;
    mutate_nodes(fetcher.as_ref(), &nodes, |node_id| Mutation::Reporter { node_id, start })?;
    Ok(OPERATION_COMPLETED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};

    const REPORTERS: &str = r#"{"reporters":[
        {"nodeId":"2","state":"Stopped","intervalSeconds":60},
        {"nodeId":"1","state":"Running","intervalSeconds":60,"autoStart":true}
    ]}"#;

    fn fixture() -> FakeFetcher {
        FakeFetcher::new().with_response(Query::Reporters, REPORTERS)
    }

    #[test]
    fn reporters_sorted_by_node() {
        let (_dir, ctx) = test_context(&fixture());
        let out = get_reporters(&ctx).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].trim_start().starts_with("1  Running"));
        assert!(lines[2].trim_start().starts_with("2  Stopped"));
    }

    #[test]
    fn describe_reporter_by_node() {
        let (_dir, ctx) = test_context(&fixture());
        let out = describe_reporter(&ctx, 1).unwrap();
        assert!(out.contains("Running"));
        assert!(matches!(describe_reporter(&ctx, 9), Err(AppError::NotFound(_))));
    }

    #[test]
    fn start_all_reporters_fans_out() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        toggle_reporter(&ctx, &NodeSelection::All, true, true).unwrap();
        let mut nodes: Vec<i32> = fetcher
            .recorded_mutations()
            .into_iter()
            .map(|m| match m {
                Mutation::Reporter { node_id, start: true } => node_id,
                other => panic!("unexpected mutation {other:?}"),
            })
            .collect();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![1, 2]);
    }

    #[test]
    fn set_reporter_rejects_unknown_node() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let err =
            set_reporter(&ctx, &"3".parse().unwrap(), "intervalSeconds", "30", true).unwrap_err();
        assert_eq!(err.to_string(), "invalid node id 3");
        set_reporter(&ctx, &"1".parse().unwrap(), "intervalSeconds", "30", true).unwrap();
        assert_eq!(fetcher.recorded_mutations().len(), 1);
    }
}
