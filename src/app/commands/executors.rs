//! Executor verbs.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::app::AppContext;
use crate::app::commands::OPERATION_COMPLETED;
use crate::app::format::units::format_large_integer;
use crate::app::format::{FormattedTable, L, R};
use crate::domain::AppError;
use crate::domain::cluster::{EXECUTORS_KEY, Executor, decode_collection};
use crate::domain::targets::{EXECUTOR_ATTRIBUTES, validate_attribute};
use crate::ports::{Fetcher, Mutation, Query};

/// Per-name totals over every member running the executor.
#[derive(Debug, Default, PartialEq)]
struct ExecutorSummary {
    members: usize,
    in_progress: i64,
    completed: i64,
    rejected: i64,
    description: String,
}

pub(crate) fn fetch_executors(
    fetcher: &dyn Fetcher,
) -> Result<(Vec<u8>, Vec<Executor>), AppError> {
    let raw = fetcher.query(&Query::Executors)?;
    let executors = decode_collection(&raw, EXECUTORS_KEY)?;
    Ok((raw, executors))
}

fn summarize(executors: &[Executor]) -> BTreeMap<&str, ExecutorSummary> {
    let mut grouped: BTreeMap<&str, ExecutorSummary> = BTreeMap::new();
    for e in executors {
        let summary = grouped.entry(e.name.as_str()).or_default();
        summary.members += 1;
        summary.in_progress += e.tasks_in_progress_count;
        summary.completed += e.tasks_completed_count;
        summary.rejected += e.tasks_rejected_count;
        if summary.description.is_empty() {
            summary.description = e.description.clone();
        }
    }
    grouped
}

pub fn get_executors(ctx: &AppContext) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let (raw, executors) = fetch_executors(fetcher.as_ref())?;
    ctx.output().render(&raw, || {
        let grouped = summarize(&executors);
        let mut out = format!("Total executors: {}\n\n", grouped.len());
        let mut header = vec!["NAME", "MEMBERS", "IN PROGRESS", "COMPLETED", "REJECTED"];
        let mut alignment = vec![L, R, R, R, R];
        if ctx.output().is_wide() {
            header.push("DESCRIPTION");
            alignment.push(L);
        }
        let mut table = FormattedTable::new().with_alignment(&alignment).with_header(&header);
        for (name, s) in grouped {
            let mut row = vec![
                name.to_string(),
                s.members.to_string(),
                format_large_integer(s.in_progress),
                format_large_integer(s.completed),
                format_large_integer(s.rejected),
            ];
            if ctx.output().is_wide() {
                row.push(s.description);
            }
            table.add_row(row)?;
        }
        out.push_str(&table.render());
        Ok(out)
    })
}

pub(crate) fn require_executor<'a>(
    executors: &'a [Executor],
    name: &str,
) -> Result<Vec<&'a Executor>, AppError> {
    let matching: Vec<&Executor> = executors.iter().filter(|e| e.name == name).collect();
    if matching.is_empty() {
        return Err(AppError::not_found(format!("unable to find executor with name '{name}'")));
    }
    Ok(matching)
}

pub fn describe_executor(ctx: &AppContext, name: &str) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let (raw, executors) = fetch_executors(fetcher.as_ref())?;
    let matching = require_executor(&executors, name)?;

    let all: Value = serde_json::from_slice(&raw)?;
    let items: Vec<Value> = all[EXECUTORS_KEY]
        .as_array()
        .map(|items| items.iter().filter(|e| e["name"] == name).cloned().collect())
        .unwrap_or_default();
    ctx.output().render_value(&json!({ EXECUTORS_KEY: items }), || {
        let mut out = format!("Executor: {name}\n\n");
        let mut table = FormattedTable::new()
            .with_alignment(&[L, L, R, R, R, L])
            .with_header(&["MEMBER", "STATE", "IN PROGRESS", "COMPLETED", "REJECTED", "TRACE"]);
        for e in matching {
            table.add_row(vec![
                e.member_id.clone(),
                e.state.clone(),
                format_large_integer(e.tasks_in_progress_count),
                format_large_integer(e.tasks_completed_count),
                format_large_integer(e.tasks_rejected_count),
                e.trace_logging.to_string(),
            ])?;
        }
        out.push_str(&table.render());
        Ok(out)
    })
}

pub fn set_executor(
    ctx: &AppContext,
    name: &str,
    attribute: &str,
    raw_value: &str,
    yes: bool,
) -> Result<String, AppError> {
    let value = validate_attribute(EXECUTOR_ATTRIBUTES, attribute, raw_value)?;
    let fetcher = ctx.fetcher()?;
    let (_, executors) = fetch_executors(fetcher.as_ref())?;
    require_executor(&executors, name)?;
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to set the value of attribute {attribute} to {raw_value} for executor {name}?"
        ),
    )?;
    fetcher.mutate(&Mutation::SetExecutorAttribute {
        executor: name.to_string(),
        attribute: attribute.to_string(),
        value,
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}
