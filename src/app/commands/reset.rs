//! `reset` statistics verbs.

use crate::app::AppContext;
use crate::app::commands::caches::cache_members;
use crate::app::commands::executors::{fetch_executors, require_executor};
use crate::app::commands::reporters::reporter_ids;
use crate::app::commands::{
    OPERATION_COMPLETED, fetch_services, member_ids, mutate_nodes, plural, require_service,
};
use crate::domain::cluster::{
    ClusterDetails, MEMBERS_KEY, ServiceMember, decode_collection, decode_one,
};
use crate::domain::{AppError, NodeSelection, Version};
use crate::ports::{Fetcher, Mutation, Query, ResetTarget};

/// Grid editions from this release onward can reset executor statistics.
const EXECUTOR_RESET_MIN: &str = "22.06";
/// Commercial 14.1.1 patch level carrying the same support.
const EXECUTOR_RESET_MIN_14: &str = "14.1.1.2206";

/// Whether a cluster running `version` accepts an executor statistics reset.
pub fn supports_executor_reset(version: &str) -> bool {
    let (Some(version), Some(modern)) = (Version::parse(version), Version::parse("15")) else {
        return false;
    };
    let minimum = if version >= modern { EXECUTOR_RESET_MIN } else { EXECUTOR_RESET_MIN_14 };
    Version::parse(minimum).is_some_and(|minimum| version >= minimum)
}

fn reset_nodes<F>(fetcher: &dyn Fetcher, nodes: &[i32], target: F) -> Result<String, AppError>
where
    F: Fn(i32) -> ResetTarget + Sync,
{
    mutate_nodes(fetcher, nodes, |node_id| Mutation::ResetStatistics { target: target(node_id) })?;
    Ok(OPERATION_COMPLETED.to_string())
}

pub fn reset_member_stats(
    ctx: &AppContext,
    selection: &NodeSelection,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let nodes = selection.resolve(&member_ids(fetcher.as_ref())?)?;
    ctx.confirm(
        yes,
        &format!("Are you sure you want to reset statistics for {}?", plural(nodes.len(), "member")),
    )?;
    reset_nodes(fetcher.as_ref(), &nodes, |node_id| ResetTarget::Member { node_id })
}

pub fn reset_reporter_stats(
    ctx: &AppContext,
    selection: &NodeSelection,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let nodes = selection.resolve(&reporter_ids(fetcher.as_ref())?)?;
    ctx.confirm(
        yes,
        &format!("Are you sure you want to reset statistics for {}?", plural(nodes.len(), "reporter")),
    )?;
    reset_nodes(fetcher.as_ref(), &nodes, |node_id| ResetTarget::Reporter { node_id })
}

pub fn reset_service_stats(
    ctx: &AppContext,
    service: &str,
    selection: &NodeSelection,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    require_service(&fetch_services(fetcher.as_ref(), None)?, service)?;
    let members: Vec<ServiceMember> = decode_collection(
        &fetcher.query(&Query::ServiceMembers { service: service.to_string() })?,
        MEMBERS_KEY,
    )?;
    let ids: Vec<i32> = members.iter().map(|m| m.node_id).collect();
    let nodes = selection.resolve(&ids)?;
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to reset statistics for service {service} on {}?",
            plural(nodes.len(), "node")
        ),
    )?;
    reset_nodes(fetcher.as_ref(), &nodes, |node_id| ResetTarget::Service {
        service: service.to_string(),
        node_id,
    })
}

pub fn reset_cache_stats(
    ctx: &AppContext,
    service: &str,
    cache: &str,
    selection: &NodeSelection,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let members = cache_members(fetcher.as_ref(), service, cache)?;
    let mut ids: Vec<i32> = members.iter().map(|m| m.node_id).collect();
    ids.dedup();
    let nodes = selection.resolve(&ids)?;
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to reset statistics for cache {cache} of service {service} on {}?",
            plural(nodes.len(), "node")
        ),
    )?;
    reset_nodes(fetcher.as_ref(), &nodes, |node_id| ResetTarget::Cache {
        service: service.to_string(),
        cache: cache.to_string(),
        node_id,
    })
}

pub fn reset_executor_stats(ctx: &AppContext, name: &str, yes: bool) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let details: ClusterDetails =
        decode_one(&fetcher.query(&Query::ClusterDetails)?, "cluster details")?;
    if !supports_executor_reset(&details.version) {
        return Err(AppError::PreconditionFailed(format!(
            "resetting executor statistics is only available in versions {EXECUTOR_RESET_MIN}+ or {EXECUTOR_RESET_MIN_14}+, cluster is running {}",
            details.version
        )));
    }
    let (_, executors) = fetch_executors(fetcher.as_ref())?;
    require_executor(&executors, name)?;
    ctx.confirm(yes, &format!("Are you sure you want to reset statistics for executor {name}?"))?;
    fetcher.mutate(&Mutation::ResetStatistics {
        target: ResetTarget::Executor { executor: name.to_string() },
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}
