//! Cluster-wide diagnostic operations.

use crate::app::AppContext;
use crate::app::commands::OPERATION_COMPLETED;
use crate::domain::AppError;
use crate::domain::targets::validate_tracing_ratio;
use crate::ports::Mutation;

fn role_scope(role: Option<&str>) -> String {
    match role {
        Some(role) => format!("members with role {role}"),
        None => "all members".to_string(),
    }
}

fn role_value(role: Option<&str>) -> Option<String> {
    role.filter(|r| !r.is_empty() && *r != "all").map(String::from)
}

pub fn dump_cluster_heap(
    ctx: &AppContext,
    role: Option<&str>,
    yes: bool,
) -> Result<String, AppError> {
    let role = role_value(role);
    let fetcher = ctx.fetcher()?;
    ctx.confirm(
        yes,
        &format!("Are you sure you want to dump the heap for {}?", role_scope(role.as_deref())),
    )?;
    fetcher.mutate(&Mutation::DumpClusterHeap { role })?;
    Ok(OPERATION_COMPLETED.to_string())
}

pub fn log_cluster_state(
    ctx: &AppContext,
    role: Option<&str>,
    yes: bool,
) -> Result<String, AppError> {
    let role = role_value(role);
    let fetcher = ctx.fetcher()?;
    ctx.confirm(
        yes,
        &format!("Are you sure you want to log cluster state for {}?", role_scope(role.as_deref())),
    )?;
    fetcher.mutate(&Mutation::LogClusterState { role })?;
    Ok(OPERATION_COMPLETED.to_string())
}

pub fn configure_tracing(
    ctx: &AppContext,
    role: Option<&str>,
    ratio: f64,
    yes: bool,
) -> Result<String, AppError> {
    let ratio = validate_tracing_ratio(ratio)?;
    let role = role_value(role);
    let fetcher = ctx.fetcher()?;
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to configure tracing to {ratio} for {}?",
            role_scope(role.as_deref())
        ),
    )?;
    fetcher.mutate(&Mutation::ConfigureTracing { role, ratio })?;
    Ok(OPERATION_COMPLETED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};

    #[test]
    fn invalid_ratio_never_reaches_cluster() {
        let fetcher = FakeFetcher::new();
        let (_dir, ctx) = test_context(&fetcher);
        assert!(configure_tracing(&ctx, None, 1.5, true).is_err());
        assert!(configure_tracing(&ctx, None, -0.5, true).is_err());
        assert!(fetcher.recorded_mutations().is_empty());

        configure_tracing(&ctx, Some("storage"), -1.0, true).unwrap();
        assert_eq!(
            fetcher.recorded_mutations(),
            vec![Mutation::ConfigureTracing { role: Some("storage".into()), ratio: -1.0 }]
        );
    }

    #[test]
    fn all_role_means_every_member() {
        let fetcher = FakeFetcher::new();
        let (_dir, ctx) = test_context(&fetcher);
        dump_cluster_heap(&ctx, Some("all"), true).unwrap();
        log_cluster_state(&ctx, Some("proxy"), true).unwrap();
        assert_eq!(
            fetcher.recorded_mutations(),
            vec![
                Mutation::DumpClusterHeap { role: None },
                Mutation::LogClusterState { role: Some("proxy".into()) },
            ]
        );
    }

    #[test]
    fn declined_heap_dump_is_cancelled() {
        let fetcher = FakeFetcher::new();
        let (_dir, ctx) = test_context(&fetcher);
        assert!(matches!(dump_cluster_heap(&ctx, None, false), Err(AppError::Cancelled)));
        assert!(fetcher.recorded_mutations().is_empty());
    }
}
