//! Persistence coordinators and snapshot lifecycle.

use std::sync::{Mutex, PoisonError};

use serde_json::{Value, json};

use crate::app::AppContext;
use crate::app::commands::{fetch_services, require_service, status_text};
use crate::app::fanout::fan_out;
use crate::app::format::units::{format_bytes, format_latency, format_latency0};
use crate::app::format::{FormattedTable, L, R};
use crate::domain::AppError;
use crate::domain::cluster::{
    PersistenceCoordinator, SNAPSHOTS_KEY, decode_collection, decode_one,
};
use crate::ports::{Fetcher, Mutation, Query, SnapshotOperation};

pub fn get_persistence(ctx: &AppContext) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let mut raw = Vec::new();
    let mut coordinators = Vec::new();
    for service in fetch_services(fetcher.as_ref(), None)?.iter().filter(|s| s.is_partitioned()) {
        let body = fetcher.query(&Query::Persistence { service: service.name.clone() })?;
        let mut coordinator: PersistenceCoordinator = decode_one(&body, "persistence coordinator")?;
        if coordinator.service_name.is_empty() {
            coordinator.service_name = service.name.clone();
        }
        raw.push(serde_json::from_slice::<Value>(&body)?);
        coordinators.push(coordinator);
    }

    ctx.output().render_value(&json!({ "persistence": raw }), || {
        let unit = ctx.bytes_unit();
        let mut table = FormattedTable::new()
            .with_alignment(&[L, L, L, L, R, R, R, R])
            .with_header(&[
                "SERVICE NAME",
                "MODE",
                "STATUS",
                "IDLE",
                "SNAPSHOTS",
                "SPACE USED",
                "AVG LATENCY",
                "MAX LATENCY",
            ]);
        for c in coordinators {
            table.add_row(vec![
                c.service_name,
                c.persistence_mode,
                c.operation_status,
                c.idle.to_string(),
                c.snapshots.len().to_string(),
                format_bytes(c.persistence_active_space_used, unit),
                format_latency(c.persistence_latency_average),
                format_latency0(c.persistence_latency_max as f64),
            ])?;
        }
        Ok(table.render())
    })
}

fn snapshot_query(service: &str, archived: bool) -> Query {
    let service = service.to_string();
    if archived { Query::ArchivedSnapshots { service } } else { Query::Snapshots { service } }
}

fn list_snapshots(
    fetcher: &dyn Fetcher,
    service: &str,
    archived: bool,
) -> Result<Vec<String>, AppError> {
    decode_collection(&fetcher.query(&snapshot_query(service, archived))?, SNAPSHOTS_KEY)
}

/// Snapshots for one service, or every partitioned service, collected concurrently.
pub fn get_snapshots(
    ctx: &AppContext,
    service: Option<&str>,
    archived: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let services = fetch_services(fetcher.as_ref(), None)?;
    let names: Vec<String> = match service {
        Some(name) => vec![require_service(&services, name)?.name.clone()],
        None => services.iter().filter(|s| s.is_partitioned()).map(|s| s.name.clone()).collect(),
    };

    let collected = Mutex::new(Vec::new());
    let fetcher = fetcher.as_ref();
    fan_out(&names, |name| {
        let snapshots = list_snapshots(fetcher, name, archived)?;
        record(&collected, (name.clone(), snapshots));
        Ok(())
    })
    .into_result()?;

    let mut results = collected.into_inner().unwrap_or_else(PoisonError::into_inner);
    results.sort();
    let document = json!({
        "snapshots": results
            .iter()
            .map(|(service, snapshots)| json!({ "service": service, "snapshots": snapshots }))
            .collect::<Vec<_>>()
    });
    ctx.output().render_value(&document, || {
        let title = if archived { "ARCHIVED SNAPSHOTS" } else { "SNAPSHOTS" };
        let mut table =
            FormattedTable::new().with_alignment(&[L, L]).with_header(&["SERVICE", title]);
        for (service, snapshots) in results {
            table.add_row(vec![service, snapshots.join(", ")])?;
        }
        Ok(table.render())
    })
}

/// Push onto a shared result list, keeping entries from tasks that panicked.
fn record<T>(results: &Mutex<Vec<T>>, item: T) {
    results.lock().unwrap_or_else(PoisonError::into_inner).push(item);
}

/// Run a snapshot operation after checking local and archived state.
pub fn snapshot_operation(
    ctx: &AppContext,
    service: &str,
    snapshot: &str,
    operation: SnapshotOperation,
    yes: bool,
) -> Result<String, AppError> {
    if snapshot.trim().is_empty() && operation != SnapshotOperation::ForceRecovery {
        return Err(AppError::invalid("snapshot name must be supplied"));
    }
    let fetcher = ctx.fetcher()?;
    require_service(&fetch_services(fetcher.as_ref(), None)?, service)?;

    let local = || list_snapshots(fetcher.as_ref(), service, false);
    let archived = || list_snapshots(fetcher.as_ref(), service, true);
    let contains = |list: Vec<String>| list.iter().any(|s| s == snapshot);

    match operation {
        SnapshotOperation::Create => {
            if contains(local()?) {
                return Err(AppError::PreconditionFailed(format!(
                    "a snapshot named {snapshot} already exists for service {service}"
                )));
            }
        }
        SnapshotOperation::Recover | SnapshotOperation::Remove | SnapshotOperation::Archive => {
            if !contains(local()?) {
                return Err(AppError::not_found(format!(
                    "a snapshot named {snapshot} does not exist for service {service}"
                )));
            }
        }
        SnapshotOperation::Retrieve => {
            if !contains(archived()?) {
                return Err(AppError::not_found(format!(
                    "an archived snapshot named {snapshot} does not exist for service {service}"
                )));
            }
            if contains(local()?) {
                return Err(AppError::PreconditionFailed(format!(
                    "a local snapshot named {snapshot} already exists for service {service}, remove it before retrieving"
                )));
            }
        }
        SnapshotOperation::RemoveArchived => {
            if !contains(archived()?) {
                return Err(AppError::not_found(format!(
                    "an archived snapshot named {snapshot} does not exist for service {service}"
                )));
            }
        }
        SnapshotOperation::ForceRecovery => {}
    }

    let prompt = match operation {
        SnapshotOperation::ForceRecovery => {
            format!("Are you sure you want to force recovery for service {service}?")
        }
        SnapshotOperation::RemoveArchived => format!(
            "Are you sure you want to remove archived snapshot {snapshot} for service {service}?"
        ),
        other => {
            format!("Are you sure you want to {other} snapshot {snapshot} for service {service}?")
        }
    };
    ctx.confirm(yes, &prompt)?;

    let body = fetcher.mutate(&Mutation::Snapshot {
        service: service.to_string(),
        snapshot: snapshot.to_string(),
        operation,
    })?;
    tracing::info!(service, snapshot, %operation, "snapshot operation submitted");
    Ok(status_text(
        &body,
        &format!("operation {operation} for service {service} has been invoked"),
    ))
}

pub fn force_recovery(ctx: &AppContext, service: &str, yes: bool) -> Result<String, AppError> {
    snapshot_operation(ctx, service, "", SnapshotOperation::ForceRecovery, yes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn poisoned_results_keep_earlier_entries() {
        let results = Arc::new(Mutex::new(vec!["first"]));
        let shared = Arc::clone(&results);
        let _ = thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("task failed while holding the lock");
        })
        .join();
        assert!(results.is_poisoned());

        record(&results, "second");
        let results = Arc::into_inner(results).unwrap().into_inner();
        assert_eq!(results.unwrap_or_else(PoisonError::into_inner), ["first", "second"]);
    }

    const SERVICES: &str = r#"{"services":[
        {"name":"PartitionedCache","type":"DistributedCache"},
        {"name":"Other","type":"DistributedCache"},
        {"name":"Proxy","type":"Proxy"}
    ]}"#;

    fn fixture(local: &str, archived: &str) -> FakeFetcher {
        let svc = || "PartitionedCache".to_string();
        FakeFetcher::new()
            .with_response(Query::Services, SERVICES)
            .with_response(Query::Snapshots { service: svc() }, local)
            .with_response(Query::ArchivedSnapshots { service: svc() }, archived)
            .with_response(Query::Snapshots { service: "Other".into() }, r#"{"snapshots":[]}"#)
    }

    fn run(
        ctx: &AppContext,
        snapshot: &str,
        operation: SnapshotOperation,
    ) -> Result<String, AppError> {
        snapshot_operation(ctx, "PartitionedCache", snapshot, operation, true)
    }

    #[test]
    fn create_refuses_existing_snapshot() {
        let fetcher = fixture(r#"{"snapshots":["snap-1"]}"#, r#"{"snapshots":[]}"#);
        let (_dir, ctx) = test_context(&fetcher);
        let err = run(&ctx, "snap-1", SnapshotOperation::Create).unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));

        let out = run(&ctx, "snap-2", SnapshotOperation::Create).unwrap();
        assert_eq!(out, "ok\n");
    }

    #[test]
    fn recover_requires_local_snapshot() {
        let fetcher = fixture(r#"{"snapshots":[]}"#, r#"{"snapshots":[]}"#);
        let (_dir, ctx) = test_context(&fetcher);
        let err = run(&ctx, "gone", SnapshotOperation::Recover).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fetcher.recorded_mutations().is_empty());
    }

    #[test]
    fn retrieve_checks_archive_and_local() {
        let fetcher = fixture(r#"{"snapshots":["snap"]}"#, r#"{"snapshots":["snap","old"]}"#);
        let (_dir, ctx) = test_context(&fetcher);

        let err = run(&ctx, "snap", SnapshotOperation::Retrieve).unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));

        let err = run(&ctx, "none", SnapshotOperation::Retrieve).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        run(&ctx, "old", SnapshotOperation::Retrieve).unwrap();
        assert_eq!(fetcher.recorded_mutations().len(), 1);
    }

    #[test]
    fn remove_archived_requires_archive() {
        let fetcher = fixture(r#"{"snapshots":["snap"]}"#, r#"{"snapshots":[]}"#);
        let (_dir, ctx) = test_context(&fetcher);
        let err = run(&ctx, "snap", SnapshotOperation::RemoveArchived).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn snapshots_are_listed_per_service() {
        let fetcher = fixture(r#"{"snapshots":["a","b"]}"#, r#"{"snapshots":[]}"#);
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_snapshots(&ctx, None, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("PartitionedCache"));
        assert!(lines[2].trim_end().ends_with("a, b"));
    }

    #[test]
    fn persistence_table_lists_coordinators() {
        let fetcher = FakeFetcher::new()
            .with_response(
                Query::Services,
                r#"{"services":[{"name":"P","type":"DistributedCache"}]}"#,
            )
            .with_response(
                Query::Persistence { service: "P".into() },
                r#"{"persistenceMode":"active","operationStatus":"Idle","idle":true,"snapshots":["x"]}"#,
            );
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_persistence(&ctx).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with("P "));
        assert!(out.contains("active"));
    }

    #[test]
    fn force_recovery_needs_no_snapshot_name() {
        let fetcher = fixture(r#"{"snapshots":[]}"#, r#"{"snapshots":[]}"#);
        let (_dir, ctx) = test_context(&fetcher);
        force_recovery(&ctx, "PartitionedCache", true).unwrap();
        assert!(matches!(
            fetcher.recorded_mutations()[0],
            Mutation::Snapshot { operation: SnapshotOperation::ForceRecovery, .. }
        ));
    }
}
