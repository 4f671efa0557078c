//! Service verbs.

use crate::app::AppContext;
use crate::app::commands::{
    OPERATION_COMPLETED, combine, decode_services, fetch_services, filter_collection, mutate_nodes,
    plural, require_service,
};
use crate::app::format::units::format_latency;
use crate::app::format::{FormattedTable, L, R, format_json_for_describe};
use crate::domain::cluster::{
    MEMBERS_KEY, SERVICES_KEY, Service, ServiceMember, decode_collection,
};
use crate::domain::targets::{SERVICE_ATTRIBUTES, validate_attribute};
use crate::domain::{AppError, NodeSelection};
use crate::ports::{Mutation, Query, ServiceOperation};

const SERVICE_PRIMARY_LABELS: &[&str] = &["name", "type", "statusHA", "memberCount"];

pub fn get_services(ctx: &AppContext, service_type: Option<&str>) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let raw = fetcher.query(&Query::Services)?;
    let document = filter_collection(&raw, SERVICES_KEY, "type", service_type)?;
    ctx.output().render_value(&document, || {
        let services = decode_services(&raw, service_type)?;
        services_table(&services, ctx.output().is_wide())
    })
}

pub(crate) fn services_table(services: &[Service], wide: bool) -> Result<String, AppError> {
    let mut header = vec!["SERVICE NAME", "TYPE", "MEMBERS", "STATUS HA", "STORAGE", "PARTITIONS"];
    let mut alignment = vec![L, L, R, L, R, R];
    if wide {
        header.extend(["ENDANGERED", "VULNERABLE", "UNBALANCED", "PENDING", "QUORUM"]);
        alignment.extend([R, R, R, R, L]);
    }
    let mut table = FormattedTable::new().with_alignment(&alignment).with_header(&header);
    for s in services {
        let partitioned = s.is_partitioned();
        let or_na = |value: i64| if partitioned { value.to_string() } else { "n/a".to_string() };
        let mut row = vec![
            s.name.clone(),
            s.service_type.clone(),
            s.member_count.to_string(),
            if partitioned { s.status_ha.clone() } else { "n/a".to_string() },
            or_na(s.storage_enabled_count.into()),
            or_na(s.partitions_all.into()),
        ];
        if wide {
            row.extend([
                or_na(s.partitions_endangered.into()),
                or_na(s.partitions_vulnerable.into()),
                or_na(s.partitions_unbalanced.into()),
                s.request_pending_count.to_string(),
                s.quorum_status.clone(),
            ]);
        }
        table.add_row(row)?;
    }
    Ok(table.render())
}

pub fn describe_service(ctx: &AppContext, service: &str) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let details = fetcher.query(&Query::ServiceDetails { service: service.to_string() })?;
    let members = fetcher.query(&Query::ServiceMembers { service: service.to_string() })?;
    let document = combine(vec![("service", &details), ("members", &members)])?;

    ctx.output().render_value(&document, || {
        let mut out = String::from("SERVICE DETAILS\n---------------\n");
        out.push_str(&format_json_for_describe(&details, SERVICE_PRIMARY_LABELS)?);
        out.push_str("\nSERVICE MEMBERS\n---------------\n");
        let mut rows: Vec<ServiceMember> = decode_collection(&members, MEMBERS_KEY)?;
        rows.sort_by_key(|m| m.node_id);
        let mut table = FormattedTable::new()
            .with_alignment(&[R, R, R, R, R, R, R, L])
            .with_header(&[
                "NODE ID", "THREADS", "MIN", "MAX", "BACKLOG", "PRIMARY", "REQ AVG", "STATUS HA",
            ]);
        for m in rows {
            table.add_row(vec![
                m.node_id.to_string(),
                m.thread_count.to_string(),
                m.thread_count_min.to_string(),
                m.thread_count_max.to_string(),
                m.task_backlog.to_string(),
                m.owned_partitions_primary.to_string(),
                format_latency(m.request_average_duration),
                m.status_ha,
            ])?;
        }
        out.push_str(&table.render());
        Ok(out)
    })
}

pub fn set_service(
    ctx: &AppContext,
    service: &str,
    selection: &NodeSelection,
    attribute: &str,
    raw_value: &str,
    yes: bool,
) -> Result<String, AppError> {
    let value = validate_attribute(SERVICE_ATTRIBUTES, attribute, raw_value)?;
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
            "Are you sure you want to set the value of attribute {attribute} to {raw_value} for {} of service {service}?",
            plural(nodes.len(), "node")
        ),
    )?;
    mutate_nodes(fetcher.as_ref(), &nodes, |node_id| Mutation::SetServiceAttribute {
        service: service.to_string(),
        node_id,
        attribute: attribute.to_string(),
        value: value.clone(),
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}

pub fn service_operation(
    ctx: &AppContext,
    service: &str,
    operation: ServiceOperation,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    require_service(&fetch_services(fetcher.as_ref(), None)?, service)?;
    let verb = match operation {
        ServiceOperation::Suspend => "suspend",
        ServiceOperation::Resume => "resume",
        ServiceOperation::Shutdown => "shutdown",
    };
    ctx.confirm(yes, &format!("Are you sure you want to {verb} service {service}?"))?;
    fetcher.mutate(&Mutation::Service { service: service.to_string(), operation })?;
    Ok(format!("operation {verb} for service {service} completed\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::GlobalOptions;
    use crate::app::output::OutputFormat;
    use crate::testing::{FakeFetcher, FakeNameService, test_context, test_context_with};

    const SERVICES: &str = r#"{"services":[
        {"name":"PartitionedCache","type":"DistributedCache","statusHA":"NODE-SAFE","memberCount":3,"storageEnabledCount":3,"partitionsAll":257},
        {"name":"Proxy","type":"Proxy","memberCount":2}
    ]}"#;

    #[test]
    fn table_marks_non_partitioned_values() {
        let fetcher = FakeFetcher::new().with_response(Query::Services, SERVICES);
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_services(&ctx, None).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].starts_with("PartitionedCache"));
        assert!(lines[1].contains("NODE-SAFE"));
        assert!(lines[2].starts_with("Proxy"));
        assert!(lines[2].contains("n/a"));

        let only_proxy = get_services(&ctx, Some("Proxy")).unwrap();
        assert_eq!(only_proxy.lines().count(), 2);
    }

    #[test]
    fn get_services_queries_the_cluster_once() {
        let fetcher = FakeFetcher::new().with_response(Query::Services, SERVICES);
        let (_dir, ctx) = test_context(&fetcher);
        get_services(&ctx, None).unwrap();
        assert_eq!(fetcher.recorded_queries(), vec![Query::Services]);
    }

    #[test]
    fn type_filter_applies_to_jsonpath_output() {
        let fetcher = FakeFetcher::new().with_response(Query::Services, SERVICES);
        let options = GlobalOptions {
            output: "jsonpath=$.services[*].name".parse::<OutputFormat>().unwrap(),
            ..GlobalOptions::default()
        };
        let (_dir, ctx) = test_context_with(&fetcher, FakeNameService::new(), options);
        assert_eq!(get_services(&ctx, Some("Proxy")).unwrap(), "[\"Proxy\"]\n");
    }

    #[test]
    fn unknown_service_is_not_found() {
        let fetcher = FakeFetcher::new().with_response(Query::Services, SERVICES);
        let (_dir, ctx) = test_context(&fetcher);
        let err = service_operation(&ctx, "Nope", ServiceOperation::Suspend, true).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn suspend_posts_operation() {
        let fetcher = FakeFetcher::new().with_response(Query::Services, SERVICES);
        let (_dir, ctx) = test_context(&fetcher);
        service_operation(&ctx, "PartitionedCache", ServiceOperation::Suspend, true).unwrap();
        assert_eq!(
            fetcher.recorded_mutations(),
            vec![Mutation::Service {
                service: "PartitionedCache".into(),
                operation: ServiceOperation::Suspend
            }]
        );
    }

    #[test]
    fn set_service_targets_service_members() {
        let fetcher = FakeFetcher::new()
            .with_response(Query::Services, SERVICES)
            .with_response(
                Query::ServiceMembers { service: "PartitionedCache".into() },
                r#"{"members":[{"nodeId":"1"},{"nodeId":"3"}]}"#,
            );
        let (_dir, ctx) = test_context(&fetcher);
        set_service(&ctx, "PartitionedCache", &NodeSelection::All, "threadCount", "4", true).unwrap();
        assert_eq!(fetcher.recorded_mutations().len(), 2);

        let err = set_service(&ctx, "PartitionedCache", &"2".parse().unwrap(), "threadCount", "4", true)
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid node id 2");
    }

    #[test]
    fn describe_service_shows_members() {
        let fetcher = FakeFetcher::new()
            .with_response(
                Query::ServiceDetails { service: "S".into() },
                r#"{"name":"S","type":"DistributedCache"}"#,
            )
            .with_response(
                Query::ServiceMembers { service: "S".into() },
                r#"{"members":[{"nodeId":"2","threadCount":4}]}"#,
            );
        let (_dir, ctx) = test_context(&fetcher);
        let out = describe_service(&ctx, "S").unwrap();
        assert!(out.contains("SERVICE MEMBERS"));
        assert!(out.contains("Type"));
    }
}
