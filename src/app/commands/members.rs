//! Member verbs: get, describe, set and shutdown.

use crate::app::AppContext;
use crate::app::commands::{
    OPERATION_COMPLETED, combine, decode_members, filter_collection, member_ids, mutate_nodes,
    plural,
};
use crate::app::format::describe::format_fragments;
use crate::app::format::units::{format_megabytes, format_percent};
use crate::app::format::{FormattedTable, L, R, format_json_for_describe};
use crate::domain::cluster::{MEMBERS_KEY, Member};
use crate::domain::targets::{MEMBER_ATTRIBUTES, validate_attribute};
use crate::domain::{AppError, BytesUnit, NodeSelection};
use crate::ports::{Mutation, Query};

const MEMBER_PRIMARY_LABELS: &[&str] =
    &["nodeId", "memberName", "roleName", "machineName", "rackName", "siteName", "unicastAddress"];

/// Which extended platform fragments `describe member` should include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedInfo {
    None,
    All,
    Named(Vec<String>),
}

impl std::str::FromStr for ExtendedInfo {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(ExtendedInfo::None),
            "all" => Ok(ExtendedInfo::All),
            list => Ok(ExtendedInfo::Named(
                list.split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from)
                    .collect(),
            )),
        }
    }
}

pub fn get_members(ctx: &AppContext, role: Option<&str>) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let raw = fetcher.query(&Query::Members)?;
    let document = filter_collection(&raw, MEMBERS_KEY, "roleName", role)?;
    ctx.output().render_value(&document, || {
        let mut members = decode_members(&raw)?;
        if let Some(role) = role {
            members.retain(|m| m.role_name == role);
        }
        members_summary(&members, ctx.bytes_unit(), ctx.output().is_wide())
    })
}

/// Heap totals followed by the members table.
pub(crate) fn members_summary(
    members: &[Member],
    unit: BytesUnit,
    wide: bool,
) -> Result<String, AppError> {
    let total: i64 = members.iter().map(|m| m.memory_max_mb).sum();
    let used: i64 = members.iter().map(Member::memory_used_mb).sum();
    let mut out = format!(
        "Total cluster members: {}\nCluster Heap - Total: {} Used: {} Available: {}\n\n",
        members.len(),
        format_megabytes(total, unit),
        format_megabytes(used, unit),
        format_megabytes(total - used, unit),
    );
    out.push_str(&members_table(members, unit, wide)?);
    Ok(out)
}

pub(crate) fn members_table(
    members: &[Member],
    unit: BytesUnit,
    wide: bool,
) -> Result<String, AppError> {
    let mut header = vec![
        "NODE ID", "ADDRESS", "PORT", "PROCESS", "MEMBER", "ROLE", "MAX HEAP", "USED HEAP",
        "AVAIL HEAP",
    ];
    let mut alignment = vec![R, L, R, R, L, L, R, R, R];
    if wide {
        header.extend(["MACHINE", "RACK", "SITE", "PUBLISHER", "RECEIVER"]);
        alignment.extend([L, L, L, R, R]);
    }

    let mut table = FormattedTable::new().with_alignment(&alignment).with_header(&header);
    for m in members {
        let mut row = vec![
            m.node_id.to_string(),
            m.unicast_address.clone(),
            m.unicast_port.to_string(),
            m.process_name.clone(),
            m.member_name.clone(),
            m.role_name.clone(),
            format_megabytes(m.memory_max_mb, unit),
            format_megabytes(m.memory_used_mb(), unit),
            format_megabytes(m.memory_available_mb, unit),
        ];
        if wide {
            row.extend([
                m.machine_name.clone(),
                m.rack_name.clone(),
                m.site_name.clone(),
                format_percent(m.publisher_success_rate),
                format_percent(m.receiver_success_rate),
            ]);
        }
        table.add_row(row)?;
    }
    Ok(table.render())
}

pub fn describe_member(
    ctx: &AppContext,
    node_id: i32,
    extended: &ExtendedInfo,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let member = fetcher.query(&Query::SingleMember { node_id })?;
    let fragments = match extended {
        ExtendedInfo::None => Default::default(),
        ExtendedInfo::All => fetcher.extended_member_info(node_id, &[])?,
        ExtendedInfo::Named(names) => fetcher.extended_member_info(node_id, names)?,
    };

    let mut parts: Vec<(&str, &[u8])> = vec![("member", member.as_slice())];
    parts.extend(fragments.iter().map(|(name, body)| (name.as_str(), body.as_slice())));
    let document = combine(parts)?;
    ctx.output().render_value(&document, || {
        let mut out = String::from("MEMBER DETAILS\n--------------\n");
        out.push_str(&format_json_for_describe(&member, MEMBER_PRIMARY_LABELS)?);
        out.push_str(&format_fragments(&fragments)?);
        Ok(out)
    })
}

/// Set an attribute on the selected members concurrently.
pub fn set_member(
    ctx: &AppContext,
    selection: &NodeSelection,
    attribute: &str,
    raw_value: &str,
    yes: bool,
) -> Result<String, AppError> {
    let value = validate_attribute(MEMBER_ATTRIBUTES, attribute, raw_value)?;
    let fetcher = ctx.fetcher()?;
    let nodes = selection.resolve(&member_ids(fetcher.as_ref())?)?;

    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to set the value of attribute {attribute} to {raw_value} for {}?",
            plural(nodes.len(), "node")
        ),
    )?;

    mutate_nodes(fetcher.as_ref(), &nodes, |node_id| Mutation::SetMemberAttribute {
        node_id,
        attribute: attribute.to_string(),
        value: value.clone(),
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}

pub fn shutdown_member(ctx: &AppContext, node_id: i32, yes: bool) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    NodeSelection::Ids(vec![node_id]).resolve(&member_ids(fetcher.as_ref())?)?;
    ctx.confirm(yes, &format!("Are you sure you want to shutdown member {node_id}?"))?;
    fetcher.mutate(&Mutation::ShutdownMember { node_id })?;
    Ok(OPERATION_COMPLETED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::GlobalOptions;
    use crate::app::output::OutputFormat;
    use crate::testing::{FakeFetcher, FakeNameService, test_context, test_context_with};
    use serde_json::{Value, json};

    #[test]
    fn set_member_all_fans_out_and_reports_single_failure() {
        let fetcher = FakeFetcher::new().with_members(&[1, 2, 3]).failing_node(2);
        let (_dir, ctx) = test_context(&fetcher);

        let err = set_member(&ctx, &NodeSelection::All, "loggingLevel", "3", true).unwrap_err();
        assert!(matches!(&err, AppError::Transport(m) if m.contains("node 2")));
        assert_eq!(err.exit_code(), 1);

        let mut nodes: Vec<i32> = fetcher
            .recorded_mutations()
            .into_iter()
            .map(|m| match m {
                Mutation::SetMemberAttribute { node_id, attribute, value } => {
                    assert_eq!(attribute, "loggingLevel");
                    assert_eq!(value, json!(3));
                    node_id
                }
                other => panic!("unexpected mutation {other:?}"),
            })
            .collect();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![1, 2, 3]);
    }

    #[test]
    fn set_member_rejects_unknown_node_and_attribute() {
        let fetcher = FakeFetcher::new().with_members(&[1, 2]);
        let (_dir, ctx) = test_context(&fetcher);

        let err = set_member(&ctx, &"7".parse().unwrap(), "loggingLevel", "3", true).unwrap_err();
        assert_eq!(err.to_string(), "invalid node id 7");

        let err = set_member(&ctx, &NodeSelection::All, "bogus", "3", true).unwrap_err();
        assert!(err.to_string().contains("valid values are"));
        assert!(fetcher.recorded_mutations().is_empty());
    }

    #[test]
    fn declined_confirmation_cancels() {
        let fetcher = FakeFetcher::new().with_members(&[1]);
        let (_dir, ctx) = test_context(&fetcher);
        let err = shutdown_member(&ctx, 1, false).unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
        assert!(fetcher.recorded_mutations().is_empty());
    }

    #[test]
    fn get_members_renders_table() {
        let fetcher = FakeFetcher::new().with_members(&[2, 1]);
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_members(&ctx, None).unwrap();
        assert!(out.starts_with("Total cluster members: 2\n"));
        let rows: Vec<&str> = out.lines().skip(3).collect();
        assert!(rows[0].starts_with("NODE ID"));
        assert!(rows[1].trim_start().starts_with("1  10.0.0.1"));
        assert!(rows[2].trim_start().starts_with("2  10.0.0.2"));
    }

    #[test]
    fn get_members_queries_the_cluster_once() {
        let fetcher = FakeFetcher::new().with_members(&[1, 2]);
        let (_dir, ctx) = test_context(&fetcher);
        get_members(&ctx, Some("storage")).unwrap();
        assert_eq!(fetcher.recorded_queries(), vec![Query::Members]);
    }

    #[test]
    fn role_filter_applies_to_json_output() {
        let fetcher = FakeFetcher::new().with_response(
            Query::Members,
            r#"{"members":[{"nodeId":"1","roleName":"proxy"},{"nodeId":"2","roleName":"storage"}]}"#,
        );
        let options = GlobalOptions { output: OutputFormat::Json, ..GlobalOptions::default() };
        let (_dir, ctx) = test_context_with(&fetcher, FakeNameService::new(), options);

        let out = get_members(&ctx, Some("storage")).unwrap();
        let out: Value = serde_json::from_str(&out).unwrap();
        let members = out["members"].as_array().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["nodeId"], "2");
    }

    #[test]
    fn describe_member_includes_selected_fragments() {
        let fetcher = FakeFetcher::new()
            .with_response(Query::SingleMember { node_id: 1 }, r#"{"nodeId":"1","memberName":"m1"}"#)
            .with_extended("operatingSystem", r#"{"availableProcessors":8}"#)
            .with_extended("runtime", r#"{"uptime":10}"#);
        let (_dir, ctx) = test_context(&fetcher);

        let out = describe_member(&ctx, 1, &"operatingSystem".parse().unwrap()).unwrap();
        assert!(out.contains("Node Id"));
        assert!(out.contains("Operating System"));
        assert!(out.contains("Available Processors"));
        assert!(!out.contains("Uptime"));

        let out = describe_member(&ctx, 1, &ExtendedInfo::None).unwrap();
        assert!(!out.contains("Operating System"));
    }

    #[test]
    fn extended_info_parsing() {
        assert_eq!("none".parse::<ExtendedInfo>().unwrap(), ExtendedInfo::None);
        assert_eq!("all".parse::<ExtendedInfo>().unwrap(), ExtendedInfo::All);
        assert_eq!(
            "a, b".parse::<ExtendedInfo>().unwrap(),
            ExtendedInfo::Named(vec!["a".into(), "b".into()])
        );
    }
}
