//! Proxy service connections.

use crate::app::AppContext;
use crate::app::commands::{fetch_services, merge_collections};
use crate::app::format::units::{format_bytes, format_large_integer};
use crate::app::format::{FormattedTable, L, R};
use crate::domain::AppError;
use crate::domain::cluster::{MEMBERS_KEY, PROXY_SERVICE, Proxy, decode_collection};
use crate::ports::Query;

/// Proxy members across every proxy service, or `protocol` only when given.
pub fn get_proxies(ctx: &AppContext, protocol: Option<&str>) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let services = fetch_services(fetcher.as_ref(), Some(PROXY_SERVICE))?;
    let mut rows: Vec<(String, Proxy)> = Vec::new();
    let mut bodies = Vec::new();
    for service in &services {
        let body = fetcher.query(&Query::ServiceMembers { service: service.name.clone() })?;
        let members: Vec<Proxy> = decode_collection(&body, MEMBERS_KEY)?;
        rows.extend(members.into_iter().map(|m| (service.name.clone(), m)));
        bodies.push(body);
    }
    if let Some(protocol) = protocol {
        rows.retain(|(_, p)| p.protocol.eq_ignore_ascii_case(protocol));
    }
    rows.sort_by(|(a, pa), (b, pb)| (a, pa.node_id).cmp(&(b, pb.node_id)));
    let document = merge_collections(&bodies, MEMBERS_KEY)?;

    ctx.output().render_value(&document, || {
        let unit = ctx.bytes_unit();
        let mut table = FormattedTable::new()
            .with_alignment(&[L, R, L, L, R, R, R, R])
            .with_header(&[
                "SERVICE",
                "NODE ID",
                "HOST IP",
                "PROTOCOL",
                "CONNECTIONS",
                "BACKLOG",
                "BYTES SENT",
                "BYTES REC",
            ]);
        for (service, p) in rows {
            table.add_row(vec![
                service,
                p.node_id.to_string(),
                p.host_ip,
                p.protocol,
                format_large_integer(p.connection_count),
                format_large_integer(p.outgoing_message_backlog),
                format_bytes(p.total_bytes_sent, unit),
                format_bytes(p.total_bytes_received, unit),
            ])?;
        }
        Ok(table.render())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};

    fn fixture() -> FakeFetcher {
        FakeFetcher::new()
            .with_response(
                Query::Services,
                r#"{"services":[{"name":"Proxy","type":"Proxy"},{"name":"Dist","type":"DistributedCache"}]}"#,
            )
            .with_response(
                Query::ServiceMembers { service: "Proxy".into() },
                r#"{"members":[
                    {"nodeId":"2","hostIP":"10.0.0.2:20000","protocol":"tcp","connectionCount":3},
                    {"nodeId":"1","hostIP":"10.0.0.1:8080","protocol":"http","connectionCount":1}
                ]}"#,
            )
    }

    #[test]
    fn lists_proxy_members() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_proxies(&ctx, None).unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().nth(1).unwrap().contains("10.0.0.1:8080"));
        let dist = Query::ServiceMembers { service: "Dist".into() };
        assert!(!fetcher.recorded_queries().contains(&dist));
    }

    #[test]
    fn filters_by_protocol() {
        let (_dir, ctx) = test_context(&fixture());
        let out = get_proxies(&ctx, Some("tcp")).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("20000"));
    }
}
