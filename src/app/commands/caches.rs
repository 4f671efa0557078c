//! Cache verbs.

use crate::app::AppContext;
use crate::app::commands::{
    OPERATION_COMPLETED, fetch_services, merge_collections, mutate_nodes, plural, require_service,
};
use crate::app::format::units::{format_bytes, format_large_integer, format_percent};
use crate::app::format::{FormattedTable, L, R};
use crate::domain::cluster::{CACHES_KEY, Cache, CacheMember, MEMBERS_KEY, decode_collection};
use crate::domain::targets::{CACHE_ATTRIBUTES, validate_attribute};
use crate::domain::{AppError, BytesUnit, NodeSelection};
use crate::ports::{CacheOperation, Fetcher, Mutation, Query};

pub fn get_caches(ctx: &AppContext, service: Option<&str>) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let services = fetch_services(fetcher.as_ref(), None)?;
    let names: Vec<String> = match service {
        Some(name) => vec![require_service(&services, name)?.name.clone()],
        None => services.iter().filter(|s| s.is_partitioned()).map(|s| s.name.clone()).collect(),
    };

    let bodies = names
        .iter()
        .map(|name| fetcher.query(&Query::Caches { service: name.clone() }))
        .collect::<Result<Vec<_>, _>>()?;
    let document = merge_collections(&bodies, CACHES_KEY)?;

    ctx.output().render_value(&document, || {
        let mut caches: Vec<Cache> = serde_json::from_value(document[CACHES_KEY].clone())?;
        caches.sort_by(|a, b| (&a.service, &a.name).cmp(&(&b.service, &b.name)));
        caches_table(&caches, ctx.bytes_unit(), ctx.output().is_wide())
    })
}

fn caches_table(caches: &[Cache], unit: BytesUnit, wide: bool) -> Result<String, AppError> {
    let total: i64 = caches.iter().map(|c| c.units_bytes).sum();
    let mut out = format!(
        "Total Caches: {}, Total primary storage: {}\n\n",
        caches.len(),
        format_bytes(total, unit)
    );

    let mut header = vec!["SERVICE", "CACHE", "COUNT", "SIZE"];
    let mut alignment = vec![L, L, R, R];
    if wide {
        header.extend(["PUTS", "GETS", "HITS", "MISSES"]);
        alignment.extend([R, R, R, R]);
    }
    let mut table = FormattedTable::new().with_alignment(&alignment).with_header(&header);
    for c in caches {
        let mut row = vec![
            c.service.clone(),
            c.name.clone(),
            format_large_integer(c.size),
            format_bytes(c.units_bytes, unit),
        ];
        if wide {
            row.extend([
                format_large_integer(c.total_puts),
                format_large_integer(c.total_gets),
                format_large_integer(c.cache_hits),
                format_large_integer(c.cache_misses),
            ]);
        }
        table.add_row(row)?;
    }
    out.push_str(&table.render());
    Ok(out)
}

fn cache_members_query(service: &str, cache: &str) -> Query {
    Query::CacheMembers { service: service.to_string(), cache: cache.to_string() }
}

pub(crate) fn cache_members(
    fetcher: &dyn Fetcher,
    service: &str,
    cache: &str,
) -> Result<Vec<CacheMember>, AppError> {
    decode_cache_members(&fetcher.query(&cache_members_query(service, cache))?, service, cache)
}

fn decode_cache_members(
    body: &[u8],
    service: &str,
    cache: &str,
) -> Result<Vec<CacheMember>, AppError> {
    let mut members: Vec<CacheMember> = decode_collection(body, MEMBERS_KEY)?;
    if members.is_empty() {
        return Err(AppError::not_found(format!(
            "no cache named {cache} exists for service {service}"
        )));
    }
    members.sort_by_key(|m| m.node_id);
    Ok(members)
}

pub fn describe_cache(ctx: &AppContext, service: &str, cache: &str) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let raw = fetcher.query(&cache_members_query(service, cache))?;
    ctx.output().render(&raw, || {
        let members = decode_cache_members(&raw, service, cache)?;
        let unit = ctx.bytes_unit();
        let mut out = format!("Service: {service}\nCache:   {cache}\n\n");
        let mut table = FormattedTable::new()
            .with_alignment(&[R, L, R, R, R, R, R])
            .with_header(&["NODE ID", "TIER", "COUNT", "SIZE", "PUTS", "GETS", "HIT PROB"]);
        for m in members {
            table.add_row(vec![
                m.node_id.to_string(),
                m.tier,
                format_large_integer(m.size),
                format_bytes(m.units_bytes, unit),
                format_large_integer(m.total_puts),
                format_large_integer(m.total_gets),
                format_percent(m.hit_probability),
            ])?;
        }
        out.push_str(&table.render());
        Ok(out)
    })
}

#[derive(Debug, Clone)]
pub struct CacheAttributeChange<'a> {
    pub service: &'a str,
    pub cache: &'a str,
    pub selection: &'a NodeSelection,
    pub attribute: &'a str,
    pub value: &'a str,
}

pub fn set_cache(
    ctx: &AppContext,
    change: &CacheAttributeChange<'_>,
    yes: bool,
) -> Result<String, AppError> {
    let value = validate_attribute(CACHE_ATTRIBUTES, change.attribute, change.value)?;
    let fetcher = ctx.fetcher()?;
    let ids: Vec<i32> = cache_members(fetcher.as_ref(), change.service, change.cache)?
        .iter()
        .filter(|m| m.tier.is_empty() || m.tier == "back")
        .map(|m| m.node_id)
        .collect();
    let nodes = change.selection.resolve(&ids)?;

    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to set the value of attribute {} to {} for cache {} in service {} on {}?",
            change.attribute,
            change.value,
            change.cache,
            change.service,
            plural(nodes.len(), "node")
        ),
    )?;
    mutate_nodes(fetcher.as_ref(), &nodes, |node_id| Mutation::SetCacheAttribute {
        service: change.service.to_string(),
        cache: change.cache.to_string(),
        node_id,
        attribute: change.attribute.to_string(),
        value: value.clone(),
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}

/// Truncate or clear a cache after checking it exists.
pub fn cache_operation(
    ctx: &AppContext,
    service: &str,
    cache: &str,
    operation: CacheOperation,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    cache_members(fetcher.as_ref(), service, cache)?;
    let verb = match operation {
        CacheOperation::Truncate => "truncate",
        CacheOperation::Clear => "clear",
    };
    ctx.confirm(
        yes,
        &format!("Are you sure you want to {verb} cache {cache} in service {service}?"),
    )?;
    fetcher.mutate(&Mutation::Cache {
        service: service.to_string(),
        cache: cache.to_string(),
        operation,
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};

    const SERVICES: &str = r#"{"services":[
        {"name":"DistA","type":"DistributedCache"},
        {"name":"DistB","type":"DistributedCache"},
        {"name":"Proxy","type":"Proxy"}
    ]}"#;

    fn fixture() -> FakeFetcher {
        FakeFetcher::new()
            .with_response(Query::Services, SERVICES)
            .with_response(
                Query::Caches { service: "DistA".into() },
                r#"{"caches":[{"name":"orders","service":"DistA","size":2000,"unitsBytes":2048}]}"#,
            )
            .with_response(
                Query::Caches { service: "DistB".into() },
                r#"{"caches":[{"name":"accounts","service":"DistB","size":10,"unitsBytes":1024}]}"#,
            )
            .with_response(
                Query::CacheMembers { service: "DistA".into(), cache: "orders".into() },
                r#"{"members":[{"nodeId":"2","tier":"back","size":1000},{"nodeId":"1","tier":"back","size":1000},{"nodeId":"3","tier":"front"}]}"#,
            )
    }

    #[test]
    fn caches_are_collected_across_partitioned_services() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_caches(&ctx, None).unwrap();
        assert!(out.starts_with("Total Caches: 2, Total primary storage: 3,072\n"));
        assert!(out.contains("accounts"));
        assert!(out.contains("2,000"));
        assert!(!fetcher.recorded_queries().contains(&Query::Caches { service: "Proxy".into() }));
    }

    #[test]
    fn unknown_service_filter_is_not_found() {
        let (_dir, ctx) = test_context(&fixture());
        assert!(matches!(get_caches(&ctx, Some("Nope")), Err(AppError::NotFound(_))));
    }

    #[test]
    fn describe_cache_queries_the_members_once() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let out = describe_cache(&ctx, "DistA", "orders").unwrap();
        assert!(out.starts_with("Service: DistA\nCache:   orders\n"));
        assert_eq!(
            fetcher.recorded_queries(),
            vec![Query::CacheMembers { service: "DistA".into(), cache: "orders".into() }]
        );
    }

    #[test]
    fn describe_missing_cache_is_not_found() {
        let fetcher = fixture().with_response(
            Query::CacheMembers { service: "DistA".into(), cache: "ghost".into() },
            r#"{"members":[]}"#,
        );
        let (_dir, ctx) = test_context(&fetcher);
        let err = describe_cache(&ctx, "DistA", "ghost").unwrap_err();
        assert_eq!(err.to_string(), "no cache named ghost exists for service DistA");
        assert!(describe_cache(&ctx, "DistA", "orders").unwrap().contains("NODE ID"));
    }

    #[test]
    fn set_cache_skips_front_tier() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let change = CacheAttributeChange {
            service: "DistA",
            cache: "orders",
            selection: &NodeSelection::All,
            attribute: "expiryDelay",
            value: "10",
        };
        set_cache(&ctx, &change, true).unwrap();
        let mut nodes: Vec<i32> = fetcher
            .recorded_mutations()
            .iter()
            .filter_map(|m| match m {
                Mutation::SetCacheAttribute { node_id, .. } => Some(*node_id),
                _ => None,
            })
            .collect();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![1, 2]);
    }

    #[test]
    fn truncate_requires_confirmation() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let err =
            cache_operation(&ctx, "DistA", "orders", CacheOperation::Truncate, false).unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
        cache_operation(&ctx, "DistA", "orders", CacheOperation::Truncate, true).unwrap();
        assert_eq!(fetcher.recorded_mutations().len(), 1);
    }
}
