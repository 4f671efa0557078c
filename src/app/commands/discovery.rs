//! Name service lookups and cluster discovery.

use crate::app::AppContext;
use crate::app::commands::plural;
use crate::app::format::{FormattedTable, L};
use crate::domain::name_service::{
    CLUSTER_FOREIGN_QUERY, CLUSTER_NAME_QUERY, KNOWN_QUERIES, LOCAL_PORTS_QUERY,
    MANAGEMENT_URL_QUERY, foreign_cluster_query, parse_endpoint_pairs, parse_list_result,
};
use crate::domain::{AppError, ConnectionRecord, Endpoint};
use crate::ports::NameServiceLookup;

const NAME_SERVICE_DISCOVERY: &str = "nameservice";

fn endpoints_or_default(endpoints: &[Endpoint]) -> Vec<Endpoint> {
    if endpoints.is_empty() { vec![Endpoint::default()] } else { endpoints.to_vec() }
}

/// Run `query` (default `Cluster/name`) against each endpoint.
///
/// With `ignore` a failing endpoint is logged and skipped.
pub fn nslookup(
    ctx: &AppContext,
    endpoints: &[Endpoint],
    query: Option<&str>,
    ignore: bool,
) -> Result<String, AppError> {
    let query = query.filter(|q| !q.is_empty()).unwrap_or(CLUSTER_NAME_QUERY);
    if !KNOWN_QUERIES.contains(&query) {
        return Err(AppError::invalid(format!(
            "query must be one of {}, not '{query}'",
            KNOWN_QUERIES.join(", ")
        )));
    }
    let endpoints = endpoints_or_default(endpoints);
    let mut out = String::new();
    for endpoint in &endpoints {
        match ctx.name_service().lookup(endpoint, query) {
            Ok(result) => {
                if endpoints.len() > 1 {
                    out.push_str(&format!("{endpoint}: "));
                }
                out.push_str(&result);
                out.push('\n');
            }
            Err(err) if ignore => tracing::warn!(%endpoint, error = %err, "skipping endpoint"),
            Err(err) => return Err(err),
        }
    }
    Ok(out)
}

/// A cluster registered with a name service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredCluster {
    pub cluster_name: String,
    pub name_service: String,
    pub management_url: String,
}

fn first_url(result: &str) -> String {
    parse_list_result(result).into_iter().next().unwrap_or_default()
}

/// Clusters reachable through `endpoint`: the local one plus any foreign ones.
pub fn discover_endpoint(
    lookup: &dyn NameServiceLookup,
    endpoint: &Endpoint,
) -> Result<Vec<DiscoveredCluster>, AppError> {
    let local_name = lookup.lookup(endpoint, CLUSTER_NAME_QUERY)?.trim().to_string();
    if local_name.is_empty() {
        return Ok(Vec::new());
    }
    let mut clusters = vec![DiscoveredCluster {
        cluster_name: local_name,
        name_service: endpoint.to_string(),
        management_url: first_url(&lookup.lookup(endpoint, MANAGEMENT_URL_QUERY)?),
    }];

    for foreign in parse_list_result(&lookup.lookup(endpoint, CLUSTER_FOREIGN_QUERY)?) {
        let ports = lookup.lookup(endpoint, &foreign_cluster_query(&foreign, LOCAL_PORTS_QUERY))?;
        let name_service = parse_endpoint_pairs(&ports)?
            .into_iter()
            .next()
            .map_or_else(|| endpoint.to_string(), |e| e.to_string());
        let urls = lookup.lookup(endpoint, &foreign_cluster_query(&foreign, MANAGEMENT_URL_QUERY))?;
        clusters.push(DiscoveredCluster {
            cluster_name: foreign,
            name_service,
            management_url: first_url(&urls),
        });
    }
    tracing::debug!(%endpoint, count = clusters.len(), "discovered clusters");
    Ok(clusters)
}

/// Discover clusters and add a connection for each one with a management URL.
///
/// Clusters whose name is already a connection are skipped.
pub fn discover_clusters(
    ctx: &mut AppContext,
    endpoints: &[Endpoint],
    ignore: bool,
    yes: bool,
) -> Result<String, AppError> {
    let mut discovered: Vec<DiscoveredCluster> = Vec::new();
    for endpoint in &endpoints_or_default(endpoints) {
        match discover_endpoint(ctx.name_service(), endpoint) {
            Ok(clusters) => {
                for cluster in clusters {
                    if !discovered.iter().any(|c| c.cluster_name == cluster.cluster_name) {
                        discovered.push(cluster);
                    }
                }
            }
            Err(err) if ignore => tracing::warn!(%endpoint, error = %err, "skipping endpoint"),
            Err(err) => return Err(err),
        }
    }
    if discovered.is_empty() {
        return Ok("no clusters discovered\n".to_string());
    }

    let mut table = FormattedTable::new()
        .with_alignment(&[L, L, L])
        .with_header(&["CLUSTER NAME", "NAME SERVICE", "MANAGEMENT URL"]);
    for cluster in &discovered {
        table.add_row(vec![
            cluster.cluster_name.clone(),
            cluster.name_service.clone(),
            cluster.management_url.clone(),
        ])?;
    }
    let mut out = table.render();

    let (addable, unusable): (Vec<_>, Vec<_>) =
        discovered.into_iter().partition(|c| !c.management_url.is_empty());
    for cluster in &unusable {
        out.push_str(&format!(
            "cluster {} has no management URL registered and will not be added\n",
            cluster.cluster_name
        ));
    }
    let (existing, new): (Vec<_>, Vec<_>) = addable
        .into_iter()
        .partition(|c| ctx.store().config().find_cluster(&c.cluster_name).is_some());
    for cluster in &existing {
        out.push_str(&format!(
            "skipping cluster {}, a connection with that name already exists\n",
            cluster.cluster_name
        ));
    }
    if new.is_empty() {
        return Ok(out);
    }

    print!("{out}");
    out.clear();
    ctx.confirm(
        yes,
        &format!("Are you sure you want to add {}?", plural(new.len(), "cluster connection")),
    )?;
    for cluster in new {
        let record = ConnectionRecord {
            discovery_type: NAME_SERVICE_DISCOVERY.to_string(),
            ns_lookup_port: cluster.name_service.clone(),
            cluster_name: cluster.cluster_name.clone(),
            ..ConnectionRecord::http(cluster.cluster_name.clone(), cluster.management_url.clone())
        };
        ctx.store_mut().add_cluster(record)?;
        out.push_str(&format!("added cluster connection {}\n", cluster.cluster_name));
    }
    Ok(out)
}
