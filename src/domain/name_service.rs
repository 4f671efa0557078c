//! Name service query forms and result parsing.

use std::fmt;
use std::str::FromStr;

use crate::domain::AppError;

/// Default cluster port when an endpoint omits one.
pub const DEFAULT_NAME_SERVICE_PORT: u16 = 7574;
/// Host used when no endpoint is supplied.
pub const DEFAULT_NAME_SERVICE_HOST: &str = "localhost";

pub const CLUSTER_NAME_QUERY: &str = "Cluster/name";
pub const CLUSTER_INFO_QUERY: &str = "Cluster/info";
pub const CLUSTER_FOREIGN_QUERY: &str = "NameService/string/Cluster/foreign";
pub const MANAGEMENT_URL_QUERY: &str = "NameService/string/management/HTTPManagementURL";
pub const METRICS_URL_QUERY: &str = "NameService/string/metrics/HTTPMetricsURL";
pub const JMX_URL_QUERY: &str = "NameService/string/management/JMXServiceURL";
pub const LOCAL_PORTS_QUERY: &str = "NameService/string/NameService/localPorts";

/// Queries accepted by `nslookup -q`.
pub const KNOWN_QUERIES: &[&str] = &[
    CLUSTER_NAME_QUERY,
    CLUSTER_INFO_QUERY,
    CLUSTER_FOREIGN_QUERY,
    MANAGEMENT_URL_QUERY,
    METRICS_URL_QUERY,
    JMX_URL_QUERY,
    LOCAL_PORTS_QUERY,
];

/// Query a foreign cluster's registration through this cluster's name service.
pub fn foreign_cluster_query(cluster: &str, query: &str) -> String {
    let suffix = query.strip_prefix("NameService/string/").unwrap_or(query);
    format!("NameService/string/Cluster/foreign/{cluster}/NameService/string/{suffix}")
}

/// A `host:port` name service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self { host: DEFAULT_NAME_SERVICE_HOST.to_string(), port: DEFAULT_NAME_SERVICE_PORT }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Endpoint::default());
        }
        match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| AppError::invalid(format!("invalid port in endpoint {s}")))?;
                let host = if host.is_empty() { DEFAULT_NAME_SERVICE_HOST } else { host };
                Ok(Endpoint { host: host.to_string(), port })
            }
            None => Ok(Endpoint { host: s.to_string(), port: DEFAULT_NAME_SERVICE_PORT }),
        }
    }
}

/// Split a bracketed list result such as `[a, b, c]` into its elements.
pub fn parse_list_result(result: &str) -> Vec<String> {
    let trimmed = result.trim();
    let inner = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')).unwrap_or(trimmed);
    inner.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Parse a `[host, port, host, port]` result into endpoints.
pub fn parse_endpoint_pairs(result: &str) -> Result<Vec<Endpoint>, AppError> {
    let items = parse_list_result(result);
    if items.len() % 2 != 0 {
        return Err(AppError::parse("name service result", format!("unpaired entry in {result}")));
    }
    items
        .chunks(2)
        .map(|pair| {
            let port = pair[1].parse::<u16>().map_err(|e| AppError::parse("port", e))?;
            Ok(Endpoint { host: pair[0].clone(), port })
        })
        .collect()
}
