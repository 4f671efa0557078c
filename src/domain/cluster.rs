//! Domain records decoded from management endpoint responses.
//!
//! Every read-many response is normalized by the fetcher into an object whose
//! single top-level key names the collection (`{"members": [...]}`); the
//! `*_KEY` constants below name those keys.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::AppError;

pub const MEMBERS_KEY: &str = "members";
pub const SERVICES_KEY: &str = "services";
pub const CACHES_KEY: &str = "caches";
pub const SNAPSHOTS_KEY: &str = "snapshots";
pub const REPORTERS_KEY: &str = "reporters";
pub const EXECUTORS_KEY: &str = "executors";
pub const TOPICS_KEY: &str = "topics";
pub const PARTICIPANTS_KEY: &str = "participants";
pub const JOURNALS_KEY: &str = "journals";
pub const SESSIONS_KEY: &str = "sessions";
pub const HEALTH_KEY: &str = "health";

/// Service type reported for partitioned caches.
pub const DISTRIBUTED_SERVICE: &str = "DistributedCache";
/// Service type reported for federated caches.
pub const FEDERATED_SERVICE: &str = "FederatedCache";
/// Service type reported for proxy services.
pub const PROXY_SERVICE: &str = "Proxy";
/// Service type reported for paged topics.
pub const PAGED_TOPIC_SERVICE: &str = "PagedTopic";

/// Decode a normalized collection response into typed records.
pub fn decode_collection<T: DeserializeOwned>(bytes: &[u8], key: &str) -> Result<Vec<T>, AppError> {
    let mut value: Value = serde_json::from_slice(bytes)?;
    match value.get_mut(key).map(Value::take) {
        Some(items) => serde_json::from_value(items).map_err(|e| AppError::parse(key, e)),
        None => Err(AppError::parse(key, format!("response has no '{key}' array"))),
    }
}

/// Decode a single-resource response.
pub fn decode_one<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T, AppError> {
    serde_json::from_slice(bytes).map_err(|e| AppError::parse(what, e))
}

/// Node ids arrive as strings from some endpoints and numbers from others.
fn node_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterDetails {
    pub cluster_name: String,
    pub version: String,
    pub cluster_size: i32,
    pub running: bool,
    pub license_mode: String,
    pub edition: String,
    pub local_member_id: i32,
    pub members_departure_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    pub unicast_address: String,
    pub unicast_port: i32,
    pub process_name: String,
    pub member_name: String,
    pub role_name: String,
    pub machine_name: String,
    pub rack_name: String,
    pub site_name: String,
    #[serde(rename = "memoryMaxMB")]
    pub memory_max_mb: i64,
    #[serde(rename = "memoryAvailableMB")]
    pub memory_available_mb: i64,
    pub logging_level: i32,
    pub publisher_success_rate: f64,
    pub receiver_success_rate: f64,
    pub tracing_sampling_ratio: f64,
}

impl Member {
    pub fn memory_used_mb(&self) -> i64 {
        self.memory_max_mb - self.memory_available_mb
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "statusHA")]
    pub status_ha: String,
    pub member_count: i32,
    pub storage_enabled_count: i32,
    pub partitions_all: i32,
    pub partitions_endangered: i32,
    pub partitions_vulnerable: i32,
    pub partitions_unbalanced: i32,
    pub request_pending_count: i64,
    pub quorum_status: String,
}

impl Service {
    pub fn is_partitioned(&self) -> bool {
        self.service_type == DISTRIBUTED_SERVICE || self.service_type == FEDERATED_SERVICE
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceMember {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    pub thread_count: i32,
    pub thread_count_min: i32,
    pub thread_count_max: i32,
    pub task_backlog: i64,
    pub owned_partitions_primary: i32,
    pub owned_partitions_backup: i32,
    pub request_average_duration: f64,
    #[serde(rename = "statusHA")]
    pub status_ha: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Proxy {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    #[serde(rename = "hostIP")]
    pub host_ip: String,
    pub protocol: String,
    pub connection_count: i64,
    pub outgoing_message_backlog: i64,
    pub total_bytes_received: i64,
    pub total_bytes_sent: i64,
    pub total_messages_received: i64,
    pub total_messages_sent: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cache {
    pub name: String,
    pub service: String,
    pub size: i64,
    pub units_bytes: i64,
    pub total_puts: i64,
    pub total_gets: i64,
    pub cache_hits: i64,
    pub cache_misses: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheMember {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    pub tier: String,
    pub size: i64,
    pub units_bytes: i64,
    pub total_puts: i64,
    pub total_gets: i64,
    pub cache_hits: i64,
    pub cache_misses: i64,
    pub hit_probability: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistenceCoordinator {
    pub service_name: String,
    pub persistence_mode: String,
    pub operation_status: String,
    pub idle: bool,
    pub snapshots: Vec<String>,
    pub persistence_active_space_used: i64,
    pub persistence_latency_average: f64,
    pub persistence_latency_max: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reporter {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    pub state: String,
    pub output_path: String,
    pub config_file: String,
    pub interval_seconds: i64,
    pub current_batch: i64,
    pub last_execute_time: i64,
    pub auto_start: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Executor {
    pub name: String,
    pub member_id: String,
    pub description: String,
    pub state: String,
    pub tasks_completed_count: i64,
    pub tasks_rejected_count: i64,
    pub tasks_in_progress_count: i64,
    pub trace_logging: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Topic {
    pub name: String,
    pub service: String,
    pub channel_count: i32,
    pub published_count: i64,
    pub subscriber_count: i32,
    pub subscriber_group_count: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FederationParticipant {
    pub participant_name: String,
    pub service_name: String,
    pub state: String,
    pub status: String,
    pub total_bytes_sent: i64,
    pub total_msg_sent: i64,
    pub replicate_all_percent_complete: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Journal {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    pub file_count: i32,
    pub total_data_size: i64,
    pub max_file_size: i64,
    pub compaction_count: i64,
    pub exhaustive_compaction_count: i64,
    pub highest_load_factor: f64,
    pub current_collector_load_factor: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpSession {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    pub app_id: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub session_cache_name: String,
    pub session_timeout: i64,
    pub session_average_size: i64,
    pub session_updates: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthCheck {
    #[serde(deserialize_with = "node_id")]
    pub node_id: i32,
    pub name: String,
    pub sub_type: String,
    pub started: bool,
    pub live: bool,
    pub ready: bool,
    pub safe: bool,
}

impl HealthCheck {
    pub fn is_healthy(&self) -> bool {
        self.started && self.live && self.ready && self.safe
    }
}

/// Status document returned by diagnostic commands such as JFR operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusDocument {
    pub status: String,
}
