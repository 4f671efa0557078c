//! Management endpoint port definition.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::domain::{AppError, ConnectionRecord};

/// Elastic data journal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalType {
    Flash,
    Ram,
}

impl JournalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalType::Flash => "flash",
            JournalType::Ram => "ram",
        }
    }
}

impl FromStr for JournalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flash" => Ok(JournalType::Flash),
            "ram" => Ok(JournalType::Ram),
            other => {
                Err(AppError::invalid(format!("journal type must be flash or ram, not '{other}'")))
            }
        }
    }
}

/// Typed read requests.
///
/// Read-many queries return `{"<collection>": [...]}` using the keys in
/// [`crate::domain::cluster`]; read-one queries return the resource document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    ClusterDetails,
    Members,
    SingleMember { node_id: i32 },
    ThreadDump { node_id: i32 },
    Services,
    ServiceDetails { service: String },
    ServiceMembers { service: String },
    Caches { service: String },
    CacheMembers { service: String, cache: String },
    Persistence { service: String },
    Snapshots { service: String },
    ArchivedSnapshots { service: String },
    Reporters,
    Executors,
    Topics { service: String },
    FederationParticipants { service: String },
    ElasticData { journal: JournalType },
    HttpSessions,
    Health,
}

/// Operation on a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOperation {
    Suspend,
    Resume,
    Shutdown,
}

/// Operation on a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOperation {
    Truncate,
    Clear,
}

/// Persistence operation for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOperation {
    Create,
    Recover,
    Remove,
    Archive,
    Retrieve,
    RemoveArchived,
    ForceRecovery,
}

impl fmt::Display for SnapshotOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SnapshotOperation::Create => "create",
            SnapshotOperation::Recover => "recover",
            SnapshotOperation::Remove => "remove",
            SnapshotOperation::Archive => "archive",
            SnapshotOperation::Retrieve => "retrieve",
            SnapshotOperation::RemoveArchived => "remove archived",
            SnapshotOperation::ForceRecovery => "force recovery",
        })
    }
}

/// Flight Recorder diagnostic command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JfrCommand {
    Start,
    Stop,
    Dump,
    Check,
}

impl JfrCommand {
    pub fn operation(&self) -> &'static str {
        match self {
            JfrCommand::Start => "jfrStart",
            JfrCommand::Stop => "jfrStop",
            JfrCommand::Dump => "jfrDump",
            JfrCommand::Check => "jfrCheck",
        }
    }
}

/// Federation operation for a participant (or all participants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederationOperation {
    Start,
    Stop,
    Pause,
    ReplicateAll,
    NotifyPopulated,
}

impl FederationOperation {
    pub fn operation(&self) -> &'static str {
        match self {
            FederationOperation::Start => "start",
            FederationOperation::Stop => "stop",
            FederationOperation::Pause => "pause",
            FederationOperation::ReplicateAll => "replicateAll",
            FederationOperation::NotifyPopulated => "notifyPopulated",
        }
    }
}

/// Entity whose statistics are reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetTarget {
    Member { node_id: i32 },
    Reporter { node_id: i32 },
    Service { service: String, node_id: i32 },
    Cache { service: String, cache: String, node_id: i32 },
    Executor { executor: String },
}

/// Typed mutation requests. Each returns the endpoint's status document.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetMemberAttribute { node_id: i32, attribute: String, value: Value },
    SetServiceAttribute { service: String, node_id: i32, attribute: String, value: Value },
    SetCacheAttribute {
        service: String,
        cache: String,
        node_id: i32,
        attribute: String,
        value: Value,
    },
    SetExecutorAttribute { executor: String, attribute: String, value: Value },
    SetReporterAttribute { node_id: i32, attribute: String, value: Value },
    DumpClusterHeap { role: Option<String> },
    LogClusterState { role: Option<String> },
    ConfigureTracing { role: Option<String>, ratio: f64 },
    ShutdownMember { node_id: i32 },
    Service { service: String, operation: ServiceOperation },
    Cache { service: String, cache: String, operation: CacheOperation },
    Snapshot { service: String, snapshot: String, operation: SnapshotOperation },
    Jfr { command: JfrCommand, node_id: Option<i32>, role: Option<String>, options: String },
    Reporter { node_id: i32, start: bool },
    Federation { service: String, participant: Option<String>, operation: FederationOperation },
    Subscriber { service: String, topic: String, subscriber: i64, connect: bool },
    CompactElasticData { journal: JournalType, node_id: i32 },
    ResetStatistics { target: ResetTarget },
}

/// Port for the cluster management endpoint.
///
/// Methods return raw response bytes so callers may print them verbatim,
/// project them with JSONPath or decode them into the domain model.
pub trait Fetcher: Send + Sync {
    fn query(&self, query: &Query) -> Result<Vec<u8>, AppError>;

    fn mutate(&self, mutation: &Mutation) -> Result<Vec<u8>, AppError>;

    /// Fetch the named platform fragments for a member.
    ///
    /// An empty `selection` returns every fragment the member advertises.
    fn extended_member_info(
        &self,
        node_id: i32,
        selection: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>, AppError>;
}

/// Builds a fetcher for a stored connection.
pub trait FetcherFactory {
    fn create(&self, connection: &ConnectionRecord) -> Result<Box<dyn Fetcher>, AppError>;
}
