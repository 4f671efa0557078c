use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::domain::{AppError, ConnectionRecord};
use crate::ports::{Fetcher, FetcherFactory, Mutation, Query, ResetTarget};

/// Fixture-driven fetcher. Unknown queries answer 404; every mutation is recorded.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    responses: Arc<Mutex<HashMap<Query, Vec<u8>>>>,
    extended: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    failing_nodes: Arc<Mutex<HashSet<i32>>>,
    pub mutations: Arc<Mutex<Vec<Mutation>>>,
    pub queries: Arc<Mutex<Vec<Query>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, query: Query, body: &str) -> Self {
        self.responses.lock().unwrap().insert(query, body.as_bytes().to_vec());
        self
    }

    /// Members response with the given node ids.
    pub fn with_members(self, ids: &[i32]) -> Self {
        let members: Vec<String> = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"nodeId":"{id}","memberName":"member-{id}","roleName":"storage","machineName":"host{id}","unicastAddress":"10.0.0.{id}","unicastPort":7000,"memoryMaxMB":1024,"memoryAvailableMB":512,"loggingLevel":6}}"#
                )
            })
            .collect();
        self.with_response(Query::Members, &format!(r#"{{"members":[{}]}}"#, members.join(",")))
    }

    pub fn with_extended(self, name: &str, body: &str) -> Self {
        self.extended.lock().unwrap().insert(name.to_string(), body.as_bytes().to_vec());
        self
    }

    /// Mutations addressed to `node_id` fail with a transport error.
    pub fn failing_node(self, node_id: i32) -> Self {
        self.failing_nodes.lock().unwrap().insert(node_id);
        self
    }

    pub fn recorded_mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn recorded_queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }
}

fn target_node(mutation: &Mutation) -> Option<i32> {
    match mutation {
        Mutation::SetMemberAttribute { node_id, .. }
        | Mutation::SetServiceAttribute { node_id, .. }
        | Mutation::SetCacheAttribute { node_id, .. }
        | Mutation::SetReporterAttribute { node_id, .. }
        | Mutation::ShutdownMember { node_id }
        | Mutation::Reporter { node_id, .. }
        | Mutation::CompactElasticData { node_id, .. } => Some(*node_id),
        Mutation::Jfr { node_id, .. } => *node_id,
        Mutation::ResetStatistics { target } => match target {
            ResetTarget::Member { node_id }
            | ResetTarget::Reporter { node_id }
            | ResetTarget::Service { node_id, .. }
            | ResetTarget::Cache { node_id, .. } => Some(*node_id),
            ResetTarget::Executor { .. } => None,
        },
        _ => None,
    }
}

impl Fetcher for FakeFetcher {
    fn query(&self, query: &Query) -> Result<Vec<u8>, AppError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Query::ThreadDump { node_id } = query {
            if self.failing_nodes.lock().unwrap().contains(node_id) {
                return Err(AppError::Transport(format!("node {node_id} unreachable")));
            }
        }
        self.responses.lock().unwrap().get(query).cloned().ok_or_else(|| {
            AppError::RemoteRejected { status: 404, body: format!("no fixture for {query:?}") }
        })
    }

    fn mutate(&self, mutation: &Mutation) -> Result<Vec<u8>, AppError> {
        self.mutations.lock().unwrap().push(mutation.clone());
        if let Some(node_id) = target_node(mutation) {
            if self.failing_nodes.lock().unwrap().contains(&node_id) {
                return Err(AppError::Transport(format!("node {node_id} unreachable")));
            }
        }
        Ok(br#"{"status":"ok"}"#.to_vec())
    }

    fn extended_member_info(
        &self,
        _node_id: i32,
        selection: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>, AppError> {
        let extended = self.extended.lock().unwrap();
        if let Some(unknown) = selection.iter().find(|name| !extended.contains_key(*name)) {
            return Err(AppError::invalid(format!("extended info '{unknown}' is not available")));
        }
        Ok(extended
            .iter()
            .filter(|(name, _)| selection.is_empty() || selection.contains(name))
            .map(|(name, body)| (name.clone(), body.clone()))
            .collect())
    }
}

/// Hands out clones of one [`FakeFetcher`] and records the connections used.
pub struct FakeFetcherFactory {
    pub fetcher: FakeFetcher,
    pub connections: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcherFactory {
    pub fn new(fetcher: FakeFetcher) -> Self {
        Self { fetcher, connections: Arc::new(Mutex::new(vec![])) }
    }
}

impl FetcherFactory for FakeFetcherFactory {
    fn create(&self, connection: &ConnectionRecord) -> Result<Box<dyn Fetcher>, AppError> {
        self.connections.lock().unwrap().push(connection.name.clone());
        Ok(Box::new(self.fetcher.clone()))
    }
}
