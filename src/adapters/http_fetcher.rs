//! Management endpoint client implementation using reqwest.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::Once;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use url::Url;

use crate::domain::cluster::{
    CACHES_KEY, EXECUTORS_KEY, HEALTH_KEY, JOURNALS_KEY, MEMBERS_KEY, PARTICIPANTS_KEY,
    REPORTERS_KEY, SERVICES_KEY, SESSIONS_KEY, SNAPSHOTS_KEY, TOPICS_KEY,
};
use crate::domain::config::HTTP_CONNECTION;
use crate::domain::{AppError, ConnectionRecord};
use crate::ports::{
    CacheOperation, Fetcher, FetcherFactory, Mutation, Query, ResetTarget, ServiceOperation,
    SnapshotOperation,
};

const PLATFORM_BOOKKEEPING_LINKS: &[&str] = &["self", "parent", "canonical"];

static INSECURE_WARNING: Once = Once::new();

/// Transport settings derived from user preferences.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub ignore_invalid_certs: bool,
}

impl HttpSettings {
    pub fn new(timeout_secs: i32, ignore_invalid_certs: bool) -> Self {
        let secs = u64::try_from(timeout_secs).ok().filter(|s| *s > 0).unwrap_or(30);
        Self { timeout: Duration::from_secs(secs), ignore_invalid_certs }
    }
}

/// Basic authentication credentials. The password is never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// HTTP transport for a cluster's management endpoint.
///
/// Each call performs a single request; there is no retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base: Url,
    cluster_name: String,
    credentials: Option<Credentials>,
    client: Client,
}

/// Build a fetcher for `kind`, failing for anything other than "http".
pub fn get_fetcher_or_error(
    kind: &str,
    url: &str,
    credentials: Option<Credentials>,
    cluster_name: &str,
    settings: &HttpSettings,
) -> Result<HttpFetcher, AppError> {
    if kind != HTTP_CONNECTION {
        return Err(AppError::UnsupportedConnectionKind(kind.to_string()));
    }
    HttpFetcher::new(url, cluster_name, credentials, settings)
}

impl HttpFetcher {
    pub fn new(
        url: &str,
        cluster_name: &str,
        credentials: Option<Credentials>,
        settings: &HttpSettings,
    ) -> Result<Self, AppError> {
        let base = Url::parse(url)
            .map_err(|e| AppError::invalid(format!("invalid connection URL '{url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(AppError::invalid(format!("invalid connection URL '{url}'")));
        }

        let mut builder = Client::builder().timeout(settings.timeout);
        if settings.ignore_invalid_certs {
            INSECURE_WARNING.call_once(|| {
                eprintln!("WARNING: SSL Certificate validation has been explicitly disabled");
            });
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { base, cluster_name: cluster_name.to_string(), credentials, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(c) if !c.username.is_empty() => {
                request.basic_auth(&c.username, Some(&c.password))
            }
            _ => request,
        }
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Vec<u8>, AppError> {
        tracing::debug!(cluster = %self.cluster_name, %url, "issuing management request");
        let response = self
            .authorize(request)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.bytes().map_err(|e| AppError::Transport(e.to_string()))?.to_vec();
        if status.as_u16() >= 400 {
            tracing::debug!(
                cluster = %self.cluster_name,
                status = status.as_u16(),
                "request rejected"
            );
            return Err(AppError::RemoteRejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }
        Ok(body)
    }

    fn get_url(&self, url: Url) -> Result<Vec<u8>, AppError> {
        self.send(self.client.get(url.clone()), &url)
    }

    fn get(&self, segments: &[&str]) -> Result<Vec<u8>, AppError> {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut().append_pair("links", "");
        self.get_url(url)
    }

    /// GET a collection and rename its `items` array to `key`.
    fn read_many(&self, segments: &[&str], key: &str) -> Result<Vec<u8>, AppError> {
        normalize_collection(&self.get(segments)?, key)
    }

    fn post(&self, segments: &[&str], body: Option<Value>) -> Result<Vec<u8>, AppError> {
        self.post_url(self.endpoint(segments), body)
    }

    fn post_url(&self, url: Url, body: Option<Value>) -> Result<Vec<u8>, AppError> {
        let payload = body.unwrap_or_else(|| json!({}));
        let request =
            self.client.post(url.clone()).header(CONTENT_TYPE, "application/json").json(&payload);
        self.send(request, &url).map(empty_as_object)
    }

    fn delete(&self, segments: &[&str]) -> Result<Vec<u8>, AppError> {
        let url = self.endpoint(segments);
        self.send(self.client.delete(url.clone()), &url).map(empty_as_object)
    }

    fn snapshot(
        &self,
        service: &str,
        snapshot: &str,
        operation: SnapshotOperation,
    ) -> Result<Vec<u8>, AppError> {
        let snap = Some(snapshot);
        match operation {
            SnapshotOperation::Create => {
                self.post(&persistence_path(service, "snapshots", snap, None), None)
            }
            SnapshotOperation::Recover => {
                self.post(&persistence_path(service, "snapshots", snap, Some("recover")), None)
            }
            SnapshotOperation::Remove => {
                self.delete(&persistence_path(service, "snapshots", snap, None))
            }
            SnapshotOperation::Archive => {
                self.post(&persistence_path(service, "archives", snap, None), None)
            }
            SnapshotOperation::Retrieve => {
                self.post(&persistence_path(service, "archives", snap, Some("retrieve")), None)
            }
            SnapshotOperation::RemoveArchived => {
                self.delete(&persistence_path(service, "archives", snap, None))
            }
            SnapshotOperation::ForceRecovery => {
                self.post(&persistence_path(service, "forceRecovery", None, None), None)
            }
        }
    }
}

fn persistence_path<'a>(
    service: &'a str,
    resource: &'a str,
    name: Option<&'a str>,
    action: Option<&'a str>,
) -> Vec<&'a str> {
    let mut segments = vec!["services", service, "persistence", resource];
    segments.extend(name);
    segments.extend(action);
    segments
}

/// Rewrite the endpoint's `{"items": [...]}` shape as `{"<key>": [...]}`.
///
/// Responses that already carry `key` are passed through; `links` are dropped.
pub fn normalize_collection(body: &[u8], key: &str) -> Result<Vec<u8>, AppError> {
    let mut value: Value = serde_json::from_slice(body)?;
    let items = match value.get_mut(key).map(Value::take) {
        Some(items) => items,
        None => value.get_mut("items").map(Value::take).unwrap_or_else(|| json!([])),
    };
    let items = match items {
        Value::Array(mut entries) => {
            for entry in entries.iter_mut() {
                if let Some(object) = entry.as_object_mut() {
                    object.remove("links");
                }
            }
            Value::Array(entries)
        }
        other => other,
    };
    Ok(serde_json::to_vec(&json!({ key: items }))?)
}

fn empty_as_object(body: Vec<u8>) -> Vec<u8> {
    if body.iter().all(u8::is_ascii_whitespace) { b"{}".to_vec() } else { body }
}

fn role_body(role: &Option<String>) -> Option<Value> {
    role.as_ref().map(|r| json!({ "role": r }))
}

impl Fetcher for HttpFetcher {
    fn query(&self, query: &Query) -> Result<Vec<u8>, AppError> {
        match query {
            Query::ClusterDetails => self.get(&[]),
            Query::Members => self.read_many(&["members"], MEMBERS_KEY),
            Query::SingleMember { node_id } => self.get(&["members", &node_id.to_string()]),
            Query::ThreadDump { node_id } => {
                self.get(&["members", &node_id.to_string(), "state"])
            }
            Query::Services => self.read_many(&["services"], SERVICES_KEY),
            Query::ServiceDetails { service } => self.get(&["services", service]),
            Query::ServiceMembers { service } => {
                self.read_many(&["services", service, "members"], MEMBERS_KEY)
            }
            Query::Caches { service } => {
                self.read_many(&["services", service, "caches"], CACHES_KEY)
            }
            Query::CacheMembers { service, cache } => {
                self.read_many(&["services", service, "caches", cache, "members"], MEMBERS_KEY)
            }
            Query::Persistence { service } => self.get(&["services", service, "persistence"]),
            Query::Snapshots { service } => self
                .read_many(&["services", service, "persistence", "snapshots"], SNAPSHOTS_KEY),
            Query::ArchivedSnapshots { service } => {
                self.read_many(&["services", service, "persistence", "archives"], SNAPSHOTS_KEY)
            }
            Query::Reporters => self.read_many(&["reporters"], REPORTERS_KEY),
            Query::Executors => self.read_many(&["executors"], EXECUTORS_KEY),
            Query::Topics { service } => {
                self.read_many(&["services", service, "topics"], TOPICS_KEY)
            }
            Query::FederationParticipants { service } => self.read_many(
                &["services", service, "federation", "statistics", "outgoing", "participants"],
                PARTICIPANTS_KEY,
            ),
            Query::ElasticData { journal } => {
                self.read_many(&["journal", journal.as_str()], JOURNALS_KEY)
            }
            Query::HttpSessions => self.read_many(&["webApplications"], SESSIONS_KEY),
            Query::Health => self.read_many(&["health"], HEALTH_KEY),
        }
    }

    fn mutate(&self, mutation: &Mutation) -> Result<Vec<u8>, AppError> {
        match mutation {
            Mutation::SetMemberAttribute { node_id, attribute, value } => {
                self.post(&["members", &node_id.to_string()], Some(json!({ attribute: value })))
            }
            Mutation::SetServiceAttribute { service, node_id, attribute, value } => self.post(
                &["services", service, "members", &node_id.to_string()],
                Some(json!({ attribute: value })),
            ),
            Mutation::SetCacheAttribute { service, cache, node_id, attribute, value } => self.post(
                &["services", service, "caches", cache, "members", &node_id.to_string()],
                Some(json!({ attribute: value })),
            ),
            Mutation::SetExecutorAttribute { executor, attribute, value } => {
                self.post(&["executors", executor], Some(json!({ attribute: value })))
            }
            Mutation::SetReporterAttribute { node_id, attribute, value } => {
                self.post(&["reporters", &node_id.to_string()], Some(json!({ attribute: value })))
            }
            Mutation::DumpClusterHeap { role } => self.post(&["dumpClusterHeap"], role_body(role)),
            Mutation::LogClusterState { role } => self.post(&["logClusterState"], role_body(role)),
            Mutation::ConfigureTracing { role, ratio } => self.post(
                &["configureTracing"],
                Some(json!({ "role": role.clone().unwrap_or_default(), "tracingRatio": ratio })),
            ),
            Mutation::ShutdownMember { node_id } => {
                self.post(&["members", &node_id.to_string(), "shutdown"], None)
            }
            Mutation::Service { service, operation } => {
                let op = match operation {
                    ServiceOperation::Suspend => "suspend",
                    ServiceOperation::Resume => "resume",
                    ServiceOperation::Shutdown => "shutdown",
                };
                self.post(&["services", service, op], None)
            }
            Mutation::Cache { service, cache, operation } => {
                let op = match operation {
                    CacheOperation::Truncate => "truncate",
                    CacheOperation::Clear => "clear",
                };
                self.post(&["services", service, "caches", cache, op], None)
            }
            Mutation::Snapshot { service, snapshot, operation } => {
                self.snapshot(service, snapshot, *operation)
            }
            Mutation::Jfr { command, node_id, role, options } => {
                let mut url = match node_id {
                    Some(id) => self.endpoint(&[
                        "members",
                        &id.to_string(),
                        "diagnostic-cmd",
                        command.operation(),
                    ]),
                    None => self.endpoint(&["diagnostic-cmd", command.operation()]),
                };
                {
                    let mut pairs = url.query_pairs_mut();
                    if let Some(role) = role.as_deref().filter(|r| !r.is_empty()) {
                        pairs.append_pair("role", role);
                    }
                    if !options.is_empty() {
                        pairs.append_pair("options", options);
                    }
                }
                self.post_url(url, None)
            }
            Mutation::Reporter { node_id, start } => {
                let op = if *start { "start" } else { "stop" };
                self.post(&["reporters", &node_id.to_string(), op], None)
            }
            Mutation::Federation { service, participant, operation } => match participant {
                Some(p) => self.post(
                    &["services", service, "federation", "participants", p, operation.operation()],
                    None,
                ),
                None => {
                    self.post(&["services", service, "federation", operation.operation()], None)
                }
            },
            Mutation::Subscriber { service, topic, subscriber, connect } => {
                let op = if *connect { "connect" } else { "disconnect" };
                let subscriber = subscriber.to_string();
                let path: [&str; 7] =
                    ["services", service, "topics", topic, "subscribers", &subscriber, op];
                self.post(&path, None)
            }
            Mutation::CompactElasticData { journal, node_id } => self.post(
                &["journal", journal.as_str(), "members", &node_id.to_string(), "compact"],
                None,
            ),
            Mutation::ResetStatistics { target } => match target {
                ResetTarget::Member { node_id } => {
                    self.post(&["members", &node_id.to_string(), "resetStatistics"], None)
                }
                ResetTarget::Reporter { node_id } => {
                    self.post(&["reporters", &node_id.to_string(), "resetStatistics"], None)
                }
                ResetTarget::Service { service, node_id } => self.post(
                    &["services", service, "members", &node_id.to_string(), "resetStatistics"],
                    None,
                ),
                ResetTarget::Cache { service, cache, node_id } => self.post(
                    &[
                        "services",
                        service,
                        "caches",
                        cache,
                        "members",
                        &node_id.to_string(),
                        "resetStatistics",
                    ],
                    None,
                ),
                ResetTarget::Executor { executor } => {
                    self.post(&["executors", executor, "resetStatistics"], None)
                }
            },
        }
    }

    fn extended_member_info(
        &self,
        node_id: i32,
        selection: &[String],
    ) -> Result<BTreeMap<String, Vec<u8>>, AppError> {
        let platform = self.get(&["members", &node_id.to_string(), "platform"])?;
        let links = platform_links(&platform)?;

        if let Some(unknown) = selection.iter().find(|name| !links.contains_key(*name)) {
            let available = links.keys().cloned().collect::<Vec<_>>().join(", ");
            return Err(AppError::invalid(format!(
                "extended info '{unknown}' is not available, valid values are: {available}"
            )));
        }

        let mut fragments = BTreeMap::new();
        for (name, href) in links {
            if !selection.is_empty() && !selection.contains(&name) {
                continue;
            }
            let url = Url::parse(&href).map_err(|e| AppError::parse("platform link", e))?;
            fragments.insert(name, self.get_url(url)?);
        }
        Ok(fragments)
    }
}

/// Collect `rel -> href` from a platform document's link bag.
fn platform_links(body: &[u8]) -> Result<BTreeMap<String, String>, AppError> {
    let value: Value = serde_json::from_slice(body)?;
    let links = value
        .get("links")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::parse("platform document", "no links present"))?;
    Ok(links
        .iter()
        .filter_map(|link| {
            let rel = link.get("rel")?.as_str()?;
            let href = link.get("href")?.as_str()?;
            (!PLATFORM_BOOKKEEPING_LINKS.contains(&rel))
                .then(|| (rel.to_string(), href.to_string()))
        })
        .collect())
}

/// Where the basic-auth password comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    Terminal,
    Stdin,
}

/// Creates [`HttpFetcher`]s for stored connections.
///
/// The password is requested at most once per invocation and only when a
/// username was supplied.
pub struct HttpFetcherFactory {
    settings: HttpSettings,
    username: Option<String>,
    password_source: PasswordSource,
    password: RefCell<Option<String>>,
}

impl HttpFetcherFactory {
    pub fn new(
        settings: HttpSettings,
        username: Option<String>,
        password_source: PasswordSource,
    ) -> Self {
        Self { settings, username, password_source, password: RefCell::new(None) }
    }

    fn credentials(&self) -> Result<Option<Credentials>, AppError> {
        let Some(username) = self.username.as_ref().filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        let mut cached = self.password.borrow_mut();
        let password = match cached.as_ref() {
            Some(password) => password.clone(),
            None => {
                let password = read_password(self.password_source)?;
                *cached = Some(password.clone());
                password
            }
        };
        Ok(Some(Credentials { username: username.clone(), password }))
    }
}

impl FetcherFactory for HttpFetcherFactory {
    fn create(&self, connection: &ConnectionRecord) -> Result<Box<dyn Fetcher>, AppError> {
        let fetcher = get_fetcher_or_error(
            &connection.connection_type,
            &connection.connection_url,
            self.credentials()?,
            &connection.cluster_name,
            &self.settings,
        )?;
        Ok(Box::new(fetcher))
    }
}

fn read_password(source: PasswordSource) -> Result<String, AppError> {
    match source {
        PasswordSource::Stdin => {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok(line.trim_end_matches(['\r', '\n']).to_string())
        }
        PasswordSource::Terminal => dialoguer::Password::new()
            .with_prompt("Enter password")
            .interact()
            .map_err(|e| AppError::invalid(format!("failed to read password: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{JfrCommand, JournalType};

    fn settings() -> HttpSettings {
        HttpSettings::new(2, false)
    }

    fn fetcher(server: &mockito::Server) -> HttpFetcher {
        let url = format!("{}/management/coherence/cluster", server.url());
        HttpFetcher::new(&url, "test", None, &settings()).unwrap()
    }

    #[test]
    fn unsupported_kind_is_rejected() {
        let err = get_fetcher_or_error("grpc", "http://localhost:1", None, "c", &settings())
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedConnectionKind(kind) if kind == "grpc"));
    }

    #[test]
    fn members_are_normalized_from_items() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/management/coherence/cluster/members")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items":[{"nodeId":"1","links":[{"rel":"self"}]}],"links":[]}"#)
            .create();

        let body = fetcher(&server).query(&Query::Members).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"members":[{"nodeId":"1"}]}));
        mock.assert();
    }

    #[test]
    fn rejected_status_carries_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/management/coherence/cluster/services/Missing")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body("not found")
            .create();

        let err = fetcher(&server)
            .query(&Query::ServiceDetails { service: "Missing".into() })
            .unwrap_err();
        match err {
            AppError::RemoteRejected { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("unexpected error variant: {}", other),
        }
    }

    #[test]
    fn basic_auth_only_with_username() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/management/coherence/cluster/members/1")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .match_body(mockito::Matcher::Json(json!({"loggingLevel": 6})))
            .with_status(200)
            .create();

        let url = format!("{}/management/coherence/cluster", server.url());
        let credentials = Credentials { username: "admin".into(), password: "secret".into() };
        let fetcher = HttpFetcher::new(&url, "c", Some(credentials), &settings()).unwrap();
        let body = fetcher
            .mutate(&Mutation::SetMemberAttribute {
                node_id: 1,
                attribute: "loggingLevel".into(),
                value: json!(6),
            })
            .unwrap();
        assert_eq!(body, b"{}");
        mock.assert();
    }

    #[test]
    fn snapshot_paths_are_escaped() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", "/management/coherence/cluster/services/Partitioned%20Cache/persistence/archives/snap-1")
            .with_status(200)
            .create();

        fetcher(&server)
            .mutate(&Mutation::Snapshot {
                service: "Partitioned Cache".into(),
                snapshot: "snap-1".into(),
                operation: SnapshotOperation::RemoveArchived,
            })
            .unwrap();
        mock.assert();
    }

    #[test]
    fn jfr_on_single_member_passes_options() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/management/coherence/cluster/members/2/diagnostic-cmd/jfrStart")
            .match_query(mockito::Matcher::UrlEncoded("options".into(), "name=rec1".into()))
            .with_status(200)
            .with_body(r#"{"status":"Started recording 1"}"#)
            .create();

        let body = fetcher(&server)
            .mutate(&Mutation::Jfr {
                command: JfrCommand::Start,
                node_id: Some(2),
                role: None,
                options: "name=rec1".into(),
            })
            .unwrap();
        assert!(String::from_utf8(body).unwrap().contains("Started"));
        mock.assert();
    }

    #[test]
    fn journal_collection_key() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/management/coherence/cluster/journal/ram")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items":[{"nodeId":"1","fileCount":3}]}"#)
            .create();
        let body = fetcher(&server).query(&Query::ElasticData { journal: JournalType::Ram }).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["journals"][0]["fileCount"], 3);
    }

    #[test]
    fn extended_info_follows_platform_links() {
        let mut server = mockito::Server::new();
        let base = server.url();
        let platform = json!({
            "links": [
                {"rel": "self", "href": format!("{base}/management/coherence/cluster/members/1/platform")},
                {"rel": "memory", "href": format!("{base}/management/coherence/cluster/members/1/platform/memory")},
                {"rel": "runtime", "href": format!("{base}/management/coherence/cluster/members/1/platform/runtime")}
            ]
        });
        let _platform = server
            .mock("GET", "/management/coherence/cluster/members/1/platform")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(platform.to_string())
            .create();
        let memory = server
            .mock("GET", "/management/coherence/cluster/members/1/platform/memory")
            .with_status(200)
            .with_body(r#"{"heapMemoryUsage":{"used":10}}"#)
            .create();
        let runtime = server
            .mock("GET", "/management/coherence/cluster/members/1/platform/runtime")
            .expect(0)
            .create();

        let fragments =
            fetcher(&server).extended_member_info(1, &["memory".to_string()]).unwrap();
        assert_eq!(fragments.keys().collect::<Vec<_>>(), vec!["memory"]);
        memory.assert();
        runtime.assert();

        let err = fetcher(&server).extended_member_info(1, &["bogus".to_string()]).unwrap_err();
        assert!(err.to_string().contains("memory, runtime"));
    }
}
