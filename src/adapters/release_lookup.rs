//! Latest published release lookup against the GitHub releases API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::domain::AppError;

/// Release feed consulted by `version --check-updates`.
pub const LATEST_RELEASE_URL: &str =
    "https://api.github.com/repos/oracle/coherence-cli/releases/latest";

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Fetch the tag of the latest release at `url`, without any leading `v`.
pub fn fetch_latest_version(url: &str, timeout: Duration) -> Result<String, AppError> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Transport(format!("failed to create HTTP client: {e}")))?;
    let response = client
        .get(url)
        .header(ACCEPT, "application/vnd.github+json")
        .header(USER_AGENT, concat!("cohctl/", env!("CARGO_PKG_VERSION")))
        .send()
        .map_err(|e| AppError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response.text().map_err(|e| AppError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(AppError::RemoteRejected { status: status.as_u16(), body });
    }
    let release: Release =
        serde_json::from_str(&body).map_err(|e| AppError::parse("release document", e))?;
    tracing::debug!(tag = %release.tag_name, "latest release");
    Ok(release.tag_name.trim_start_matches('v').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn reads_tag_name() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/releases/latest")
            .match_header("user-agent", mockito::Matcher::Regex("^cohctl/".into()))
            .with_status(200)
            .with_body(r#"{"tag_name":"v1.7.2","name":"1.7.2"}"#)
            .create();
        let url = format!("{}/releases/latest", server.url());
        assert_eq!(fetch_latest_version(&url, TIMEOUT).unwrap(), "1.7.2");
        mock.assert();
    }

    #[test]
    fn non_success_is_rejected() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/releases/latest").with_status(403).with_body("rate limited").create();
        let url = format!("{}/releases/latest", server.url());
        let err = fetch_latest_version(&url, TIMEOUT).unwrap_err();
        assert!(matches!(err, AppError::RemoteRejected { status: 403, .. }));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/releases/latest").with_status(200).with_body("{}").create();
        let url = format!("{}/releases/latest", server.url());
        assert!(matches!(fetch_latest_version(&url, TIMEOUT), Err(AppError::ParseError { .. })));
    }
}
