//! The persisted cohctl config document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// File name of the config document inside the config directory.
pub const CONFIG_FILE_NAME: &str = "cohctl.yaml";
/// Default config directory name under the user's home.
pub const CONFIG_DIR_NAME: &str = ".cohctl";
/// The only connection kind currently recognized.
pub const HTTP_CONNECTION: &str = "http";

const DEFAULT_REQUEST_TIMEOUT: i32 = 30;

/// Version stamped into new documents and compared on every load.
pub fn binary_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Top-level config document.
///
/// Keys are contractual; unknown keys are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohctlConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub current_context: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: i32,
    #[serde(default)]
    pub ignore_invalid_certs: bool,
    #[serde(default)]
    pub default_bytes_format: String,
    #[serde(default)]
    pub default_heap: String,
    #[serde(default)]
    pub use_gradle: bool,
    #[serde(default)]
    pub clusters: Vec<ConnectionRecord>,
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
}

fn default_color() -> String {
    ColorMode::On.to_string()
}

fn default_request_timeout() -> i32 {
    DEFAULT_REQUEST_TIMEOUT
}

impl Default for CohctlConfig {
    fn default() -> Self {
        Self {
            version: binary_version().to_string(),
            current_context: String::new(),
            debug: false,
            color: default_color(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            ignore_invalid_certs: false,
            default_bytes_format: String::new(),
            default_heap: String::new(),
            use_gradle: false,
            clusters: Vec::new(),
            profiles: Vec::new(),
        }
    }
}

impl CohctlConfig {
    pub fn find_cluster(&self, name: &str) -> Option<&ConnectionRecord> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn find_profile(&self, name: &str) -> Option<&ProfileRecord> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The bytes unit preference, if one has been set.
    pub fn bytes_unit(&self) -> Option<BytesUnit> {
        self.default_bytes_format.parse().ok()
    }
}

/// A named connection to a cluster's management endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub name: String,
    #[serde(default)]
    pub discovery_type: String,
    #[serde(default = "default_connection_type")]
    pub connection_type: String,
    #[serde(default)]
    pub connection_url: String,
    #[serde(default)]
    pub ns_lookup_port: String,
    #[serde(default)]
    pub cluster_version: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub cluster_type: String,
    #[serde(default)]
    pub manually_created: bool,
    #[serde(default)]
    pub base_classpath: String,
    #[serde(default)]
    pub additional_classpath: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub management_port: i32,
    #[serde(default)]
    pub persistence_mode: String,
    #[serde(default)]
    pub logging_destination: String,
    #[serde(default)]
    pub startup_class: String,
}

fn default_connection_type() -> String {
    HTTP_CONNECTION.to_string()
}

impl ConnectionRecord {
    /// A manually added http connection.
    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discovery_type: "manual".to_string(),
            connection_type: HTTP_CONNECTION.to_string(),
            connection_url: url.into(),
            cluster_type: "Standalone".to_string(),
            ..Self::default()
        }
    }
}

/// A named, opaque launch-argument string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub value: String,
}

/// Terminal color preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    On,
    Off,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorMode::On => "on",
            ColorMode::Off => "off",
        })
    }
}

impl FromStr for ColorMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(ColorMode::On),
            "off" => Ok(ColorMode::Off),
            other => Err(AppError::invalid(format!("color must be 'on' or 'off', not '{other}'"))),
        }
    }
}

/// Unit used when rendering byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BytesUnit {
    Bytes,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl BytesUnit {
    pub const ALL: [BytesUnit; 5] =
        [BytesUnit::Bytes, BytesUnit::Kilo, BytesUnit::Mega, BytesUnit::Giga, BytesUnit::Tera];

    pub fn code(&self) -> &'static str {
        match self {
            BytesUnit::Bytes => "b",
            BytesUnit::Kilo => "k",
            BytesUnit::Mega => "m",
            BytesUnit::Giga => "g",
            BytesUnit::Tera => "t",
        }
    }
}

impl fmt::Display for BytesUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BytesUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BytesUnit::ALL.into_iter().find(|u| u.code() == s).ok_or_else(|| {
            AppError::invalid(format!("bytes format must be one of b, k, m, g or t, not '{s}'"))
        })
    }
}

/// Parse the on/off and true/false spellings accepted by boolean preferences.
pub fn parse_switch(value: &str) -> Result<bool, AppError> {
    match value {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        other => Err(AppError::invalid(format!("value must be on/off or true/false, not '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_ignored() {
        let yaml = "version: 0.9.0\nfutureKey: 12\nclusters:\n- name: a\n  connectionUrl: http://x\n";
        let config: CohctlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "0.9.0");
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.color, "on");
        assert_eq!(config.clusters[0].connection_type, "http");
    }

    #[test]
    fn keys_are_camel_case() {
        let yaml = serde_yaml::to_string(&CohctlConfig::default()).unwrap();
        for key in [
            "version:",
            "currentContext:",
            "requestTimeout:",
            "ignoreInvalidCerts:",
            "defaultBytesFormat:",
            "defaultHeap:",
            "useGradle:",
            "clusters:",
            "profiles:",
        ] {
            assert!(yaml.contains(key), "missing {key} in\n{yaml}");
        }
    }

    #[test]
    fn bytes_unit_parses_codes() {
        assert_eq!("g".parse::<BytesUnit>().unwrap(), BytesUnit::Giga);
        assert!("x".parse::<BytesUnit>().is_err());
    }

    #[test]
    fn switches_accept_both_spellings() {
        assert!(parse_switch("on").unwrap());
        assert!(!parse_switch("false").unwrap());
        assert!(parse_switch("yes").is_err());
    }
}
