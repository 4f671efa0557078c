//! Target selection and value rules shared by mutating verbs.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::domain::AppError;

/// Which members a per-node operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSelection {
    All,
    Ids(Vec<i32>),
}

impl FromStr for NodeSelection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(NodeSelection::All);
        }
        s.split(',')
            .map(|raw| {
                let raw = raw.trim();
                raw.parse::<i32>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or_else(|| AppError::invalid(format!("invalid node id {raw}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(NodeSelection::Ids)
    }
}

impl fmt::Display for NodeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSelection::All => f.write_str("all"),
            NodeSelection::Ids(ids) => {
                let joined = ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",");
                f.write_str(&joined)
            }
        }
    }
}

impl NodeSelection {
    /// Resolve against the node ids currently in the cluster.
    ///
    /// Every explicitly named id must be present. The result is sorted.
    pub fn resolve(&self, cluster_nodes: &[i32]) -> Result<Vec<i32>, AppError> {
        let mut resolved = match self {
            NodeSelection::All => cluster_nodes.to_vec(),
            NodeSelection::Ids(ids) => {
                if let Some(missing) = ids.iter().find(|id| !cluster_nodes.contains(id)) {
                    return Err(AppError::invalid(format!("invalid node id {missing}")));
                }
                ids.clone()
            }
        };
        resolved.sort_unstable();
        resolved.dedup();
        if resolved.is_empty() {
            return Err(AppError::not_found("no members found"));
        }
        Ok(resolved)
    }
}

/// Value type accepted by a settable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Text,
}

/// A runtime attribute an operator may change.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    pub name: &'static str,
    pub kind: ValueKind,
}

const fn rule(name: &'static str, kind: ValueKind) -> AttributeRule {
    AttributeRule { name, kind }
}

pub const MEMBER_ATTRIBUTES: &[AttributeRule] = &[
    rule("loggingLevel", ValueKind::Int),
    rule("resendDelay", ValueKind::Int),
    rule("sendAckDelay", ValueKind::Int),
    rule("trafficJamCount", ValueKind::Int),
    rule("trafficJamDelay", ValueKind::Int),
    rule("loggingLimit", ValueKind::Int),
    rule("loggingFormat", ValueKind::Text),
    rule("multicastThreshold", ValueKind::Int),
];

pub const SERVICE_ATTRIBUTES: &[AttributeRule] = &[
    rule("threadCount", ValueKind::Int),
    rule("threadCountMin", ValueKind::Int),
    rule("threadCountMax", ValueKind::Int),
    rule("taskHungThresholdMillis", ValueKind::Int),
    rule("taskTimeoutMillis", ValueKind::Int),
    rule("requestTimeoutMillis", ValueKind::Int),
];

pub const CACHE_ATTRIBUTES: &[AttributeRule] = &[
    rule("expiryDelay", ValueKind::Int),
    rule("highUnits", ValueKind::Int),
    rule("lowUnits", ValueKind::Int),
    rule("batchFactor", ValueKind::Float),
    rule("refreshFactor", ValueKind::Float),
    rule("requeueThreshold", ValueKind::Int),
];

pub const EXECUTOR_ATTRIBUTES: &[AttributeRule] = &[rule("traceLogging", ValueKind::Bool)];

pub const REPORTER_ATTRIBUTES: &[AttributeRule] = &[
    rule("intervalSeconds", ValueKind::Int),
    rule("outputPath", ValueKind::Text),
    rule("configFile", ValueKind::Text),
];

/// Validate `name=raw` against a rule set and convert it to the JSON body value.
pub fn validate_attribute(
    rules: &[AttributeRule],
    name: &str,
    raw: &str,
) -> Result<Value, AppError> {
    let Some(rule) = rules.iter().find(|r| r.name == name) else {
        let allowed = rules.iter().map(|r| r.name).collect::<Vec<_>>().join(", ");
        return Err(AppError::invalid(format!(
            "attribute name '{name}' is invalid, valid values are: {allowed}"
        )));
    };

    let invalid = || AppError::invalid(format!("invalid value '{raw}' for attribute {name}"));
    let value = match rule.kind {
        ValueKind::Int => {
            let parsed = raw.parse::<i64>().map_err(|_| invalid())?;
            // Only the lower bound is enforced for loggingLevel.
            if name == "loggingLevel" && parsed < 1 {
                return Err(AppError::invalid(format!(
                    "invalid value of {parsed} for loggingLevel, must be at least 1"
                )));
            }
            Value::from(parsed)
        }
        ValueKind::Float => Value::from(raw.parse::<f64>().map_err(|_| invalid())?),
        ValueKind::Bool => Value::from(raw.parse::<bool>().map_err(|_| invalid())?),
        ValueKind::Text => Value::from(raw),
    };
    Ok(value)
}

/// Tracing ratio must be -1 (disabled) or a fraction in [0, 1].
pub fn validate_tracing_ratio(ratio: f64) -> Result<f64, AppError> {
    if ratio == -1.0 || (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(AppError::invalid(format!(
            "tracing ratio {ratio} is invalid, it must be -1 or between 0 and 1"
        )))
    }
}
