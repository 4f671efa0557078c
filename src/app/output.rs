//! Output format selection and dispatch.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use serde_json_path::JsonPath;

use crate::domain::AppError;

const JSONPATH_PREFIX: &str = "jsonpath=";

/// Value of `-o/--output`.
#[derive(Debug, Clone, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Wide,
    Json,
    JsonPath(JsonPath),
}

impl OutputFormat {
    /// Table-style formats render through the formatter; the others pass JSON through.
    pub fn is_table(&self) -> bool {
        matches!(self, OutputFormat::Table | OutputFormat::Wide)
    }

    pub fn is_wide(&self) -> bool {
        matches!(self, OutputFormat::Wide)
    }

    /// Render a response: JSON formats use `raw`, table formats call `table`.
    pub fn render<F>(&self, raw: &[u8], table: F) -> Result<String, AppError>
    where
        F: FnOnce() -> Result<String, AppError>,
    {
        match self {
            OutputFormat::Table | OutputFormat::Wide => table(),
            OutputFormat::Json => {
                let mut out = String::from_utf8_lossy(raw).into_owned();
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                Ok(out)
            }
            OutputFormat::JsonPath(path) => {
                let value: Value = serde_json::from_slice(raw)?;
                let nodes = path.query(&value).all();
                let mut out = serde_json::to_string(&nodes)?;
                out.push('\n');
                Ok(out)
            }
        }
    }

    /// Render a document assembled from several responses.
    pub fn render_value<F>(&self, value: &Value, table: F) -> Result<String, AppError>
    where
        F: FnOnce() -> Result<String, AppError>,
    {
        if self.is_table() {
            return table();
        }
        self.render(&serde_json::to_vec(value)?, table)
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "wide" => Ok(OutputFormat::Wide),
            "json" => Ok(OutputFormat::Json),
            other => {
                let Some(index) = other.find(JSONPATH_PREFIX) else {
                    return Err(AppError::invalid(format!(
                        "output format must be one of table, wide, json or jsonpath=<expr>, not '{other}'"
                    )));
                };
                let expression = &other[index + JSONPATH_PREFIX.len()..];
                JsonPath::parse(expression)
                    .map(OutputFormat::JsonPath)
                    .map_err(|e| AppError::invalid(format!("invalid JSONPath '{expression}': {e}")))
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Wide => f.write_str("wide"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::JsonPath(path) => write!(f, "{JSONPATH_PREFIX}{path}"),
        }
    }
}
