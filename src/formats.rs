//! Output formats for parsed annotations
//!
//! Anything serializable can be rendered; in practice that is a
//! [ParsedAnnotation](crate::ast::ParsedAnnotation), a
//! [Resolution](crate::resolver::Resolution) or a
//! [PropertyOrder](crate::metadata::PropertyOrder).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 2] = ["json", "yaml"];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(FormatError::UnknownFormat(name.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown output format `{0}` (expected json or yaml)")]
    UnknownFormat(String),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Render a value in the requested format
///
/// `pretty` only affects JSON; YAML output is always block-styled.
pub fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}
