//! Configuration loading
//!
//! `defaults/annotag.default.toml` is embedded into the crate so that documented defaults and
//! runtime behavior stay in sync. Callers layer their own files and overrides on top via
//! [`Loader`] before deserializing into [`AnnotagConfig`].

use crate::formats::OutputFormat;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/annotag.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotagConfig {
    pub parser: ParserConfig,
    pub output: OutputConfig,
}

/// Knobs of the expression parser
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParserConfig {
    pub namespace: String,
    pub max_nesting_depth: usize,
}

/// How the command-line tool renders results
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

/// Layers a project file and command-line overrides over the embedded defaults
///
/// Later layers win key by key, so a file that only sets `parser.namespace` keeps the default
/// output settings.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file; a missing file fails at [`Loader::build`].
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key such as `output.format`; applied after every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers into an [`AnnotagConfig`]; unknown format names are rejected here.
    pub fn build(self) -> Result<AnnotagConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AnnotagConfig, ConfigError> {
    Loader::new().build()
}
