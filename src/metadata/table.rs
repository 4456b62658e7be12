//! Precomputed metadata table
//!
//! A [MetadataProvider] backed by plain data, so no runtime reflection is needed. Tables are
//! built in code with [ClassMetadata]'s builder methods or loaded from JSON / YAML:
//!
//!     classes:
//!       App\Domain\Person:
//!         tags:
//!           flux.form: ["id='person'"]
//!         fields: [name, age]
//!         methods: [getName, isActive]
//!         properties:
//!           name:
//!             flux.form.field: ["input(size=40)"]
//!
//! A tag with an empty value list still counts as present (it parses to a `Flag`).

use super::properties::ClassDescriptor;
use super::provider::MetadataProvider;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Raw values per tag, in declaration order
pub type TagValues = IndexMap<String, Vec<String>>;

/// Kind reported for classes the table does not know
pub const UNDEFINED_KIND: &str = "undefined";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read metadata table {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid JSON metadata table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML metadata table: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported metadata table {} (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Everything known about one class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassMetadata {
    pub tags: TagValues,
    pub fields: Vec<String>,
    pub methods: Vec<String>,
    pub properties: IndexMap<String, TagValues>,
}

impl ClassMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the class; an empty `values` list marks a tag without arguments
    pub fn tag<I>(mut self, tag: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.tags
            .entry(tag.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn field(mut self, name: &str) -> Self {
        if !self.fields.iter().any(|field| field == name) {
            self.fields.push(name.to_string());
        }
        self
    }

    pub fn method(mut self, name: &str) -> Self {
        self.methods.push(name.to_string());
        self
    }

    /// Tag a property, declaring it as a field if needed
    pub fn property_tag<I>(mut self, property: &str, tag: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self = self.field(property);
        self.properties
            .entry(property.to_string())
            .or_default()
            .entry(tag.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }
}

/// In-memory metadata for a set of classes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataTable {
    #[serde(default)]
    classes: IndexMap<String, ClassMetadata>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, name: &str, class: ClassMetadata) -> Self {
        self.insert(name, class);
        self
    }

    pub fn insert(&mut self, name: &str, class: ClassMetadata) {
        self.classes.insert(name.to_string(), class);
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetadata> {
        self.classes.get(name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn from_json_str(source: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, TableError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Load a table from disk; the format follows the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, TableError> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            _ => {
                return Err(TableError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let source = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&source)
    }

    fn property_tags(&self, class: &str, property: &str) -> Option<&TagValues> {
        self.classes.get(class)?.properties.get(property)
    }
}

impl MetadataProvider for MetadataTable {
    fn class_is_tagged(&self, class: &str, tag: &str) -> bool {
        self.classes
            .get(class)
            .is_some_and(|metadata| metadata.tags.contains_key(tag))
    }

    fn class_tag_values(&self, class: &str, tag: &str) -> Vec<String> {
        self.classes
            .get(class)
            .and_then(|metadata| metadata.tags.get(tag))
            .cloned()
            .unwrap_or_default()
    }

    fn property_is_tagged(&self, class: &str, property: &str, tag: &str) -> bool {
        self.property_tags(class, property)
            .is_some_and(|tags| tags.contains_key(tag))
    }

    fn property_tag_values(&self, class: &str, property: &str, tag: &str) -> Option<Vec<String>> {
        self.property_tags(class, property)?.get(tag).cloned()
    }

    fn declared_field_names(&self, class: &str) -> Vec<String> {
        self.classes
            .get(class)
            .map(|metadata| metadata.fields.clone())
            .unwrap_or_default()
    }

    fn method_names(&self, class: &str) -> Vec<String> {
        self.classes
            .get(class)
            .map(|metadata| metadata.methods.clone())
            .unwrap_or_default()
    }

    fn has_property(&self, class: &str, property: &str) -> bool {
        self.classes.get(class).is_some_and(|metadata| {
            metadata.fields.iter().any(|field| field == property)
                || metadata.properties.contains_key(property)
        })
    }

    fn describe(&self, class: &str) -> ClassDescriptor {
        match self.classes.get(class) {
            Some(metadata) => ClassDescriptor::Object {
                fields: metadata.fields.clone(),
                methods: metadata.methods.clone(),
            },
            None => ClassDescriptor::other(UNDEFINED_KIND),
        }
    }
}
