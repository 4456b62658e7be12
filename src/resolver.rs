//! Annotation resolution
//!
//! The resolver answers three kinds of question about a tag:
//!
//! - on the class itself ([PropertySelector::Class]),
//! - on every property of the class ([PropertySelector::AllProperties]), keyed by property name
//!   in [PropertyEnumerator] order,
//! - on one named property ([PropertySelector::Property]).
//!
//! A missing tag is [Resolution::NotFound]. A tag present without arguments is a
//! [ParsedAnnotation::Flag], and the all-properties query simply leaves untagged properties out.
//!
//! Single-property lookups have one convenience on top: when the parsed annotation is structured
//! and its config holds an entry named after the property itself, that entry is returned as
//! [Resolution::Entry] instead of the whole annotation. This is a secondary lookup; the typed
//! [AnnotationResolver::resolve_property_annotation] always returns the full annotation.

pub mod cache;

use crate::ast::{ParseError, ParsedAnnotation, Value};
use crate::metadata::{EnumerateError, MetadataProvider, PropertyEnumerator};
use crate::parsing::ExpressionParser;
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use thiserror::Error;

pub use cache::{AnnotationCache, CacheKey, MemoryCache};

/// Which part of a class a query is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertySelector {
    Class,
    AllProperties,
    Property(String),
}

impl PropertySelector {
    pub fn property(name: impl Into<String>) -> Self {
        PropertySelector::Property(name.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The class or property does not carry the tag
    NotFound,
    Annotation(ParsedAnnotation),
    /// Per-property annotations, in property order
    Properties(IndexMap<String, ParsedAnnotation>),
    /// The entry named after the requested property
    Entry(Value),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        !matches!(self, Resolution::NotFound)
    }

    pub fn annotation(&self) -> Option<&ParsedAnnotation> {
        match self {
            Resolution::Annotation(annotation) => Some(annotation),
            _ => None,
        }
    }

    pub fn properties(&self) -> Option<&IndexMap<String, ParsedAnnotation>> {
        match self {
            Resolution::Properties(properties) => Some(properties),
            _ => None,
        }
    }

    pub fn entry(&self) -> Option<&Value> {
        match self {
            Resolution::Entry(value) => Some(value),
            _ => None,
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolution::NotFound => serializer.serialize_none(),
            Resolution::Annotation(annotation) => annotation.serialize(serializer),
            Resolution::Properties(properties) => properties.serialize(serializer),
            Resolution::Entry(value) => value.serialize(serializer),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidInput(#[from] EnumerateError),
    #[error("malformed `{tag}` annotation on {target}: {source}")]
    Parse {
        target: String,
        tag: String,
        #[source]
        source: ParseError,
    },
}

pub struct AnnotationResolver<'a> {
    provider: &'a dyn MetadataProvider,
    parser: ExpressionParser,
    cache: Option<&'a dyn AnnotationCache>,
}

impl<'a> AnnotationResolver<'a> {
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Self {
            provider,
            parser: ExpressionParser::default(),
            cache: None,
        }
    }

    pub fn with_parser(mut self, parser: ExpressionParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_cache(mut self, cache: &'a dyn AnnotationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn parser(&self) -> &ExpressionParser {
        &self.parser
    }

    /// Resolve `tag` on the part of `class` named by `selector`
    pub fn resolve(
        &self,
        class: &str,
        tag: &str,
        selector: &PropertySelector,
    ) -> Result<Resolution, ResolveError> {
        let resolution = self.cached_lookup(class, tag, selector)?;
        Ok(match selector {
            PropertySelector::Property(property) => unwrap_entry(resolution, property),
            _ => resolution,
        })
    }

    pub fn resolve_class_annotation(
        &self,
        class: &str,
        tag: &str,
    ) -> Result<Option<ParsedAnnotation>, ResolveError> {
        match self.cached_lookup(class, tag, &PropertySelector::Class)? {
            Resolution::Annotation(annotation) => Ok(Some(annotation)),
            _ => Ok(None),
        }
    }

    /// Every tagged property, keyed by name; untagged properties are left out
    pub fn resolve_all_property_annotations(
        &self,
        class: &str,
        tag: &str,
    ) -> Result<IndexMap<String, ParsedAnnotation>, ResolveError> {
        match self.cached_lookup(class, tag, &PropertySelector::AllProperties)? {
            Resolution::Properties(properties) => Ok(properties),
            _ => Ok(IndexMap::new()),
        }
    }

    pub fn resolve_property_annotation(
        &self,
        class: &str,
        property: &str,
        tag: &str,
    ) -> Result<Option<ParsedAnnotation>, ResolveError> {
        let selector = PropertySelector::property(property);
        match self.cached_lookup(class, tag, &selector)? {
            Resolution::Annotation(annotation) => Ok(Some(annotation)),
            _ => Ok(None),
        }
    }

    fn cached_lookup(
        &self,
        class: &str,
        tag: &str,
        selector: &PropertySelector,
    ) -> Result<Resolution, ResolveError> {
        let Some(cache) = self.cache else {
            return self.lookup(class, tag, selector);
        };

        let key = CacheKey::new(class, tag, selector);
        if let Some(resolution) = cache.get(&key) {
            log::trace!("cache hit for `{}` on {} ({:?})", tag, class, selector);
            return Ok(resolution);
        }
        let resolution = self.lookup(class, tag, selector)?;
        cache.put(key, resolution.clone());
        Ok(resolution)
    }

    fn lookup(
        &self,
        class: &str,
        tag: &str,
        selector: &PropertySelector,
    ) -> Result<Resolution, ResolveError> {
        match selector {
            PropertySelector::Class => self.lookup_class(class, tag),
            PropertySelector::AllProperties => self.lookup_all_properties(class, tag),
            PropertySelector::Property(property) => self.lookup_property(class, property, tag),
        }
    }

    fn lookup_class(&self, class: &str, tag: &str) -> Result<Resolution, ResolveError> {
        if !self.provider.class_is_tagged(class, tag) {
            log::debug!("class {} does not carry `{}`", class, tag);
            return Ok(Resolution::NotFound);
        }
        let values = self.provider.class_tag_values(class, tag);
        self.parse(class, tag, &values).map(Resolution::Annotation)
    }

    fn lookup_all_properties(&self, class: &str, tag: &str) -> Result<Resolution, ResolveError> {
        let order = PropertyEnumerator::enumerate(&self.provider.describe(class))?;

        let mut properties = IndexMap::new();
        for property in &order {
            if !self.provider.has_property(class, property) {
                continue;
            }
            let Some(values) = self.provider.property_tag_values(class, property, tag) else {
                continue;
            };
            let target = format!("{}::{}", class, property);
            let annotation = self.parse(&target, tag, &values)?;
            properties.insert(property.clone(), annotation);
        }

        log::debug!(
            "{} of {} properties of {} carry `{}`",
            properties.len(),
            order.len(),
            class,
            tag
        );
        Ok(Resolution::Properties(properties))
    }

    fn lookup_property(
        &self,
        class: &str,
        property: &str,
        tag: &str,
    ) -> Result<Resolution, ResolveError> {
        if !self.provider.property_is_tagged(class, property, tag) {
            log::debug!("{}::{} does not carry `{}`", class, property, tag);
            return Ok(Resolution::NotFound);
        }
        let values = self
            .provider
            .property_tag_values(class, property, tag)
            .unwrap_or_default();
        let target = format!("{}::{}", class, property);
        self.parse(&target, tag, &values).map(Resolution::Annotation)
    }

    fn parse(
        &self,
        target: &str,
        tag: &str,
        values: &[String],
    ) -> Result<ParsedAnnotation, ResolveError> {
        self.parser
            .parse_occurrences(values)
            .map_err(|source| ResolveError::Parse {
                target: target.to_string(),
                tag: tag.to_string(),
                source,
            })
    }
}

fn unwrap_entry(resolution: Resolution, property: &str) -> Resolution {
    match resolution {
        Resolution::Annotation(ParsedAnnotation::Structured {
            type_name,
            mut config,
        }) => match config.shift_remove(property) {
            Some(value) => {
                log::trace!("unwrapping `{}` from `{}` annotation", property, type_name);
                Resolution::Entry(value)
            }
            None => Resolution::Annotation(ParsedAnnotation::Structured { type_name, config }),
        },
        other => other,
    }
}
