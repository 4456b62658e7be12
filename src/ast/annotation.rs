//! Parsed annotation element
//!
//! An annotation is what one tag on a class or property turns into once its raw values are
//! parsed. A tag without arguments is a [ParsedAnnotation::Flag]; the absence of the tag is not
//! represented here at all (resolvers report it separately).
//!
//! Serialized shape, as consumed by the form layer:
//! - `Flag` -> `true`
//! - `Structured` -> `{"type": "<identifier>", "config": {...}}`
//! - `Collection` -> `[...]`

use super::value::{ArgumentMap, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedAnnotation {
    /// The tag is present but carries no arguments
    Flag,
    /// A `name(key=value, ...)` invocation
    Structured {
        type_name: String,
        config: ArgumentMap,
    },
    /// The tag occurs more than once; one entry per occurrence, in order
    Collection(Vec<ParsedAnnotation>),
}

impl ParsedAnnotation {
    pub fn structured(type_name: impl Into<String>, config: ArgumentMap) -> Self {
        ParsedAnnotation::Structured {
            type_name: type_name.into(),
            config,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, ParsedAnnotation::Flag)
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            ParsedAnnotation::Structured { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    pub fn config(&self) -> Option<&ArgumentMap> {
        match self {
            ParsedAnnotation::Structured { config, .. } => Some(config),
            _ => None,
        }
    }

    /// Look up one argument of a structured annotation
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config().and_then(|config| config.get(key))
    }

    pub fn occurrences(&self) -> Option<&[ParsedAnnotation]> {
        match self {
            ParsedAnnotation::Collection(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for ParsedAnnotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParsedAnnotation::Flag => serializer.serialize_bool(true),
            ParsedAnnotation::Structured { type_name, config } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", type_name)?;
                map.serialize_entry("config", config)?;
                map.end()
            }
            ParsedAnnotation::Collection(items) => items.serialize(serializer),
        }
    }
}
