//! Gettable property discovery
//!
//! A gettable property is either a declared field or a name derived from an accessor method
//! (`isActive` -> `active`, `getTitle` -> `title`). Fields come first in declaration order, then
//! accessor-derived names in method order; the first occurrence of a name wins.
//!
//! The result is deliberately not sorted. Form builders derive field order from it, so it must
//! follow the order in which members were written.

use indexmap::IndexSet;
use serde::Serialize;
use thiserror::Error;

/// What the metadata source knows about a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassDescriptor {
    /// An object-like class with members
    Object {
        fields: Vec<String>,
        methods: Vec<String>,
    },
    /// Anything else; `kind` names what was found instead
    Other { kind: String },
}

impl ClassDescriptor {
    pub fn object<F, M>(fields: F, methods: M) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        ClassDescriptor::Object {
            fields: fields.into_iter().map(Into::into).collect(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        ClassDescriptor::Other { kind: kind.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumerateError {
    #[error("expected an object-like class, {kind} given")]
    InvalidInput { kind: String },
}

/// Ordered, duplicate-free property names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyOrder(Vec<String>);

impl PropertyOrder {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|candidate| candidate == name)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a PropertyOrder {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub struct PropertyEnumerator;

impl PropertyEnumerator {
    /// List the gettable properties of a class in declaration order
    pub fn enumerate(descriptor: &ClassDescriptor) -> Result<PropertyOrder, EnumerateError> {
        let (fields, methods) = match descriptor {
            ClassDescriptor::Object { fields, methods } => (fields, methods),
            ClassDescriptor::Other { kind } => {
                return Err(EnumerateError::InvalidInput { kind: kind.clone() })
            }
        };

        let mut names: IndexSet<String> = fields.iter().cloned().collect();
        names.extend(methods.iter().filter_map(|method| accessor_property(method)));

        Ok(PropertyOrder(names.into_iter().collect()))
    }
}

/// `isX` / `getX` -> `x`; `None` for anything else
fn accessor_property(method: &str) -> Option<String> {
    let rest = method
        .strip_prefix("is")
        .or_else(|| method.strip_prefix("get"))?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}
