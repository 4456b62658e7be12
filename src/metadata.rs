//! Class and property metadata
//!
//! The resolver never inspects classes itself. It asks a [MetadataProvider] which tags a class or
//! property carries and which members it declares, and uses [PropertyEnumerator] to put those
//! members in order. [MetadataTable] is a ready-made provider over precomputed data.

pub mod properties;
pub mod provider;
pub mod table;

pub use properties::{ClassDescriptor, EnumerateError, PropertyEnumerator, PropertyOrder};
pub use provider::MetadataProvider;
pub use table::{ClassMetadata, MetadataTable, TableError, TagValues};
