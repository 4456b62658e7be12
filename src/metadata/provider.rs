//! The metadata capability consumed by the resolver
//!
//! Implementations answer tag and member queries about classes. They are expected to be fast,
//! in-memory lookups; the resolver calls them freely and never caches on their behalf.

use super::properties::ClassDescriptor;

pub trait MetadataProvider {
    /// Whether the class itself carries `tag`
    fn class_is_tagged(&self, class: &str, tag: &str) -> bool;

    /// Raw values of every `tag` occurrence on the class, in declaration order
    fn class_tag_values(&self, class: &str, tag: &str) -> Vec<String>;

    /// Whether `property` of the class carries `tag`
    fn property_is_tagged(&self, class: &str, property: &str, tag: &str) -> bool;

    /// Raw values of every `tag` occurrence on the property, or `None` if it is not tagged
    fn property_tag_values(&self, class: &str, property: &str, tag: &str) -> Option<Vec<String>>;

    /// Declared field names, in declaration order
    fn declared_field_names(&self, class: &str) -> Vec<String>;

    /// Method names, in listing order
    fn method_names(&self, class: &str) -> Vec<String>;

    /// Whether the class declares `property`
    fn has_property(&self, class: &str, property: &str) -> bool {
        self.declared_field_names(class)
            .iter()
            .any(|field| field == property)
    }

    /// Describe the class for property enumeration
    fn describe(&self, class: &str) -> ClassDescriptor {
        ClassDescriptor::Object {
            fields: self.declared_field_names(class),
            methods: self.method_names(class),
        }
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn class_is_tagged(&self, class: &str, tag: &str) -> bool {
        (**self).class_is_tagged(class, tag)
    }

    fn class_tag_values(&self, class: &str, tag: &str) -> Vec<String> {
        (**self).class_tag_values(class, tag)
    }

    fn property_is_tagged(&self, class: &str, property: &str, tag: &str) -> bool {
        (**self).property_is_tagged(class, property, tag)
    }

    fn property_tag_values(&self, class: &str, property: &str, tag: &str) -> Option<Vec<String>> {
        (**self).property_tag_values(class, property, tag)
    }

    fn declared_field_names(&self, class: &str) -> Vec<String> {
        (**self).declared_field_names(class)
    }

    fn method_names(&self, class: &str) -> Vec<String> {
        (**self).method_names(class)
    }

    fn has_property(&self, class: &str, property: &str) -> bool {
        (**self).has_property(class, property)
    }

    fn describe(&self, class: &str) -> ClassDescriptor {
        (**self).describe(class)
    }
}
