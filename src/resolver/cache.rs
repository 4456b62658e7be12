//! Optional memoization of resolver lookups
//!
//! Nothing is cached unless a cache is attached to the resolver. Entries hold the lookup result
//! before the single-property convenience unwrap, keyed by what was asked.

use super::{PropertySelector, Resolution};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub class: String,
    pub tag: String,
    pub selector: PropertySelector,
}

impl CacheKey {
    pub fn new(class: &str, tag: &str, selector: &PropertySelector) -> Self {
        Self {
            class: class.to_string(),
            tag: tag.to_string(),
            selector: selector.clone(),
        }
    }
}

pub trait AnnotationCache {
    fn get(&self, key: &CacheKey) -> Option<Resolution>;
    fn put(&self, key: CacheKey, resolution: Resolution);
}

/// Process-local cache behind a mutex
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, Resolution>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    // A poisoned map is still a valid map.
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Resolution>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AnnotationCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Resolution> {
        self.entries().get(key).cloned()
    }

    fn put(&self, key: CacheKey, resolution: Resolution) {
        self.entries().insert(key, resolution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ParsedAnnotation;

    #[test]
    fn test_put_then_get() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("Person", "form", &PropertySelector::Class);
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), Resolution::Annotation(ParsedAnnotation::Flag));
        assert_eq!(
            cache.get(&key),
            Some(Resolution::Annotation(ParsedAnnotation::Flag))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_selector_is_part_of_the_key() {
        let cache = MemoryCache::new();
        cache.put(
            CacheKey::new("Person", "form", &PropertySelector::Class),
            Resolution::NotFound,
        );
        let other = CacheKey::new("Person", "form", &PropertySelector::AllProperties);
        assert!(cache.get(&other).is_none());

        cache.clear();
        assert!(cache.is_empty());
    }
}
