//! Insertion-ordered attribute map.

use super::attribute::ConfigAttribute;

/// Ordered `key -> attributes` map.
///
/// Lookup by secured object walks entries in insertion order and stops at
/// the first match, so order is part of the configuration. Re-inserting an
/// existing key replaces its attributes in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityMetadataMap<K> {
    entries: Vec<(K, Vec<ConfigAttribute>)>,
}

impl<K> Default for SecurityMetadataMap<K> {
    fn default() -> Self {
        SecurityMetadataMap {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> SecurityMetadataMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, attributes: Vec<ConfigAttribute>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = attributes,
            None => self.entries.push((key, attributes)),
        }
    }

    /// Builder-style [`SecurityMetadataMap::insert`].
    pub fn with(mut self, key: K, attributes: Vec<ConfigAttribute>) -> Self {
        self.insert(key, attributes);
        self
    }

    pub fn get(&self, key: &K) -> Option<&[ConfigAttribute]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, attributes)| attributes.as_slice())
    }
}

impl<K> SecurityMetadataMap<K> {
    /// First entry whose key satisfies `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&K) -> bool) -> Option<&[ConfigAttribute]> {
        self.entries
            .iter()
            .find(|(k, _)| predicate(k))
            .map(|(_, attributes)| attributes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[ConfigAttribute])> {
        self.entries.iter().map(|(k, a)| (k, a.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
