//! Ordered key sources.
//!
//! A storage backend exposes the keys of one bucket through [`KeySource`];
//! the paginator needs nothing else from it.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::entry::{ListEntry, ObjectMetadata};

/// The keys of one bucket in ascending order.
pub trait KeySource {
    /// Iterate, in ascending key order without duplicates, over every entry
    /// whose key is `>= start`.
    fn entries_from<'a>(&'a self, start: &str) -> Box<dyn Iterator<Item = ListEntry> + 'a>;
}

/// An in-memory key source backed by a `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeySource {
    objects: BTreeMap<String, ObjectMetadata>,
}

impl MemoryKeySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object.
    pub fn insert(&mut self, key: impl Into<String>, metadata: ObjectMetadata) {
        self.objects.insert(key.into(), metadata);
    }

    /// Remove an object, returning its metadata.
    pub fn remove(&mut self, key: &str) -> Option<ObjectMetadata> {
        self.objects.remove(key)
    }

    /// Metadata for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ObjectMetadata> {
        self.objects.get(key)
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl KeySource for MemoryKeySource {
    fn entries_from<'a>(&'a self, start: &str) -> Box<dyn Iterator<Item = ListEntry> + 'a> {
        let range = self
            .objects
            .range::<str, _>((Bound::Included(start), Bound::Unbounded));
        Box::new(range.map(|(key, metadata)| ListEntry::new(key.clone(), metadata.clone())))
    }
}

impl FromIterator<(String, ObjectMetadata)> for MemoryKeySource {
    fn from_iter<I: IntoIterator<Item = (String, ObjectMetadata)>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}
