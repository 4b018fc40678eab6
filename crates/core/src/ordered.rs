//! Insertion-ordered map keyed by entity id.

use std::collections::HashMap;

use crate::record::Keyed;

/// Entities unique by [`Keyed::key`], iterated in first-seen order.
///
/// Upserting an existing key replaces the entity in place; its position is kept.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    entries: Vec<V>,
    /// Key -> position in `entries`.
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: Keyed> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the entity that was replaced, if any.
    pub fn upsert(&mut self, value: V) -> Option<V> {
        if let Some(&pos) = self.index.get(value.key()) {
            return Some(std::mem::replace(&mut self.entries[pos], value));
        }
        self.index.insert(value.key().to_string(), self.entries.len());
        self.entries.push(value);
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<V> {
        self.entries
    }
}
