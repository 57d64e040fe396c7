//! The indexed ordered collection.
//!
//! An insertion-ordered primary map plus a secondary index grouping entries
//! under serialized composite keys, with per-group metadata. The three
//! structures form one immutable composite value and are only ever rebuilt
//! together through the group operations, so no caller can update one
//! without the others.

use std::collections::BTreeMap;
use std::hash::Hash;

use tessera_coerce::{coerce, Diagnostics, FromValue};
use tessera_core::{List, OrderedMap, TypeDescriptor, Value};

use crate::error::CollectionError;
use crate::key::{serialize_index_key, IndexKey};

/// A value that knows its own primary key.
pub trait Keyed {
    type Key: Hash + Eq + Clone;

    fn key(&self) -> Self::Key;
}

/// An insertion-ordered key→value map with a secondary group index.
///
/// Every group member is also an ordinary entry of the primary map:
/// individually addressable, deletable, and iterable regardless of its
/// group membership. The invariant maintained by the group operations is
/// that every key listed in the index exists in the primary map; a group's
/// member list and metadata are always installed together.
#[derive(Debug, Clone)]
pub struct IndexedOrderedMap<K, V, M> {
    entries: OrderedMap<K, V>,
    groups: BTreeMap<String, Vec<K>>,
    group_meta: BTreeMap<String, M>,
}

impl<K: PartialEq, V: PartialEq, M: PartialEq> PartialEq for IndexedOrderedMap<K, V, M> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
            && self.groups == other.groups
            && self.group_meta == other.group_meta
    }
}

impl<K: Eq, V: Eq, M: Eq> Eq for IndexedOrderedMap<K, V, M> {}

impl<K, V, M> IndexedOrderedMap<K, V, M>
where
    K: Hash + Eq + Clone,
    V: Keyed<Key = K> + Clone,
    M: Clone,
{
    pub fn new() -> Self {
        IndexedOrderedMap {
            entries: OrderedMap::new(),
            groups: BTreeMap::new(),
            group_meta: BTreeMap::new(),
        }
    }

    /// Builds an ungrouped collection from already-typed values, keyed by
    /// each value's own key. A later duplicate key wins.
    pub fn from_entries(values: impl IntoIterator<Item = V>) -> Self {
        IndexedOrderedMap {
            entries: OrderedMap::from_entries(values.into_iter().map(|v| (v.key(), v))),
            groups: BTreeMap::new(),
            group_meta: BTreeMap::new(),
        }
    }

    /// Wraps an already-typed base map, bypassing deserialization.
    pub fn from_ordered(entries: OrderedMap<K, V>) -> Self {
        IndexedOrderedMap {
            entries,
            groups: BTreeMap::new(),
            group_meta: BTreeMap::new(),
        }
    }

    // ── base map contract ──

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.entries.contains_key(&value.key())
    }

    /// Returns a new collection with `value` set under its own key.
    pub fn set(&self, value: V) -> Self {
        self.with_entries(self.entries.set(value.key(), value))
    }

    /// Returns a new collection with `value` placed before every existing
    /// entry.
    pub fn prepend(&self, value: V) -> Self {
        self.with_entries(self.entries.prepend(value.key(), value))
    }

    /// Removes an entry from the primary map only.
    ///
    /// The group index is deliberately not reconciled: a group that listed
    /// this key now dangles, and `get_group` on it reports `CorruptIndex`.
    pub fn delete(&self, key: &K) -> Self {
        self.with_entries(self.entries.delete(key))
    }

    /// Returns the entries in positions `start..end` as a new collection.
    /// Like `delete`, this does not reconcile the group index.
    pub fn slice(&self, start: usize, end: Option<usize>) -> Self {
        self.with_entries(self.entries.slice(start, end))
    }

    pub fn map<R: Clone>(&self, mut f: impl FnMut(&V) -> R) -> List<R> {
        List::from_vec(self.entries.values().map(|v| f(v)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with_entries(&self, entries: OrderedMap<K, V>) -> Self {
        IndexedOrderedMap {
            entries,
            groups: self.groups.clone(),
            group_meta: self.group_meta.clone(),
        }
    }

    // ── group operations ──

    /// Installs `members` as the group under `key`, replacing any prior
    /// group and its metadata, and merges the members into the primary map
    /// (a later duplicate primary key wins).
    pub fn set_group(
        &self,
        key: &impl IndexKey,
        members: &[V],
        metadata: M,
    ) -> Result<Self, CollectionError> {
        let group = serialize_index_key(&key.index_value())?;
        let member_map = OrderedMap::from_entries(members.iter().map(|v| (v.key(), v.clone())));
        let member_keys: Vec<K> = member_map.keys().cloned().collect();

        let mut groups = self.groups.clone();
        groups.insert(group.clone(), member_keys);
        let mut group_meta = self.group_meta.clone();
        group_meta.insert(group, metadata);

        Ok(IndexedOrderedMap {
            entries: self.entries.concat(&member_map),
            groups,
            group_meta,
        })
    }

    /// Appends `members` after the existing group under `key` (or behaves
    /// as `set_group` when no group exists). The new metadata replaces the
    /// old entirely.
    pub fn append_group(
        &self,
        key: &impl IndexKey,
        members: &[V],
        metadata: M,
    ) -> Result<Self, CollectionError> {
        match self.get_group(key)? {
            None => self.set_group(key, members, metadata),
            Some((existing, _)) => {
                let mut combined = existing.to_vec();
                combined.extend(members.iter().cloned());
                self.set_group(key, &combined, metadata)
            }
        }
    }

    /// Places `members` before the existing group under `key`; otherwise
    /// symmetric to `append_group`.
    pub fn prepend_group(
        &self,
        key: &impl IndexKey,
        members: &[V],
        metadata: M,
    ) -> Result<Self, CollectionError> {
        match self.get_group(key)? {
            None => self.set_group(key, members, metadata),
            Some((existing, _)) => {
                let mut combined = members.to_vec();
                combined.extend(existing.iter().cloned());
                self.set_group(key, &combined, metadata)
            }
        }
    }

    /// Resolves the group under `key` to its ordered member values and
    /// metadata. `Ok(None)` means no such group. A group listing a key
    /// absent from the primary map violates the collection invariant and
    /// reports `CorruptIndex`.
    pub fn get_group(
        &self,
        key: &impl IndexKey,
    ) -> Result<Option<(List<V>, &M)>, CollectionError> {
        let group = serialize_index_key(&key.index_value())?;
        let Some(member_keys) = self.groups.get(&group) else {
            return Ok(None);
        };
        let mut members = Vec::with_capacity(member_keys.len());
        for member_key in member_keys {
            let value = self
                .entries
                .get(member_key)
                .ok_or_else(|| CollectionError::CorruptIndex {
                    group: group.clone(),
                })?;
            members.push(value.clone());
        }
        let metadata =
            self.group_meta
                .get(&group)
                .ok_or_else(|| CollectionError::MissingGroupMetadata {
                    group: group.clone(),
                })?;
        Ok(Some((List::from_vec(members), metadata)))
    }

    pub fn has_group(&self, key: &impl IndexKey) -> Result<bool, CollectionError> {
        let group = serialize_index_key(&key.index_value())?;
        Ok(self.groups.contains_key(&group))
    }

    /// The serialized composite keys of every group, in key order.
    pub fn group_keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

impl<K, V, M> IndexedOrderedMap<K, V, M>
where
    K: Hash + Eq + Clone,
    V: Keyed<Key = K> + FromValue + Clone,
    M: Clone,
{
    /// Builds an ungrouped collection from a raw JSON array by coercing
    /// every element against `element` and constructing a `V` from each
    /// coerced value. Field-level problems flow to `diags`; an element that
    /// cannot be reconciled at all fails the construction.
    pub fn from_untyped(
        element: &TypeDescriptor,
        raw: &serde_json::Value,
        diags: &mut Diagnostics,
    ) -> Result<Self, CollectionError> {
        let items = raw.as_array().ok_or_else(|| CollectionError::NotAList {
            got: json_kind(raw).to_string(),
        })?;
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let coerced = coerce(element, &Value::from_json(item), diags)?;
            values.push(V::from_value(&coerced)?);
        }
        Ok(Self::from_entries(values))
    }
}

impl<K, V, M> Default for IndexedOrderedMap<K, V, M>
where
    K: Hash + Eq + Clone,
    V: Keyed<Key = K> + Clone,
    M: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
