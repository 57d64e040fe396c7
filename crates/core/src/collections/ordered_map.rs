//! Insertion-ordered persistent map.

use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};

/// A persistent key→value map that remembers insertion order.
///
/// Setting an existing key updates its value in place without moving it;
/// deleting a key preserves the relative order of the survivors.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    data: IndexMap<K, V>,
}

/// Insertion order is observable (`first`, `slice`, iteration), so it is
/// part of the value: two maps with the same entries in different orders
/// are not equal.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len()
            && self.data.iter().zip(&other.data).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Hash + Eq + Clone, V: Clone> OrderedMap<K, V> {
    pub fn new() -> Self {
        OrderedMap {
            data: IndexMap::new(),
        }
    }

    /// Builds a map from `(key, value)` pairs. A later pair with a duplicate
    /// key replaces the earlier value but keeps the earlier position.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        OrderedMap {
            data: entries.into_iter().collect(),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.data.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.data.contains_key(key)
    }

    /// Returns a new map with `key` bound to `value`.
    pub fn set(&self, key: K, value: V) -> Self {
        let mut data = self.data.clone();
        data.insert(key, value);
        OrderedMap { data }
    }

    /// Returns a new map without `key`. Order of the remaining entries is
    /// preserved.
    pub fn delete<Q>(&self, key: &Q) -> Self
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let mut data = self.data.clone();
        data.shift_remove(key);
        OrderedMap { data }
    }

    /// Returns a new map with `(key, value)` placed before every existing
    /// entry. An existing binding for `key` is dropped first.
    pub fn prepend(&self, key: K, value: V) -> Self {
        let mut data = IndexMap::with_capacity(self.data.len() + 1);
        data.insert(key, value);
        for (k, v) in &self.data {
            if !data.contains_key(k) {
                data.insert(k.clone(), v.clone());
            }
        }
        OrderedMap { data }
    }

    /// Returns a new map with every entry of `other` merged in after the
    /// receiver's entries. For duplicate keys the value from `other` wins,
    /// keeping the receiver's position.
    pub fn concat(&self, other: &Self) -> Self {
        let mut data = self.data.clone();
        for (k, v) in &other.data {
            data.insert(k.clone(), v.clone());
        }
        OrderedMap { data }
    }

    /// Returns the entries in positions `start..end` (or `start..` when `end`
    /// is `None`) as a new map.
    pub fn slice(&self, start: usize, end: Option<usize>) -> Self {
        let end = end.unwrap_or(self.data.len()).min(self.data.len());
        let start = start.min(end);
        OrderedMap {
            data: self
                .data
                .iter()
                .skip(start)
                .take(end - start)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn map<R: Clone>(&self, mut f: impl FnMut(&K, &V) -> R) -> OrderedMap<K, R> {
        OrderedMap {
            data: self.data.iter().map(|(k, v)| (k.clone(), f(k, v))).collect(),
        }
    }

    pub fn filter(&self, mut f: impl FnMut(&K, &V) -> bool) -> Self {
        OrderedMap {
            data: self
                .data
                .iter()
                .filter(|(k, v)| f(k, v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.data.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.data.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.data.first()
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.data.last()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderedMap<&'static str, i32> {
        OrderedMap::from_entries([("a", 1), ("b", 2), ("c", 3)])
    }

    #[test]
    fn set_preserves_position_and_receiver() {
        let m = sample();
        let updated = m.set("b", 20);
        assert_eq!(m.get(&"b"), Some(&2));
        assert_eq!(updated.get(&"b"), Some(&20));
        let keys: Vec<_> = updated.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn delete_keeps_order() {
        let m = sample().delete(&"b");
        let keys: Vec<_> = m.keys().copied().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn prepend_puts_entry_first() {
        let m = sample().prepend("z", 0);
        assert_eq!(m.first(), Some((&"z", &0)));
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn concat_later_value_wins() {
        let other = OrderedMap::from_entries([("b", 20), ("d", 4)]);
        let merged = sample().concat(&other);
        assert_eq!(merged.get(&"b"), Some(&20));
        let keys: Vec<_> = merged.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn equality_considers_order() {
        let m = sample();
        assert_eq!(m, OrderedMap::from_entries([("a", 1), ("b", 2), ("c", 3)]));
        assert_ne!(m, OrderedMap::from_entries([("c", 3), ("b", 2), ("a", 1)]));
        assert_ne!(m, OrderedMap::from_entries([("a", 1), ("b", 2)]));
    }

    #[test]
    fn slice_bounds_are_clamped() {
        let m = sample();
        assert_eq!(m.slice(1, Some(2)).len(), 1);
        assert_eq!(m.slice(0, None).len(), 3);
        assert_eq!(m.slice(5, Some(9)).len(), 0);
    }
}
