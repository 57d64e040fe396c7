//! Persistent association-list map.

/// An immutable map stored as an insertion-ordered association list.
///
/// Keys only need `PartialEq`, so a [`crate::Value`] — which is neither
/// `Ord` nor `Hash` — can key a map. Lookups are linear, which suits the
/// small keyed bags this library manipulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapValue<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq + Clone, V: Clone> MapValue<K, V> {
    pub fn new() -> Self {
        MapValue {
            entries: Vec::new(),
        }
    }

    /// Builds a map from `(key, value)` pairs. A later pair with a duplicate
    /// key replaces the earlier value in place.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = MapValue::new();
        for (k, v) in entries {
            map.insert_in_place(k, v);
        }
        map
    }

    fn insert_in_place(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Returns a new map with `key` bound to `value`. An existing binding
    /// keeps its position.
    pub fn set(&self, key: K, value: V) -> Self {
        let mut map = self.clone();
        map.insert_in_place(key, value);
        map
    }

    pub fn delete(&self, key: &K) -> Self {
        MapValue {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    pub fn map_values<R: Clone>(&self, mut f: impl FnMut(&K, &V) -> R) -> MapValue<K, R> {
        MapValue {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), f(k, v)))
                .collect(),
        }
    }

    pub fn filter(&self, mut f: impl FnMut(&K, &V) -> bool) -> Self {
        MapValue {
            entries: self
                .entries
                .iter()
                .filter(|(k, v)| f(k, v))
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|(k, v)| (k, v))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries.last().map(|(k, v)| (k, v))
    }
}

impl<K: PartialEq + Clone, V: Clone> Default for MapValue<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq + Clone, V: Clone> FromIterator<(K, V)> for MapValue<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_replaces_in_place() {
        let m = MapValue::from_entries([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&"a"), Some(&3));
        assert_eq!(m.first(), Some((&"a", &3)));
    }

    #[test]
    fn set_is_persistent() {
        let m = MapValue::from_entries([("a", 1)]);
        let n = m.set("a", 2);
        assert_eq!(m.get(&"a"), Some(&1));
        assert_eq!(n.get(&"a"), Some(&2));
    }

    #[test]
    fn delete_missing_key_is_noop() {
        let m = MapValue::from_entries([("a", 1)]).delete(&"zz");
        assert_eq!(m.len(), 1);
    }
}
