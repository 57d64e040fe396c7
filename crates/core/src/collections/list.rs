//! Persistent list.

/// An immutable ordered sequence. Every "mutating" operation returns a new
/// list; the receiver is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<V> {
    data: Vec<V>,
}

impl<V: Clone> List<V> {
    pub fn new() -> Self {
        List { data: Vec::new() }
    }

    pub fn from_vec(data: Vec<V>) -> Self {
        List { data }
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.data.get(index)
    }

    /// Returns a new list with `value` at `index`. An out-of-range index
    /// appends instead.
    pub fn set(&self, index: usize, value: V) -> Self {
        let mut data = self.data.clone();
        if index < data.len() {
            data[index] = value;
        } else {
            data.push(value);
        }
        List { data }
    }

    pub fn push(&self, value: V) -> Self {
        let mut data = self.data.clone();
        data.push(value);
        List { data }
    }

    /// Returns a new list with `value` inserted at `index` (clamped to the
    /// length).
    pub fn insert(&self, index: usize, value: V) -> Self {
        let mut data = self.data.clone();
        data.insert(index.min(data.len()), value);
        List { data }
    }

    /// Returns a new list without the element at `index`; out-of-range
    /// indices are a no-op.
    pub fn delete(&self, index: usize) -> Self {
        let mut data = self.data.clone();
        if index < data.len() {
            data.remove(index);
        }
        List { data }
    }

    pub fn concat(&self, other: &Self) -> Self {
        let mut data = self.data.clone();
        data.extend(other.data.iter().cloned());
        List { data }
    }

    pub fn slice(&self, start: usize, end: Option<usize>) -> Self {
        let end = end.unwrap_or(self.data.len()).min(self.data.len());
        let start = start.min(end);
        List {
            data: self.data[start..end].to_vec(),
        }
    }

    pub fn map<R: Clone>(&self, f: impl FnMut(&V) -> R) -> List<R> {
        List {
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn filter(&self, mut f: impl FnMut(&V) -> bool) -> Self {
        List {
            data: self.data.iter().filter(|v| f(v)).cloned().collect(),
        }
    }

    pub fn find(&self, pred: impl FnMut(&&V) -> bool) -> Option<&V> {
        self.data.iter().find(pred)
    }

    pub fn position(&self, pred: impl FnMut(&V) -> bool) -> Option<usize> {
        self.data.iter().position(pred)
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.data.iter()
    }

    pub fn to_vec(&self) -> Vec<V> {
        self.data.clone()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&V> {
        self.data.first()
    }

    pub fn last(&self) -> Option<&V> {
        self.data.last()
    }
}

impl<V: Clone> Default for List<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> FromIterator<V> for List<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        List {
            data: iter.into_iter().collect(),
        }
    }
}
