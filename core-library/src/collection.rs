//! Dense integer-keyed collections
//!
//! Albums, singles and each album's songs all live in a [`Collection`]: an
//! insertion-ordered list of `(key, value)` pairs whose keys are kept as the
//! contiguous range `1..=len` by renumbering after every removal.

/// Insertion-ordered mapping from positive integer keys to values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T> {
    entries: Vec<(u32, T)>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from keyed entries as found in a stored document.
    ///
    /// Entries keep the given order. Returns the first repeated key as the
    /// error value.
    pub fn try_from_entries(entries: Vec<(u32, T)>) -> Result<Self, u32> {
        let mut seen = std::collections::HashSet::with_capacity(entries.len());
        for (key, _) in &entries {
            if !seen.insert(*key) {
                return Err(*key);
            }
        }
        Ok(Self { entries })
    }

    /// Build from keyed entries, ordering them by key and renumbering 1..N.
    ///
    /// Entries sharing a key keep their relative order.
    pub fn compacted(mut entries: Vec<(u32, T)>) -> Self {
        entries.sort_by_key(|(key, _)| *key);
        let mut collection = Self { entries };
        collection.reindex();
        collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: u32) -> Option<&T> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: u32) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// The key the next insertion will receive: one past the largest key.
    ///
    /// `None` once the largest key is `u32::MAX`, which only a stored
    /// document with trusted keys can produce.
    pub fn next_key(&self) -> Option<u32> {
        self.entries
            .iter()
            .map(|(k, _)| *k)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    /// Append `value` under [`next_key`](Self::next_key) and return that key.
    ///
    /// Returns `None` and drops `value` when no key is left.
    pub fn insert_next(&mut self, value: T) -> Option<u32> {
        let key = self.next_key()?;
        self.entries.push((key, value));
        Some(key)
    }

    /// Remove the entry under `key` and renumber the survivors.
    pub fn remove(&mut self, key: u32) -> Option<T> {
        let position = self.entries.iter().position(|(k, _)| *k == key)?;
        let (_, value) = self.entries.remove(position);
        self.reindex();
        Some(value)
    }

    /// Reassign keys 1..N following the current iteration order.
    ///
    /// The old key values play no part in the new order.
    pub fn reindex(&mut self) {
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.0 = position as u32 + 1;
        }
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<u32> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// `(key, value)` pairs in ascending key order.
    ///
    /// Insertion and renumbering keep the entries in key order, so this
    /// walks them in place. Only trusted keys loaded out of order need a
    /// sorted view, and the next renumbering restores key order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (u32, &T)> + '_> {
        let in_order = self.entries.iter().map(|(k, v)| (*k, v));
        if self.is_key_ordered() {
            return Box::new(in_order);
        }
        let mut sorted: Vec<(u32, &T)> = in_order.collect();
        sorted.sort_by_key(|(k, _)| *k);
        Box::new(sorted.into_iter())
    }

    fn is_key_ordered(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

impl<T: PartialEq> Collection<T> {
    /// Whether an equal value is already stored.
    pub fn contains_value(&self, value: &T) -> bool {
        self.entries.iter().any(|(_, v)| v == value)
    }
}
