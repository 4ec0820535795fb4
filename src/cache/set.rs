use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
};

use hashbrown::HashTable;

use super::{Cache, Inserted, SetCache, SetLookup};

/// A hash-indexed set that remembers the order elements were first inserted.
#[derive(Clone)]
pub struct OrderedSet<T, S = RandomState> {
    entries: Vec<T>,
    // Positions into `entries`, hashed by the entry they point at.
    index: HashTable<usize>,
    hasher: S,
}

impl<T> OrderedSet<T> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OrderedSet {
            entries: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
            hasher: RandomState::new(),
        }
    }
}

impl<T, S> OrderedSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self
    where
        S: BuildHasher,
    {
        OrderedSet {
            entries: Vec::new(),
            index: HashTable::new(),
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Cache<T> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Entry = T;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    fn insert(&mut self, item: T) -> Inserted<T> {
        let hash = self.hasher.hash_one(&item);
        let entries = &self.entries;
        if let Some(&existing) = self.index.find(hash, |&i| entries[i] == item) {
            return Inserted::Duplicate {
                existing,
                rejected: item,
            };
        }
        let position = self.entries.len();
        self.entries.push(item);
        let (entries, hasher) = (&self.entries, &self.hasher);
        self.index
            .insert_unique(hash, position, |&i| hasher.hash_one(&entries[i]));
        Inserted::New(position)
    }
}

impl<T, S> SetCache<T> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn as_slice(&self) -> &[T] {
        &self.entries
    }
}

impl<T, Q, S> SetLookup<T, Q> for OrderedSet<T, S>
where
    T: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    fn contains(&self, value: &Q) -> bool {
        let hash = self.hasher.hash_one(value);
        self.index
            .find(hash, |&i| Borrow::<Q>::borrow(&self.entries[i]) == value)
            .is_some()
    }
}

impl<T, S> std::fmt::Debug for OrderedSet<T, S>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.iter()).finish()
    }
}

impl<T, S> IntoIterator for OrderedSet<T, S> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A set that finds duplicates by scanning. Useful for element types that
/// can be compared but not hashed, or for very small sets.
#[derive(Clone, Debug, Default)]
pub struct LinearSet<T>(Vec<T>);

impl<T> LinearSet<T> {
    pub fn new() -> Self {
        LinearSet(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Cache<T> for LinearSet<T>
where
    T: PartialEq,
{
    type Entry = T;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn entry(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    fn insert(&mut self, item: T) -> Inserted<T> {
        match self.0.iter().position(|entry| *entry == item) {
            Some(existing) => Inserted::Duplicate {
                existing,
                rejected: item,
            },
            None => {
                self.0.push(item);
                Inserted::New(self.0.len() - 1)
            }
        }
    }
}

impl<T> SetCache<T> for LinearSet<T>
where
    T: PartialEq,
{
    fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T, Q> SetLookup<T, Q> for LinearSet<T>
where
    T: PartialEq + Borrow<Q>,
    Q: ?Sized + PartialEq,
{
    fn contains(&self, value: &Q) -> bool {
        self.0.iter().any(|entry| Borrow::<Q>::borrow(entry) == value)
    }
}
