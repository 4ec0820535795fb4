//! Append-only storage for everything a container has pulled from its source.
//!
//! A cache decides what "storing" a pulled item means: the sequence cache
//! (`Vec<T>`) keeps everything, while the set and map caches reject items
//! that duplicate an earlier element or key. Every cache keeps its entries
//! in the order they were first stored, and exposes them by position so
//! that replay iterators can walk them while more are being appended.

mod map;
mod set;

pub use map::{LinearMap, OrderedMap};
pub use set::{LinearSet, OrderedSet};

/// The outcome of handing a pulled item to a cache.
#[derive(Debug, PartialEq, Eq)]
pub enum Inserted<T> {
    /// The item was stored as a new entry at the given position.
    New(usize),
    /// The item duplicates the entry at `existing`, and was not stored.
    Duplicate { existing: usize, rejected: T },
}

impl<T> Inserted<T> {
    /// The position of the entry that now represents the item.
    pub fn index(&self) -> usize {
        match self {
            Inserted::New(index) => *index,
            Inserted::Duplicate { existing, .. } => *existing,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Inserted::New(_))
    }
}

pub trait Cache<T> {
    type Entry;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entry stored at `index`, in first-stored order.
    fn entry(&self, index: usize) -> Option<&Self::Entry>;

    /// Stores `item` according to the cache's policy. New entries are always
    /// appended at the end.
    fn insert(&mut self, item: T) -> Inserted<T>;
}

/// A cache that drops elements equal to one it already holds.
pub trait SetCache<T>: Cache<T, Entry = T> {
    fn as_slice(&self) -> &[T];
}

/// Membership queries on a set cache by `Q`, a borrowed form of the element.
///
/// Hashed caches answer for any `Q: Hash + Eq`. Scanning caches only need
/// `Q: PartialEq`, so they can answer for elements such as `f64`.
pub trait SetLookup<T, Q>: SetCache<T>
where
    Q: ?Sized,
{
    fn contains(&self, value: &Q) -> bool;
}

/// A cache of key/value pairs where the first pair seen for a key wins.
pub trait MapCache<K, V>: Cache<(K, V), Entry = (K, V)> {
    fn as_slice(&self) -> &[(K, V)];
}

/// Key queries on a map cache by `Q`, a borrowed form of the key.
pub trait KeyLookup<K, V, Q>: MapCache<K, V>
where
    Q: ?Sized,
{
    /// Returns the position of the entry for `key`.
    fn find(&self, key: &Q) -> Option<usize>;

    fn get<'a>(&'a self, key: &Q) -> Option<&'a V>
    where
        K: 'a,
        V: 'a,
    {
        let index = self.find(key)?;
        self.as_slice().get(index).map(|(_, value)| value)
    }

    fn contains_key(&self, key: &Q) -> bool {
        self.find(key).is_some()
    }
}

/// The sequence cache keeps every item, duplicates included.
impl<T> Cache<T> for Vec<T> {
    type Entry = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn entry(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn insert(&mut self, item: T) -> Inserted<T> {
        self.push(item);
        Inserted::New(self.len() - 1)
    }
}
