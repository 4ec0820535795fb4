use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
};

use hashbrown::HashTable;

use super::{Cache, Inserted, KeyLookup, MapCache};

/// A hash-indexed map that remembers the order keys were first inserted.
/// Inserting a key that is already present leaves the stored value alone.
#[derive(Clone)]
pub struct OrderedMap<K, V, S = RandomState> {
    entries: Vec<(K, V)>,
    // Positions into `entries`, hashed by the key they point at.
    index: HashTable<usize>,
    hasher: S,
}

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            entries: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
            hasher: RandomState::new(),
        }
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self
    where
        S: BuildHasher,
    {
        OrderedMap {
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

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn into_vec(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Cache<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Entry = (K, V);

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> Option<&(K, V)> {
        self.entries.get(index)
    }

    fn insert(&mut self, item: (K, V)) -> Inserted<(K, V)> {
        let hash = self.hasher.hash_one(&item.0);
        let entries = &self.entries;
        if let Some(&existing) = self.index.find(hash, |&i| entries[i].0 == item.0) {
            return Inserted::Duplicate {
                existing,
                rejected: item,
            };
        }
        let position = self.entries.len();
        self.entries.push(item);
        let (entries, hasher) = (&self.entries, &self.hasher);
        self.index
            .insert_unique(hash, position, |&i| hasher.hash_one(&entries[i].0));
        Inserted::New(position)
    }
}

impl<K, V, S> MapCache<K, V> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn as_slice(&self) -> &[(K, V)] {
        &self.entries
    }
}

impl<K, V, Q, S> KeyLookup<K, V, Q> for OrderedMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    fn find(&self, key: &Q) -> Option<usize> {
        let hash = self.hasher.hash_one(key);
        self.index
            .find(hash, |&i| Borrow::<Q>::borrow(&self.entries[i].0) == key)
            .copied()
    }
}

impl<K, V, S> std::fmt::Debug for OrderedMap<K, V, S>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A map that finds existing keys by scanning.
#[derive(Clone, Debug, Default)]
pub struct LinearMap<K, V>(Vec<(K, V)>);

impl<K, V> LinearMap<K, V> {
    pub fn new() -> Self {
        LinearMap(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<(K, V)> {
        self.0
    }
}

impl<K, V> Cache<(K, V)> for LinearMap<K, V>
where
    K: PartialEq,
{
    type Entry = (K, V);

    fn len(&self) -> usize {
        self.0.len()
    }

    fn entry(&self, index: usize) -> Option<&(K, V)> {
        self.0.get(index)
    }

    fn insert(&mut self, item: (K, V)) -> Inserted<(K, V)> {
        match self.0.iter().position(|(key, _)| *key == item.0) {
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

impl<K, V> MapCache<K, V> for LinearMap<K, V>
where
    K: PartialEq,
{
    fn as_slice(&self) -> &[(K, V)] {
        &self.0
    }
}

impl<K, V, Q> KeyLookup<K, V, Q> for LinearMap<K, V>
where
    K: PartialEq + Borrow<Q>,
    Q: ?Sized + PartialEq,
{
    fn find(&self, key: &Q) -> Option<usize> {
        self.0.iter().position(|(k, _)| Borrow::<Q>::borrow(k) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_key_wins() {
        let mut map = OrderedMap::new();
        assert!(map.insert(("a", 1)).is_new());
        assert!(map.insert(("b", 2)).is_new());
        assert_eq!(
            map.insert(("a", 9)),
            Inserted::Duplicate {
                existing: 0,
                rejected: ("a", 9)
            }
        );
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));
        assert_eq!(map.get("c"), None);
        assert_eq!(map.as_slice(), &[("a", 1), ("b", 2)]);
    }

    #[test]
    fn owned_keys_are_found_by_borrowed_lookup() {
        let mut map = OrderedMap::new();
        map.insert((String::from("one"), 1));
        map.insert((String::from("two"), 2));
        assert_eq!(map.find("two"), Some(1));
        assert!(map.contains_key("one"));
        assert!(!map.contains_key("three"));
    }

    #[test]
    fn linear_map_keeps_the_first_value() {
        let mut map = LinearMap::new();
        map.insert((1, 'x'));
        map.insert((2, 'y'));
        assert!(!map.insert((1, 'z')).is_new());
        assert_eq!(map.get(&1), Some(&'x'));
        assert_eq!(map.into_vec(), vec![(1, 'x'), (2, 'y')]);
    }

    #[test]
    fn linear_map_looks_up_unhashable_keys() {
        let mut map = LinearMap::new();
        map.insert((0.25, "quarter"));
        map.insert((0.5, "half"));
        map.insert((0.25, "again"));
        assert_eq!(map.find(&0.5), Some(1));
        assert_eq!(map.get(&0.25), Some(&"quarter"));
        assert!(!map.contains_key(&1.0));
    }

    #[test]
    fn get_borrows_from_the_cache() {
        let mut map = OrderedMap::new();
        map.insert((String::from("k"), vec![1, 2, 3]));
        let value: &Vec<i32> = map.get("k").unwrap();
        assert_eq!(value.len(), 3);
        assert_eq!(map.get("missing"), None);
    }
}
