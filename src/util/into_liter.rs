use std::hash::Hash;

use crate::{cache::OrderedMap, list::LiterList, map::LiterMap, set::LiterSet};

/// Wraps any iterable in a lazily filled container.
pub trait IntoLiter: IntoIterator + Sized {
    fn into_liter_list(self) -> LiterList<Self::IntoIter> {
        LiterList::new(self)
    }

    fn into_liter_set(self) -> LiterSet<Self::IntoIter>
    where
        Self::Item: Hash + Eq,
    {
        LiterSet::new(self)
    }

    fn into_liter_map<K, V>(self) -> LiterMap<Self::IntoIter, OrderedMap<K, V>>
    where
        Self: IntoIterator<Item = (K, V)>,
        K: Hash + Eq,
    {
        LiterMap::new(self)
    }
}

impl<T> IntoLiter for T where T: IntoIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_iterators_and_collections() {
        let list = (1..).map(|x| x * 10).into_liter_list();
        assert_eq!(list.get(2), Ok(30));

        let set = vec!['z', 'z', 'y'].into_liter_set();
        assert_eq!(set.len(), 2);

        let map = [(1, "one"), (2, "two")].into_liter_map();
        assert_eq!(map.get(&2), Some("two"));
    }
}
