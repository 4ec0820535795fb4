//! Handing a container's materialized contents over to plain collections.

use crate::{
    cache::{MapCache, SetCache},
    list::LiterList,
    map::LiterMap,
    set::LiterSet,
};

/// A container that can be drained and moved out as a sequence of owned
/// elements, in cache order.
pub trait Sequence<T> {
    fn collect<C>(self) -> C
    where
        C: FromIterator<T>;

    fn extend_into<C>(self, target: &mut C)
    where
        C: Extend<T>;
}

impl<I> Sequence<I::Item> for LiterList<I>
where
    I: Iterator,
{
    fn collect<C>(self) -> C
    where
        C: FromIterator<I::Item>,
    {
        self.into_vec().into_iter().collect()
    }

    fn extend_into<C>(self, target: &mut C)
    where
        C: Extend<I::Item>,
    {
        target.extend(self.into_vec());
    }
}

impl<I, S> Sequence<I::Item> for LiterSet<I, S>
where
    I: Iterator,
    S: SetCache<I::Item> + IntoIterator<Item = I::Item>,
{
    fn collect<C>(self) -> C
    where
        C: FromIterator<I::Item>,
    {
        self.into_set().into_iter().collect()
    }

    fn extend_into<C>(self, target: &mut C)
    where
        C: Extend<I::Item>,
    {
        target.extend(self.into_set());
    }
}

impl<K, V, I, M> Sequence<(K, V)> for LiterMap<I, M>
where
    I: Iterator<Item = (K, V)>,
    M: MapCache<K, V> + IntoIterator<Item = (K, V)>,
{
    fn collect<C>(self) -> C
    where
        C: FromIterator<(K, V)>,
    {
        self.into_map().into_iter().collect()
    }

    fn extend_into<C>(self, target: &mut C)
    where
        C: Extend<(K, V)>,
    {
        target.extend(self.into_map());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use super::*;

    #[test]
    fn list_into_any_collection() {
        let list = LiterList::new(vec![2, 1, 2]);
        let set: BTreeSet<i32> = Sequence::collect(list);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn set_extends_in_first_occurrence_order() {
        let set = LiterSet::new("banana".chars());
        let mut out = String::from(">");
        set.extend_into(&mut out);
        assert_eq!(out, ">ban");
    }

    #[test]
    fn map_keeps_first_values() {
        let map = LiterMap::new(vec![("k", 1), ("j", 2), ("k", 3)]);
        let plain: HashMap<_, _> = Sequence::collect(map);
        assert_eq!(plain.len(), 2);
        assert_eq!(plain["k"], 1);
    }

    #[test]
    fn nothing_produced_gives_an_empty_collection() {
        let list = LiterList::new(std::iter::empty::<u8>());
        let out: Vec<u8> = Sequence::collect(list);
        assert!(out.is_empty());
    }
}
