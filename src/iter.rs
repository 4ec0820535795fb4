//! Iteration over a lazily filled container.
//!
//! A [`Replay`] first walks the entries already in the container's cache,
//! then keeps pulling fresh ones from the source. Any number of replays may
//! be alive over one container at once. They all read the same cache, so an
//! entry pulled by one of them is simply replayed by the others when they
//! reach it, and the source is never asked for it again.

use std::{cell::RefCell, iter::FusedIterator};

use crate::{cache::Cache, engine::Engine};

pub struct Replay<'a, I, C>
where
    I: Iterator,
{
    engine: &'a RefCell<Engine<I, C>>,
    position: usize,
}

impl<'a, I, C> Replay<'a, I, C>
where
    I: Iterator,
    C: Cache<I::Item>,
{
    /// `position` must not be past the end of the cache.
    pub(crate) fn new(engine: &'a RefCell<Engine<I, C>>, position: usize) -> Self {
        debug_assert!(position <= engine.borrow().cache().len());
        Replay { engine, position }
    }

    /// The position of the entry the next call to `next` returns.
    pub fn next_index(&self) -> usize {
        self.position
    }

    /// Returns whether `next` would produce an entry. If answering needs a
    /// fresh entry from the source, that entry is cached and will be the one
    /// `next` returns.
    pub fn has_more(&self) -> bool {
        self.engine.borrow_mut().fill_to(self.position)
    }

    /// Steps back one entry and returns it. Entries before the current
    /// position are always cached, so this never touches the source.
    pub fn prev(&mut self) -> Option<C::Entry>
    where
        C::Entry: Clone,
    {
        let position = self.position.checked_sub(1)?;
        let entry = self.engine.borrow().cache().entry(position).cloned()?;
        self.position = position;
        Some(entry)
    }
}

impl<'a, I, C> Iterator for Replay<'a, I, C>
where
    I: Iterator,
    C: Cache<I::Item>,
    C::Entry: Clone,
{
    type Item = C::Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let mut engine = self.engine.borrow_mut();
        if !engine.fill_to(self.position) {
            return None;
        }
        let entry = engine.cache().entry(self.position).cloned()?;
        self.position += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let engine = self.engine.borrow();
        let cached = engine.cache().len().saturating_sub(self.position);
        if engine.is_done() {
            (cached, Some(cached))
        } else {
            (cached, None)
        }
    }
}

impl<'a, I, C> FusedIterator for Replay<'a, I, C>
where
    I: Iterator,
    C: Cache<I::Item>,
    C::Entry: Clone,
{
}

impl<'a, I, C> std::fmt::Debug for Replay<'a, I, C>
where
    I: Iterator,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replay")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cache::OrderedSet, engine::tests::counting};

    #[test]
    fn replays_then_pulls() {
        let engine = RefCell::new(Engine::new(1..=5, Vec::new()));
        engine.borrow_mut().fill_to(1);
        let items: Vec<_> = Replay::new(&engine, 0).collect();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert!(engine.borrow().is_done());
    }

    #[test]
    fn interleaved_replays_share_progress() {
        let (source, pulled) = counting(vec!['a', 'b', 'c', 'd']);
        let engine = RefCell::new(Engine::new(source, Vec::new()));
        let mut first = Replay::new(&engine, 0);
        let mut second = Replay::new(&engine, 0);

        assert_eq!(first.next(), Some('a'));
        assert_eq!(first.next(), Some('b'));
        assert_eq!(first.next(), Some('c'));
        let after_first = pulled();
        assert_eq!(second.next(), Some('a'));
        assert_eq!(second.next(), Some('b'));
        assert_eq!(second.next(), Some('c'));
        // The second replay never went back to the source.
        assert_eq!(pulled(), after_first);

        assert_eq!(second.next(), Some('d'));
        assert_eq!(first.next(), Some('d'));
        assert_eq!(first.next(), None);
        assert_eq!(second.next(), None);
    }

    #[test]
    fn has_more_does_not_skip() {
        let engine = RefCell::new(Engine::new([7, 7, 8].into_iter(), OrderedSet::new()));
        let mut replay = Replay::new(&engine, 0);
        assert!(replay.has_more());
        assert!(replay.has_more());
        assert_eq!(replay.next(), Some(7));
        assert!(replay.has_more());
        assert_eq!(replay.next(), Some(8));
        assert!(!replay.has_more());
        assert_eq!(replay.next(), None);
    }

    #[test]
    fn prev_walks_back_over_the_cache() {
        let engine = RefCell::new(Engine::new(0..3, Vec::new()));
        let mut replay = Replay::new(&engine, 0);
        assert_eq!(replay.prev(), None);
        replay.next();
        replay.next();
        assert_eq!(replay.next_index(), 2);
        assert_eq!(replay.prev(), Some(1));
        assert_eq!(replay.next(), Some(1));
    }

    #[test]
    fn size_hint_is_exact_once_done() {
        let engine = RefCell::new(Engine::new(0..3, Vec::new()));
        engine.borrow_mut().drain_all();
        let mut replay = Replay::new(&engine, 0);
        replay.next();
        assert_eq!(replay.size_hint(), (2, Some(2)));
    }
}
