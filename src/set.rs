use std::{
    borrow::Borrow,
    cell::{Ref, RefCell},
    hash::Hash,
    iter::FromFn,
};

use crate::{
    cache::{OrderedSet, SetCache, SetLookup},
    cursor::CursorState,
    engine::Engine,
    error::{LiterError, Result},
    iter::Replay,
};

/// A set backed by a single-pass source.
///
/// Elements keep the order of their first occurrence in the source. A
/// duplicate is still consumed from the source when it comes up, but is
/// never stored or returned.
pub struct LiterSet<I, C = OrderedSet<<I as Iterator>::Item>>
where
    I: Iterator,
{
    engine: RefCell<Engine<I, C>>,
}

impl<I> LiterSet<I>
where
    I: Iterator,
    I::Item: Hash + Eq,
{
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self::with_cache(source, OrderedSet::new())
    }
}

impl<T, F> LiterSet<FromFn<F>>
where
    F: FnMut() -> Option<T>,
    T: Hash + Eq,
{
    /// Builds a set whose source calls `step` for each element, until it
    /// returns `None`.
    pub fn from_fn(step: F) -> Self {
        Self::new(std::iter::from_fn(step))
    }
}

impl<I, C> LiterSet<I, C>
where
    I: Iterator,
    C: SetCache<I::Item>,
{
    /// Builds a set over `source` that stores into `cache`, e.g. a
    /// [`LinearSet`](crate::cache::LinearSet) for elements that cannot be
    /// hashed.
    pub fn with_cache<S>(source: S, cache: C) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        LiterSet {
            engine: RefCell::new(Engine::new(source.into_iter(), cache)),
        }
    }

    pub fn state(&self) -> CursorState {
        self.engine.borrow().state()
    }

    /// Whether the source is known to have no more elements. This only
    /// becomes `true` once a pull or [`has_next`](Self::has_next) has
    /// observed the end, so it can still be `false` right after the last
    /// element was read.
    pub fn is_exhausted(&self) -> bool {
        self.engine.borrow().is_done()
    }

    pub fn has_next(&self) -> bool {
        self.engine.borrow_mut().has_more()
    }

    /// Everything stored so far, in first-occurrence order.
    pub fn cached(&self) -> Ref<'_, [I::Item]> {
        Ref::map(self.engine.borrow(), |engine| engine.cache().as_slice())
    }

    /// Reads the next element not seen before, skipping duplicates.
    ///
    /// Returns `Ok(None)` if the source ran out while skipping, and
    /// [`LiterError::Exhausted`] if it was already known to be empty.
    pub fn read(&self) -> Result<Option<I::Item>>
    where
        I::Item: Clone,
    {
        let mut engine = self.engine.borrow_mut();
        if !engine.has_more() {
            return Err(LiterError::Exhausted);
        }
        Ok(engine
            .try_advance()
            .and_then(|index| engine.cache().entry(index).cloned()))
    }

    pub fn read_all(&self) {
        self.engine.borrow_mut().drain_all();
    }

    pub fn len(&self) -> usize {
        let mut engine = self.engine.borrow_mut();
        engine.drain_all();
        engine.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        let mut engine = self.engine.borrow_mut();
        engine.cache().is_empty() && !engine.has_more()
    }

    /// Pulls only until `value` turns up, or the source runs out.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        C: SetLookup<I::Item, Q>,
        I::Item: Borrow<Q>,
        Q: ?Sized + PartialEq,
    {
        let mut engine = self.engine.borrow_mut();
        engine.cache().contains(value)
            || engine
                .locate(|item| Borrow::<Q>::borrow(item) == value)
                .is_some()
    }

    pub fn contains_all<'v, Q, V>(&self, values: V) -> bool
    where
        V: IntoIterator<Item = &'v Q>,
        C: SetLookup<I::Item, Q>,
        I::Item: Borrow<Q>,
        Q: ?Sized + PartialEq + 'v,
    {
        values.into_iter().all(|value| self.contains(value))
    }

    pub fn iter(&self) -> Replay<'_, I, C> {
        Replay::new(&self.engine, 0)
    }

    /// Drains the source and returns the cache holding every distinct
    /// element.
    pub fn into_set(self) -> C {
        let mut engine = self.engine.into_inner();
        engine.drain_all();
        engine.into_cache()
    }
}

impl<'a, I, C> IntoIterator for &'a LiterSet<I, C>
where
    I: Iterator,
    I::Item: Clone,
    C: SetCache<I::Item>,
{
    type Item = I::Item;
    type IntoIter = Replay<'a, I, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I, C> std::fmt::Debug for LiterSet<I, C>
where
    I: Iterator,
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.engine.try_borrow() {
            Ok(engine) => f
                .debug_struct("LiterSet")
                .field("cached", engine.cache())
                .field("state", &engine.state())
                .finish(),
            Err(_) => f.debug_struct("LiterSet").finish_non_exhaustive(),
        }
    }
}
