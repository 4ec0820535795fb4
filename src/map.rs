use std::{
    borrow::Borrow,
    cell::{Ref, RefCell},
    hash::Hash,
    iter::FromFn,
};

use crate::{
    cache::{Inserted, KeyLookup, MapCache, OrderedMap},
    cursor::CursorState,
    engine::Engine,
    error::Result,
    iter::Replay,
};

/// A key/value map backed by a single-pass source of pairs.
///
/// Keys keep the order of their first occurrence. When a key comes up again
/// later in the source, the pair is consumed but the value stored for the
/// first occurrence is kept.
pub struct LiterMap<I, C>
where
    I: Iterator,
{
    engine: RefCell<Engine<I, C>>,
}

impl<K, V, I> LiterMap<I, OrderedMap<K, V>>
where
    I: Iterator<Item = (K, V)>,
    K: Hash + Eq,
{
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self::with_cache(source, OrderedMap::new())
    }
}

impl<K, V, F> LiterMap<FromFn<F>, OrderedMap<K, V>>
where
    F: FnMut() -> Option<(K, V)>,
    K: Hash + Eq,
{
    /// Builds a map whose source calls `step` for each pair, until it
    /// returns `None`.
    pub fn from_fn(step: F) -> Self {
        Self::new(std::iter::from_fn(step))
    }
}

impl<K, V, I, C> LiterMap<I, C>
where
    I: Iterator<Item = (K, V)>,
    C: MapCache<K, V>,
{
    pub fn with_cache<S>(source: S, cache: C) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        LiterMap {
            engine: RefCell::new(Engine::new(source.into_iter(), cache)),
        }
    }

    pub fn state(&self) -> CursorState {
        self.engine.borrow().state()
    }

    /// Whether the source is known to have no more pairs. This only becomes
    /// `true` once a pull or [`has_next`](Self::has_next) has observed the
    /// end, so it can still be `false` right after the last pair was read.
    pub fn is_exhausted(&self) -> bool {
        self.engine.borrow().is_done()
    }

    pub fn has_next(&self) -> bool {
        self.engine.borrow_mut().has_more()
    }

    /// Every entry stored so far, in first-occurrence order of the keys.
    pub fn cached(&self) -> Ref<'_, [(K, V)]> {
        Ref::map(self.engine.borrow(), |engine| engine.cache().as_slice())
    }

    /// Pulls the next pair from the source and returns it as it was
    /// produced, even if its key was already present.
    pub fn read(&self) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let mut engine = self.engine.borrow_mut();
        match engine.pull()? {
            Inserted::New(index) => Ok(engine.cache().as_slice()[index].clone()),
            Inserted::Duplicate { rejected, .. } => Ok(rejected),
        }
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

    /// Finds the entry for `key`, pulling only until it turns up.
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        C: KeyLookup<K, V, Q>,
        K: Borrow<Q>,
        Q: ?Sized + PartialEq,
    {
        let mut engine = self.engine.borrow_mut();
        if let Some(index) = engine.cache().find(key) {
            return Some(index);
        }
        engine.locate(|(k, _)| Borrow::<Q>::borrow(k) == key)
    }

    /// Finds the first entry holding `value`, pulling only until it turns
    /// up. Only stored values count: a pair dropped because its key was
    /// already present never matches.
    fn find_value(&self, value: &V) -> Option<usize>
    where
        V: PartialEq,
    {
        let mut engine = self.engine.borrow_mut();
        if let Some(index) = engine.cache().as_slice().iter().position(|(_, v)| v == value) {
            return Some(index);
        }
        engine.locate(|(_, v)| v == value)
    }

    fn entry_at(&self, index: usize) -> Ref<'_, (K, V)> {
        Ref::map(self.engine.borrow(), |engine| {
            &engine.cache().as_slice()[index]
        })
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        C: KeyLookup<K, V, Q>,
        K: Borrow<Q>,
        Q: ?Sized + PartialEq,
        V: Clone,
    {
        let index = self.find(key)?;
        Some(self.entry_at(index).1.clone())
    }

    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        C: KeyLookup<K, V, Q>,
        K: Borrow<Q>,
        Q: ?Sized + PartialEq,
        V: Clone,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        C: KeyLookup<K, V, Q>,
        K: Borrow<Q>,
        Q: ?Sized + PartialEq,
    {
        self.find(key).is_some()
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.find_value(value).is_some()
    }

    /// Returns the key of the first entry holding `value`.
    pub fn key_of(&self, value: &V) -> Option<K>
    where
        K: Clone,
        V: PartialEq,
    {
        let index = self.find_value(value)?;
        Some(self.entry_at(index).0.clone())
    }

    /// Whether the map holds `value` under `key`.
    pub fn contains_entry<Q>(&self, key: &Q, value: &V) -> bool
    where
        C: KeyLookup<K, V, Q>,
        K: Borrow<Q>,
        Q: ?Sized + PartialEq,
        V: PartialEq,
    {
        self.find(key)
            .is_some_and(|index| self.entry_at(index).1 == *value)
    }

    /// Drains the source and returns every key.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.read_all();
        self.cached().iter().map(|(key, _)| key.clone()).collect()
    }

    /// Drains the source and returns every stored value.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.read_all();
        self.cached().iter().map(|(_, value)| value.clone()).collect()
    }

    /// Iterates over the entries, pulling lazily.
    pub fn iter(&self) -> Replay<'_, I, C> {
        Replay::new(&self.engine, 0)
    }

    pub fn entries(&self) -> Replay<'_, I, C> {
        self.iter()
    }

    /// Drains the source and returns the cache holding every entry.
    pub fn into_map(self) -> C {
        let mut engine = self.engine.into_inner();
        engine.drain_all();
        engine.into_cache()
    }
}

impl<'a, K, V, I, C> IntoIterator for &'a LiterMap<I, C>
where
    I: Iterator<Item = (K, V)>,
    C: MapCache<K, V>,
    K: Clone,
    V: Clone,
{
    type Item = (K, V);
    type IntoIter = Replay<'a, I, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I, C> std::fmt::Debug for LiterMap<I, C>
where
    I: Iterator,
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.engine.try_borrow() {
            Ok(engine) => f
                .debug_struct("LiterMap")
                .field("cached", engine.cache())
                .field("state", &engine.state())
                .finish(),
            Err(_) => f.debug_struct("LiterMap").finish_non_exhaustive(),
        }
    }
}
