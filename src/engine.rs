//! The pull-until-satisfied core shared by every container.
//!
//! An `Engine` owns a cursor over the source and the cache of everything the
//! cursor has produced. Every query a container answers comes down to one of
//! a handful of moves here: pull one item, pull a batch, pull until a new
//! entry appears, pull until an entry matches, or pull everything. Items are
//! always taken from the source in production order, and every pulled item
//! reaches the cache before the engine returns, including when an error is
//! reported.

use log::debug;

use crate::{
    cache::{Cache, Inserted},
    cursor::{Cursor, CursorState},
    error::{LiterError, Result},
};

pub(crate) struct Engine<I, C>
where
    I: Iterator,
{
    cursor: Cursor<I>,
    cache: C,
}

impl<I, C> Engine<I, C>
where
    I: Iterator,
{
    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn into_cache(self) -> C {
        self.cache
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn is_done(&self) -> bool {
        self.cursor.is_done()
    }
}

impl<I, C> Engine<I, C>
where
    I: Iterator,
    C: Cache<I::Item>,
{
    pub fn new(source: I, cache: C) -> Self {
        Engine {
            cursor: Cursor::new(source),
            cache,
        }
    }

    pub fn has_more(&mut self) -> bool {
        self.cursor.has_more()
    }

    /// Pulls exactly one item and hands it to the cache.
    pub fn pull(&mut self) -> Result<Inserted<I::Item>> {
        let item = self.cursor.pull()?;
        Ok(self.cache.insert(item))
    }

    /// Pulls `n` items, storing each as it arrives. If the source runs out
    /// first, everything that was pulled stays cached and the exhaustion is
    /// reported. On success, returns the outcome for the last item.
    pub fn pull_many(&mut self, n: usize) -> Result<Inserted<I::Item>> {
        if n == 0 {
            return Err(LiterError::new_invalid_argument(
                "Batch size must be positive.",
            ));
        }
        let mut last = self.pull()?;
        for _ in 1..n {
            last = self.pull()?;
        }
        Ok(last)
    }

    /// Pulls until an item is stored as a new entry, and returns its
    /// position. Returns `None` once the source is exhausted.
    pub fn try_advance(&mut self) -> Option<usize> {
        while self.cursor.has_more() {
            if let Ok(Inserted::New(index)) = self.pull() {
                return Some(index);
            }
        }
        None
    }

    /// Makes sure the cache holds an entry at `index`, pulling only as many
    /// items as needed. Returns `false` if the source ran out first.
    pub fn fill_to(&mut self, index: usize) -> bool {
        while self.cache.len() <= index {
            if self.try_advance().is_none() {
                return false;
            }
        }
        true
    }

    /// Pulls until a newly stored entry satisfies `predicate`, and returns
    /// its position. Entries already in the cache are not examined, and
    /// pulled duplicates never match.
    pub fn locate<P>(&mut self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&C::Entry) -> bool,
    {
        while let Some(index) = self.try_advance() {
            if self.cache.entry(index).is_some_and(&mut predicate) {
                return Some(index);
            }
        }
        None
    }

    /// Pulls every remaining item into the cache. Does nothing once done.
    pub fn drain_all(&mut self) {
        if self.cursor.is_done() {
            return;
        }
        let mut drained = 0usize;
        while self.cursor.pull().map(|item| self.cache.insert(item)).is_ok() {
            drained += 1;
        }
        debug!(
            "Drained {} items, cache holds {} entries",
            drained,
            self.cache.len()
        );
    }
}

impl<I, C> std::fmt::Debug for Engine<I, C>
where
    I: Iterator,
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("cursor", &self.cursor)
            .field("cache", &self.cache)
            .finish()
    }
}
