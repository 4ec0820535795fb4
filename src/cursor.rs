//! The forward-only position within a wrapped source.
//!
//! A cursor is either `Live` or `Done`. It starts out by probing the source
//! once, and moves to `Done` the first time a pull finds the source empty.
//! Nothing ever moves it back.

use std::iter::Fuse;

use log::trace;

use crate::error::{LiterError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CursorState {
    Live,
    Done,
}

pub(crate) struct Cursor<I>
where
    I: Iterator,
{
    source: Fuse<I>,
    /// An item produced while answering `has_more`, not yet handed out.
    lookahead: Option<I::Item>,
    state: CursorState,
}

impl<I> Cursor<I>
where
    I: Iterator,
{
    pub fn new(source: I) -> Self {
        let mut cursor = Cursor {
            source: source.fuse(),
            lookahead: None,
            state: CursorState::Live,
        };
        cursor.has_more();
        cursor
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == CursorState::Done
    }

    /// Returns whether another item can be pulled. This may produce one item
    /// from the source, which is kept until the next `pull`.
    pub fn has_more(&mut self) -> bool {
        if self.lookahead.is_some() {
            return true;
        }
        if self.is_done() {
            return false;
        }
        match self.source.next() {
            Some(item) => {
                self.lookahead = Some(item);
                true
            }
            None => {
                self.finish();
                false
            }
        }
    }

    pub fn pull(&mut self) -> Result<I::Item> {
        if let Some(item) = self.lookahead.take() {
            return Ok(item);
        }
        if self.is_done() {
            return Err(LiterError::Exhausted);
        }
        match self.source.next() {
            Some(item) => Ok(item),
            None => {
                self.finish();
                Err(LiterError::Exhausted)
            }
        }
    }

    fn finish(&mut self) {
        trace!("Source has no more items, cursor is done");
        self.state = CursorState::Done;
    }
}

impl<I> std::fmt::Debug for Cursor<I>
where
    I: Iterator,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state)
            .field("has_lookahead", &self.lookahead.is_some())
            .finish()
    }
}
