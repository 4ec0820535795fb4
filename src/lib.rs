//! Containers backed by a single-pass source.
//!
//! [`LiterList`], [`LiterSet`] and [`LiterMap`] wrap an iterator and pull
//! from it only as far as each query needs. Every pulled element is cached,
//! so repeated queries, and any number of iterators over the same container,
//! never ask the source for the same element twice.
//!
//! The containers are single-threaded: queries take `&self` and mutate the
//! cache through a `RefCell`.

pub mod cache;
mod cursor;
mod engine;
pub mod error;
pub mod iter;
mod list;
mod map;
mod set;
pub mod util;

pub use cursor::CursorState;
pub use error::{LiterError, Result};
pub use list::LiterList;
pub use map::LiterMap;
pub use set::LiterSet;
pub use util::{into_liter::IntoLiter, sequence::Sequence};
