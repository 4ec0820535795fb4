use std::{
    cell::{Ref, RefCell},
    iter::FromFn,
    ops::Range,
};

use crate::{
    cursor::CursorState,
    engine::Engine,
    error::{LiterError, Result},
    iter::Replay,
};

/// An ordered sequence backed by a single-pass source.
///
/// Elements are pulled from the source only when a query needs them, and
/// each is kept, duplicates included, so later queries are answered from
/// the cache. Queries that need to know every element, such as [`len`],
/// drain the source first.
///
/// Queries take `&self`. The container is not `Sync`, and calling back into
/// it from inside its own source, or while holding a view returned by
/// [`cached`] or [`sub_list`], panics.
///
/// [`len`]: LiterList::len
/// [`cached`]: LiterList::cached
/// [`sub_list`]: LiterList::sub_list
pub struct LiterList<I>
where
    I: Iterator,
{
    engine: RefCell<Engine<I, Vec<I::Item>>>,
}

impl<I> LiterList<I>
where
    I: Iterator,
{
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self::with_cache(source, Vec::new())
    }

    /// Builds a list over `source` that stores into `cache`. Anything already
    /// in `cache` is treated as having been pulled earlier.
    pub fn with_cache<S>(source: S, cache: Vec<I::Item>) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        LiterList {
            engine: RefCell::new(Engine::new(source.into_iter(), cache)),
        }
    }

    pub fn state(&self) -> CursorState {
        self.engine.borrow().state()
    }

    /// Whether the source is known to have no more elements.
    ///
    /// This only becomes `true` once a pull or [`has_next`](Self::has_next)
    /// has observed the end. Reading exactly the last element leaves it
    /// `false` until something looks past it.
    pub fn is_exhausted(&self) -> bool {
        self.engine.borrow().is_done()
    }

    /// Whether the source can produce another element.
    pub fn has_next(&self) -> bool {
        self.engine.borrow_mut().has_more()
    }

    /// Everything pulled so far, in production order.
    pub fn cached(&self) -> Ref<'_, [I::Item]> {
        Ref::map(self.engine.borrow(), |engine| engine.cache().as_slice())
    }

    /// Pulls the next element from the source.
    pub fn read(&self) -> Result<I::Item>
    where
        I::Item: Clone,
    {
        let mut engine = self.engine.borrow_mut();
        let index = engine.pull()?.index();
        Ok(engine.cache()[index].clone())
    }

    /// Pulls `n` elements and returns the last one. If the source runs out
    /// first, the elements that were pulled are kept and
    /// [`LiterError::Exhausted`] is returned.
    pub fn read_many(&self, n: usize) -> Result<I::Item>
    where
        I::Item: Clone,
    {
        let mut engine = self.engine.borrow_mut();
        let index = engine.pull_many(n)?.index();
        Ok(engine.cache()[index].clone())
    }

    pub fn read_all(&self) {
        self.engine.borrow_mut().drain_all();
    }

    pub fn len(&self) -> usize {
        let mut engine = self.engine.borrow_mut();
        engine.drain_all();
        engine.cache().len()
    }

    /// Never drains. At most one element is pulled to find out.
    pub fn is_empty(&self) -> bool {
        let mut engine = self.engine.borrow_mut();
        engine.cache().is_empty() && !engine.has_more()
    }

    pub fn get(&self, index: usize) -> Result<I::Item>
    where
        I::Item: Clone,
    {
        let mut engine = self.engine.borrow_mut();
        let cached = engine.cache().len();
        if index >= cached {
            let pulled = match (index - cached).checked_add(1) {
                Some(needed) => engine.pull_many(needed).map(drop),
                // No source can fill every position up to `usize::MAX`.
                None => {
                    engine.drain_all();
                    Err(LiterError::Exhausted)
                }
            };
            if let Err(err) = pulled {
                return Err(if err.is_exhausted() {
                    LiterError::new_out_of_range(index, engine.cache().len())
                } else {
                    err
                });
            }
        }
        Ok(engine.cache()[index].clone())
    }

    /// Returns the position of the first element equal to `value`, pulling
    /// only until it is found.
    pub fn index_of(&self, value: &I::Item) -> Option<usize>
    where
        I::Item: PartialEq,
    {
        let mut engine = self.engine.borrow_mut();
        if let Some(index) = engine.cache().iter().position(|item| item == value) {
            return Some(index);
        }
        engine.locate(|item| item == value)
    }

    /// Drains the source.
    pub fn last_index_of(&self, value: &I::Item) -> Option<usize>
    where
        I::Item: PartialEq,
    {
        let mut engine = self.engine.borrow_mut();
        engine.drain_all();
        engine.cache().iter().rposition(|item| item == value)
    }

    pub fn contains(&self, value: &I::Item) -> bool
    where
        I::Item: PartialEq,
    {
        self.index_of(value).is_some()
    }

    pub fn contains_all<'v, V>(&self, values: V) -> bool
    where
        V: IntoIterator<Item = &'v I::Item>,
        I::Item: PartialEq + 'v,
    {
        values.into_iter().all(|value| self.contains(value))
    }

    /// Returns a view of the elements in `range`, pulling up to its end.
    ///
    /// An empty or inverted range is an invalid argument. A range that ends
    /// past what the source can supply is out of range.
    pub fn sub_list(&self, range: Range<usize>) -> Result<Ref<'_, [I::Item]>> {
        if range.start >= range.end {
            return Err(LiterError::new_invalid_argument(format!(
                "Range {}..{} is empty.",
                range.start, range.end
            )));
        }
        {
            let mut engine = self.engine.borrow_mut();
            if !engine.fill_to(range.end - 1) {
                return Err(LiterError::new_out_of_range(
                    range.end - 1,
                    engine.cache().len(),
                ));
            }
        }
        Ok(Ref::map(self.engine.borrow(), |engine| {
            &engine.cache()[range]
        }))
    }

    pub fn iter(&self) -> Replay<'_, I, Vec<I::Item>> {
        Replay::new(&self.engine, 0)
    }

    /// Returns an iterator whose first element is the one at `index`.
    /// `index` may equal the length, giving an iterator that is already at
    /// its end.
    pub fn iter_from(&self, index: usize) -> Result<Replay<'_, I, Vec<I::Item>>> {
        if index > 0 && !self.engine.borrow_mut().fill_to(index - 1) {
            return Err(LiterError::new_out_of_range(
                index,
                self.engine.borrow().cache().len(),
            ));
        }
        Ok(Replay::new(&self.engine, index))
    }

    /// Drains the source and returns every element in production order.
    pub fn into_vec(self) -> Vec<I::Item> {
        let mut engine = self.engine.into_inner();
        engine.drain_all();
        engine.into_cache()
    }
}

impl<T, F> LiterList<FromFn<F>>
where
    F: FnMut() -> Option<T>,
{
    /// Builds a list whose source calls `step` for each element, until it
    /// returns `None`.
    pub fn from_fn(step: F) -> Self {
        Self::new(std::iter::from_fn(step))
    }
}

impl<'a, I> IntoIterator for &'a LiterList<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;
    type IntoIter = Replay<'a, I, Vec<I::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I> std::fmt::Debug for LiterList<I>
where
    I: Iterator,
    I::Item: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.engine.try_borrow() {
            Ok(engine) => f
                .debug_struct("LiterList")
                .field("cached", engine.cache())
                .field("state", &engine.state())
                .finish(),
            Err(_) => f.debug_struct("LiterList").finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::counting;

    #[test]
    fn materializes_in_order() {
        let list = LiterList::new(vec![1, 2, 2, 3]);
        assert_eq!(list.len(), 4);
        assert_eq!(list.into_vec(), vec![1, 2, 2, 3]);
    }

    #[test]
    fn index_of_stops_at_the_match() {
        let (source, pulled) = counting(vec![1, 2, 2, 3, 4, 5]);
        let list = LiterList::new(source);
        assert_eq!(list.index_of(&3), Some(3));
        assert_eq!(&*list.cached(), &[1, 2, 2, 3]);
        assert_eq!(pulled(), 4);
        assert!(!list.is_exhausted());
    }

    #[test]
    fn index_of_finds_cached_first_element() {
        let list = LiterList::new(vec![9, 8, 9]);
        list.read_all();
        assert_eq!(list.index_of(&9), Some(0));
        assert_eq!(list.last_index_of(&9), Some(2));
        assert_eq!(list.index_of(&1), None);
    }

    #[test]
    fn get_pulls_exactly_up_to_the_index() -> anyhow::Result<()> {
        let list = LiterList::new(10..);
        assert_eq!(list.get(3)?, 13);
        assert_eq!(list.cached().len(), 4);
        assert_eq!(list.get(1)?, 11);
        assert_eq!(list.cached().len(), 4);
        Ok(())
    }

    #[test]
    fn get_past_the_end_is_out_of_range() {
        let list = LiterList::new(vec!['a', 'b', 'c']);
        assert_eq!(list.get(2), Ok('c'));
        assert_eq!(list.get(3), Err(LiterError::new_out_of_range(3, 3)));
        assert_eq!(list.get(10), Err(LiterError::new_out_of_range(10, 3)));
        for (i, c) in ['a', 'b', 'c'].into_iter().enumerate() {
            assert_eq!(list.get(i), Ok(c));
        }
    }

    #[test]
    fn get_at_the_largest_index_drains_instead_of_overflowing() {
        let list = LiterList::new(vec![1, 2, 3]);
        assert_eq!(
            list.get(usize::MAX),
            Err(LiterError::new_out_of_range(usize::MAX, 3))
        );
        assert!(list.is_exhausted());
        assert_eq!(list.get(1), Ok(2));
        assert_eq!(
            list.get(usize::MAX),
            Err(LiterError::new_out_of_range(usize::MAX, 3))
        );
    }

    #[test]
    fn exhaustion_is_seen_only_past_the_last_element() {
        let list = LiterList::new(vec![1, 2, 3]);
        assert_eq!(list.read_many(3), Ok(3));
        assert!(!list.is_exhausted());
        assert!(!list.has_next());
        assert!(list.is_exhausted());
        assert_eq!(list.state(), CursorState::Done);
    }

    #[test]
    fn batch_read_keeps_partial_progress() {
        let list = LiterList::new(vec![1, 2, 3]);
        assert_eq!(list.read(), Ok(1));
        assert_eq!(list.read_many(3), Err(LiterError::Exhausted));
        assert_eq!(&*list.cached(), &[1, 2, 3]);
        assert_eq!(list.read(), Err(LiterError::Exhausted));
        assert!(matches!(
            list.read_many(0),
            Err(LiterError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn is_empty_does_not_drain() {
        let (source, pulled) = counting(vec![1, 2, 3]);
        let list = LiterList::new(source);
        assert!(!list.is_empty());
        assert!(pulled() <= 1);
        assert!(LiterList::new(Vec::<i32>::new()).is_empty());
    }

    #[test]
    fn sub_list_bounds() -> anyhow::Result<()> {
        let list = LiterList::new(0..6);
        assert_eq!(&*list.sub_list(1..3)?, &[1, 2]);
        assert_eq!(list.cached().len(), 3);
        assert!(matches!(
            list.sub_list(3..3),
            Err(LiterError::InvalidArgument { .. })
        ));
        assert!(matches!(
            list.sub_list(4..2),
            Err(LiterError::InvalidArgument { .. })
        ));
        assert_eq!(
            list.sub_list(2..8).map(|view| view.to_vec()),
            Err(LiterError::new_out_of_range(7, 6))
        );
        assert_eq!(&*list.sub_list(4..6)?, &[4, 5]);
        Ok(())
    }

    #[test]
    fn iterators_interleave_without_loss() {
        let list = LiterList::new(vec![3, 1, 4, 1, 5, 9]);
        let mut first = list.iter();
        let mut second = list.iter();
        assert_eq!(first.next(), Some(3));
        assert_eq!(second.next(), Some(3));
        let rest_of_first: Vec<_> = first.collect();
        assert_eq!(rest_of_first, vec![1, 4, 1, 5, 9]);
        let rest_of_second: Vec<_> = second.collect();
        assert_eq!(rest_of_second, vec![1, 4, 1, 5, 9]);
        assert!(list.is_exhausted());
    }

    #[test]
    fn iteration_after_queries_yields_the_whole_source() {
        let list = LiterList::new(vec![5, 6, 7, 8]);
        list.get(1).ok();
        list.contains(&7);
        let all: Vec<_> = (&list).into_iter().collect();
        assert_eq!(all, vec![5, 6, 7, 8]);
    }

    #[test]
    fn iter_from_starts_at_the_index() -> anyhow::Result<()> {
        let list = LiterList::new("abcd".chars());
        let tail: String = list.iter_from(2)?.collect();
        assert_eq!(tail, "cd");
        assert_eq!(list.iter_from(4)?.next(), None);
        assert_eq!(
            list.iter_from(5).map(|it| it.next_index()),
            Err(LiterError::new_out_of_range(5, 4))
        );
        Ok(())
    }

    #[test]
    fn from_fn_drives_the_step_function() {
        let mut n = 0;
        let list = LiterList::from_fn(|| {
            n += 1;
            (n <= 3).then_some(n * n)
        });
        assert!(list.contains_all(&[1, 9]));
        assert_eq!(list.len(), 3);
        assert!(!list.contains(&16));
    }

    #[test]
    fn existing_cache_counts_as_pulled() {
        let list = LiterList::with_cache(vec![3, 4], vec![1, 2]);
        assert_eq!(list.get(0), Ok(1));
        assert_eq!(list.into_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    #[should_panic]
    fn holding_a_view_while_pulling_panics() {
        let list = LiterList::new(0..10);
        let _view = list.cached();
        list.read_all();
    }
}
