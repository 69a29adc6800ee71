//! Restartable views over single-pass iterators.
//!
//! Directory scans are one-shot: a `ReadDir` cannot be rewound, and scanning
//! again may observe a different filesystem. [`Memoized`] pulls each element
//! from its source at most once and replays the recorded prefix to every
//! later cursor, so a `contains` check followed by a `find` sees the same
//! elements in the same order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct Storage<I: Iterator> {
    /// `None` once the source has reported exhaustion.
    source: Option<I>,
    cache: Vec<I::Item>,
}

/// A single-pass iterator turned into a sequence that can be walked any number
/// of times.
///
/// Clones share the same cache, so every handle to a platform or installation
/// observes one scan of the underlying directory.
pub struct Memoized<I: Iterator> {
    storage: Rc<RefCell<Storage<I>>>,
}

impl<I: Iterator> Memoized<I>
where
    I::Item: Clone,
{
    /// Wrap a source iterator. Nothing is pulled until a cursor advances.
    pub fn new(source: I) -> Self {
        Self {
            storage: Rc::new(RefCell::new(Storage {
                source: Some(source),
                cache: Vec::new(),
            })),
        }
    }

    /// Start a new cursor at the first element.
    #[must_use]
    pub fn iter(&self) -> MemoizedIter<I> {
        MemoizedIter {
            storage: Rc::clone(&self.storage),
            index: 0,
        }
    }

    /// Number of elements pulled from the source so far.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.storage.borrow().cache.len()
    }

    /// Whether the source has been drained.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.storage.borrow().source.is_none()
    }
}

impl<I: Iterator> Clone for Memoized<I> {
    fn clone(&self) -> Self {
        Self {
            storage: Rc::clone(&self.storage),
        }
    }
}

impl<I: Iterator> fmt::Debug for Memoized<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Memoized")
            .field("cached", &storage.cache.len())
            .field("exhausted", &storage.source.is_none())
            .finish()
    }
}

impl<'a, I: Iterator> IntoIterator for &'a Memoized<I>
where
    I::Item: Clone,
{
    type Item = I::Item;
    type IntoIter = MemoizedIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over a [`Memoized`] sequence.
///
/// Cursors are independent: each keeps its own position and they may be
/// interleaved freely.
pub struct MemoizedIter<I: Iterator> {
    storage: Rc<RefCell<Storage<I>>>,
    index: usize,
}

impl<I: Iterator> Iterator for MemoizedIter<I>
where
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let mut storage = self.storage.borrow_mut();

        if let Some(item) = storage.cache.get(self.index) {
            self.index += 1;
            return Some(item.clone());
        }

        let next = storage.source.as_mut()?.next();
        match next {
            Some(item) => {
                storage.cache.push(item.clone());
                self.index += 1;
                Some(item)
            }
            None => {
                storage.source = None;
                None
            }
        }
    }
}

impl<I: Iterator> fmt::Debug for MemoizedIter<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedIter")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
