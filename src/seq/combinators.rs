//! Lazy combinators. Each one wraps a cursor factory and returns a new
//! generator-backed sequence; none of them touches the source until a
//! terminal operation runs.

use std::iter::Fuse;
use std::sync::Arc;

use super::{Cursor, IntoSeq, Seq, Truthy, WithIndex};
use crate::seq_configuration::SeqConfig;

impl<T> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Map each element to an iterable and splice the results in order.
    ///
    /// `map` and `filter` are both expressed through this primitive.
    ///
    /// # Examples
    /// ```
    /// use lazy_seq::array;
    ///
    /// let doubled = array(vec![1, 4]).flat_map(|v| vec![v, v]);
    /// assert_eq!(doubled.to_vec(), vec![1, 1, 4, 4]);
    /// ```
    pub fn flat_map<R, U, F>(&self, f: F) -> Seq<R>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        U: IntoIterator<Item = R> + 'static,
        U::IntoIter: Send + 'static,
        R: Clone + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Seq::generate(move || {
            let f = Arc::clone(&f);
            source.cursor().flat_map(move |v| f(v))
        })
    }

    /// Transform each element
    pub fn map<R, F>(&self, f: F) -> Seq<R>
    where
        F: Fn(T) -> R + Send + Sync + 'static,
        R: Clone + Send + Sync + 'static,
    {
        self.flat_map(move |v| Some(f(v)))
    }

    /// Keep the elements matching the predicate
    pub fn filter<F>(&self, f: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.flat_map(move |v| if f(&v) { Some(v) } else { None })
    }

    /// Observe each element as it passes through, without changing it
    pub fn inspect<F>(&self, f: F) -> Seq<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.map(move |v| {
            f(&v);
            v
        })
    }

    /// Drop falsy elements; see [`Truthy`] for the dropped set
    pub fn compact(&self) -> Seq<T>
    where
        T: Truthy,
    {
        self.filter(|v| v.is_truthy())
    }

    /// This sequence followed by `other`
    pub fn concat<S>(&self, other: S) -> Seq<T>
    where
        S: IntoSeq<T>,
    {
        let first = self.clone();
        let second = other.into_seq();
        Seq::generate(move || first.cursor().chain(second.cursor()))
    }

    /// Skip the first `n` elements
    pub fn drop(&self, n: usize) -> Seq<T> {
        let source = self.clone();
        Seq::generate(move || source.cursor().skip(n))
    }

    /// Skip the leading run of elements matching the predicate.
    ///
    /// Only the contiguous prefix is dropped; later matches are kept.
    pub fn drop_while<F>(&self, f: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Seq::generate(move || {
            let f = Arc::clone(&f);
            source.cursor().skip_while(move |v| f(v))
        })
    }

    /// The first `n` elements; nothing past position `n` is pulled from the source
    pub fn take(&self, n: usize) -> Seq<T> {
        let source = self.clone();
        Seq::generate(move || source.cursor().take(n))
    }

    /// Elements up to, not including, the first one failing the predicate
    pub fn take_while<F>(&self, f: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Seq::generate(move || {
            let f = Arc::clone(&f);
            source.cursor().take_while(move |v| f(v))
        })
    }

    /// Elements in `[begin, end)`; `None` for `end` means to the end
    pub fn slice(&self, begin: usize, end: Option<usize>) -> Seq<T> {
        let prefix = match end {
            Some(end) => self.take(end),
            None => self.clone(),
        };
        prefix.drop(begin)
    }

    /// Pair each element with its position in this traversal
    pub fn with_index(&self) -> Seq<WithIndex<T>> {
        let source = self.clone();
        Seq::generate(move || {
            source
                .cursor()
                .enumerate()
                .map(|(index, value)| WithIndex { value, index })
        })
    }

    /// Same as [`Seq::with_index`]
    pub fn entries(&self) -> Seq<WithIndex<T>> {
        self.with_index()
    }

    /// Positions `0..len` of this sequence
    pub fn indices(&self) -> Seq<usize> {
        self.with_index().map(|e| e.index)
    }

    /// Consecutive groups of `size` elements; the last group may be shorter.
    ///
    /// A `size` of zero yields an empty sequence.
    pub fn chunk(&self, size: usize) -> Seq<Vec<T>> {
        if size == 0 {
            return Seq::from_vec(Vec::new());
        }
        let source = self.clone();
        Seq::generate(move || Chunks::new(source.cursor(), size))
    }

    /// `chunk` with the configured group size
    pub fn chunk_with(&self, config: &SeqConfig) -> Seq<Vec<T>> {
        self.chunk(config.chunk_size)
    }

    /// `chunk` with the default group size of one
    pub fn chunk_default(&self) -> Seq<Vec<T>> {
        self.chunk_with(&SeqConfig::default())
    }

    /// Everything except the last element
    pub fn initial(&self) -> Seq<T> {
        let source = self.clone();
        Seq::generate(move || Initial::new(source.cursor()))
    }

    /// Cross product: for every `a` in this sequence and every `b` in `other`,
    /// splice in `combine(a, b)`.
    ///
    /// `other` is traversed again for every element of this sequence, so a
    /// generator with side effects should be cached first.
    pub fn product<U, S, R, I, F>(&self, other: S, combine: F) -> Seq<R>
    where
        S: IntoSeq<U>,
        U: Clone + Send + Sync + 'static,
        F: Fn(T, U) -> I + Send + Sync + 'static,
        I: IntoIterator<Item = R> + 'static,
        I::IntoIter: Send + 'static,
        R: Clone + Send + Sync + 'static,
    {
        let other = other.into_seq();
        let combine = Arc::new(combine);
        self.flat_map(move |a| {
            let combine = Arc::clone(&combine);
            other.cursor().flat_map(move |b| combine(a.clone(), b))
        })
    }
}

impl<I> Seq<I>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
    I::Item: Clone + Send + Sync + 'static,
    I::IntoIter: Send + 'static,
{
    /// Splice nested iterables into one sequence
    pub fn flatten(&self) -> Seq<I::Item> {
        self.flat_map(|v| v)
    }
}

/// Fixed-size grouping over a cursor
struct Chunks<T> {
    inner: Fuse<Cursor<T>>,
    size: usize,
}

impl<T> Chunks<T> {
    fn new(inner: Cursor<T>, size: usize) -> Self {
        Self {
            inner: inner.fuse(),
            size,
        }
    }
}

impl<T> Iterator for Chunks<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        let mut buf = Vec::with_capacity(self.size);
        while buf.len() < self.size {
            match self.inner.next() {
                Some(item) => buf.push(item),
                None => break,
            }
        }
        if buf.is_empty() {
            None
        } else {
            Some(buf)
        }
    }
}

/// Holds back one element so the final one is never emitted
struct Initial<T> {
    inner: Fuse<Cursor<T>>,
    pending: Option<T>,
}

impl<T> Initial<T> {
    fn new(inner: Cursor<T>) -> Self {
        Self {
            inner: inner.fuse(),
            pending: None,
        }
    }
}

impl<T> Iterator for Initial<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.pending.is_none() {
            self.pending = Some(self.inner.next()?);
        }
        let next = self.inner.next()?;
        self.pending.replace(next)
    }
}
