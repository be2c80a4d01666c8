//! Terminal operations: folds, lookups and grouping

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Add;

use super::Seq;
use crate::error::{SeqError, SeqResult};
use crate::seq_configuration::SeqConfig;

/// Single-pass accumulator behind `group_by` and its async counterpart.
///
/// The first value seen for a key is stored as-is; later ones are folded
/// into it left to right in encounter order.
pub(crate) struct GroupAccumulator<K, R, KF, MF, RF> {
    groups: HashMap<K, R>,
    key_fn: KF,
    map_fn: MF,
    reduce_fn: RF,
}

impl<K, R, KF, MF, RF> GroupAccumulator<K, R, KF, MF, RF>
where
    K: Eq + Hash,
{
    pub(crate) fn new(key_fn: KF, map_fn: MF, reduce_fn: RF) -> Self {
        Self {
            groups: HashMap::new(),
            key_fn,
            map_fn,
            reduce_fn,
        }
    }

    pub(crate) fn visit<T>(&mut self, value: T)
    where
        KF: FnMut(&T) -> K,
        MF: FnMut(T) -> R,
        RF: FnMut(R, R) -> R,
    {
        let key = (self.key_fn)(&value);
        self.insert(key, value);
    }

    fn insert<T>(&mut self, key: K, value: T)
    where
        MF: FnMut(T) -> R,
        RF: FnMut(R, R) -> R,
    {
        let mapped = (self.map_fn)(value);
        let merged = match self.groups.remove(&key) {
            Some(existing) => (self.reduce_fn)(existing, mapped),
            None => mapped,
        };
        self.groups.insert(key, merged);
    }

    pub(crate) fn finish(self) -> HashMap<K, R> {
        self.groups
    }
}

impl<T> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Call `f` on every element
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(T),
    {
        self.cursor().for_each(f)
    }

    /// Call `f` on every element, stopping at the first error
    pub fn try_for_each<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(T) -> Result<(), E>,
    {
        self.cursor().try_for_each(&mut f)
    }

    /// Left fold seeded with the first element; `None` when empty.
    ///
    /// # Examples
    /// ```
    /// use lazy_seq::array;
    ///
    /// assert_eq!(array(vec![1, 2, 3]).reduce(|a, b| a + b), Some(6));
    /// assert_eq!(array(Vec::<i32>::new()).reduce(|a, b| a + b), None);
    /// ```
    pub fn reduce<F>(&self, f: F) -> Option<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.cursor().reduce(f)
    }

    /// `reduce`, reporting an empty sequence as an error
    pub fn reduce_or_err<F>(&self, f: F) -> SeqResult<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.reduce(f).ok_or(SeqError::EmptySequence("reduce"))
    }

    /// `reduce` with a fallible step; the first error ends the traversal
    pub fn try_reduce<E, F>(&self, mut f: F) -> Result<Option<T>, E>
    where
        F: FnMut(T, T) -> Result<T, E>,
    {
        let mut cursor = self.cursor();
        let first = match cursor.next() {
            Some(item) => item,
            None => return Ok(None),
        };
        cursor.try_fold(first, &mut f).map(Some)
    }

    /// Left fold with an explicit seed
    pub fn fold<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        self.cursor().fold(init, f)
    }

    /// `fold` with a fallible step; the partial accumulator is dropped on error
    pub fn try_fold<A, E, F>(&self, init: A, mut f: F) -> Result<A, E>
    where
        F: FnMut(A, T) -> Result<A, E>,
    {
        self.cursor().try_fold(init, &mut f)
    }

    /// Sum of a numeric projection; `N::default()` (zero) when empty
    pub fn sum<N, F>(&self, mut f: F) -> N
    where
        N: Add<Output = N> + Default,
        F: FnMut(&T) -> N,
    {
        self.fold(N::default(), |acc, v| acc + f(&v))
    }

    /// Smallest projected value; the first one wins on ties
    pub fn min<N, F>(&self, mut f: F) -> Option<N>
    where
        N: PartialOrd,
        F: FnMut(&T) -> N,
    {
        self.cursor()
            .map(|v| f(&v))
            .reduce(|a, b| if b < a { b } else { a })
    }

    /// Largest projected value; the first one wins on ties
    pub fn max<N, F>(&self, mut f: F) -> Option<N>
    where
        N: PartialOrd,
        F: FnMut(&T) -> N,
    {
        self.cursor()
            .map(|v| f(&v))
            .reduce(|a, b| if b > a { b } else { a })
    }

    /// Smallest element under a strict less-than; the first one wins on ties
    pub fn min_by<F>(&self, mut less: F) -> Option<T>
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.reduce(|a, b| if less(&b, &a) { b } else { a })
    }

    /// Largest element under a strict less-than; the first one wins on ties
    pub fn max_by<F>(&self, mut less: F) -> Option<T>
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.min_by(|a, b| less(b, a))
    }

    /// Concatenate string forms with `separator` between consecutive elements
    pub fn join<S, F>(&self, mut to_string: F, separator: &str) -> String
    where
        S: AsRef<str>,
        F: FnMut(&T) -> S,
    {
        let mut out = String::new();
        for (i, v) in self.cursor().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(to_string(&v).as_ref());
        }
        out
    }

    /// `join` with the configured separator
    pub fn join_with<S, F>(&self, config: &SeqConfig, to_string: F) -> String
    where
        S: AsRef<str>,
        F: FnMut(&T) -> S,
    {
        self.join(to_string, &config.join_separator)
    }

    /// `join` with the default `","` separator
    pub fn join_default<S, F>(&self, to_string: F) -> String
    where
        S: AsRef<str>,
        F: FnMut(&T) -> S,
    {
        self.join_with(&SeqConfig::default(), to_string)
    }

    /// Group elements by key in one pass.
    ///
    /// Each key maps to the left fold, in encounter order, of `map_fn` over
    /// the elements sharing that key.
    ///
    /// # Examples
    /// ```
    /// use lazy_seq::array;
    ///
    /// let groups = array(vec!["a", "b", "x", "b"]).group_by(
    ///     |k| k.to_string(),
    ///     |v| v.to_string(),
    ///     |a, b| a + &b,
    /// );
    /// assert_eq!(groups["b"], "bb");
    /// assert_eq!(groups.len(), 3);
    /// ```
    pub fn group_by<K, R, KF, MF, RF>(&self, key_fn: KF, map_fn: MF, reduce_fn: RF) -> HashMap<K, R>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> K,
        MF: FnMut(T) -> R,
        RF: FnMut(R, R) -> R,
    {
        let mut acc = GroupAccumulator::new(key_fn, map_fn, reduce_fn);
        for v in self.cursor() {
            acc.visit(v);
        }
        acc.finish()
    }

    /// `group_by` with a fallible key function; nothing is returned on error
    pub fn try_group_by<K, R, E, KF, MF, RF>(
        &self,
        mut key_fn: KF,
        map_fn: MF,
        reduce_fn: RF,
    ) -> Result<HashMap<K, R>, E>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> Result<K, E>,
        MF: FnMut(T) -> R,
        RF: FnMut(R, R) -> R,
    {
        let mut acc = GroupAccumulator::new((), map_fn, reduce_fn);
        for v in self.cursor() {
            let key = key_fn(&v)?;
            acc.insert(key, v);
        }
        Ok(acc.finish())
    }

    /// Number of elements per key
    pub fn count_by<K, KF>(&self, key_fn: KF) -> HashMap<K, usize>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> K,
    {
        self.group_by(key_fn, |_| 1, |a, b| a + b)
    }

    /// All elements per key, in encounter order
    pub fn group_values<K, KF>(&self, key_fn: KF) -> HashMap<K, Vec<T>>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> K,
    {
        self.group_by(key_fn, |v| vec![v], |mut a, b| {
            a.extend(b);
            a
        })
    }

    /// Number of elements.
    ///
    /// Constant time for materialized sequences; otherwise a full traversal,
    /// which re-runs a generator's side effects.
    pub fn size(&self) -> usize {
        match self.known_elements() {
            Some(data) => data.len(),
            None => self.cursor().count(),
        }
    }

    /// True when the sequence has no elements; pulls at most one
    pub fn is_empty(&self) -> bool {
        match self.known_elements() {
            Some(data) => data.is_empty(),
            None => self.cursor().next().is_none(),
        }
    }

    /// Element at position `index`
    pub fn nth(&self, index: usize) -> Option<T> {
        match self.known_elements() {
            Some(data) => data.get(index).cloned(),
            None => self.cursor().nth(index),
        }
    }

    /// Element at position `index`, or the observed size when out of range
    pub fn get(&self, index: usize) -> SeqResult<T> {
        if let Some(data) = self.known_elements() {
            return data.get(index).cloned().ok_or(SeqError::IndexOutOfRange {
                index,
                size: data.len(),
            });
        }
        let mut size = 0;
        for v in self.cursor() {
            if size == index {
                return Ok(v);
            }
            size += 1;
        }
        Err(SeqError::IndexOutOfRange { index, size })
    }

    /// First element, if any
    pub fn first(&self) -> Option<T> {
        self.nth(0)
    }

    /// `first`, with an empty sequence reported as an error
    pub fn first_or_err(&self) -> SeqResult<T> {
        self.first().ok_or(SeqError::EmptySequence("first"))
    }

    /// Last element; a full traversal unless materialized
    pub fn last(&self) -> Option<T> {
        match self.known_elements() {
            Some(data) => data.last().cloned(),
            None => self.cursor().last(),
        }
    }

    /// `last`, with an empty sequence reported as an error
    pub fn last_or_err(&self) -> SeqResult<T> {
        self.last().ok_or(SeqError::EmptySequence("last"))
    }

    /// First element matching the predicate
    pub fn find<F>(&self, mut pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.cursor().find(|v| pred(v))
    }

    /// Last element matching the predicate; always a full traversal
    pub fn find_last<F>(&self, mut pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.cursor().filter(|v| pred(v)).last()
    }

    /// Position of the first element matching the predicate
    pub fn find_index<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.cursor().position(|v| pred(&v))
    }

    /// Position of the first element equal to `value` at or after `from`
    pub fn index_of(&self, value: &T, from: usize) -> Option<usize>
    where
        T: PartialEq,
    {
        self.cursor()
            .enumerate()
            .skip(from)
            .find(|(_, v)| v == value)
            .map(|(i, _)| i)
    }

    /// True if any element matches; stops at the first match
    pub fn some<F>(&self, mut pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.cursor().any(|v| pred(&v))
    }

    /// True if every element matches; stops at the first mismatch
    pub fn every<F>(&self, mut pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        !self.some(|v| !pred(v))
    }
}

impl<U> Seq<Option<U>>
where
    U: Clone + Send + Sync + 'static,
{
    /// True if every element is `Some`
    pub fn every_defined(&self) -> bool {
        self.every(Option::is_some)
    }

    /// True if any element is `Some`
    pub fn some_defined(&self) -> bool {
        self.some(Option::is_some)
    }
}
