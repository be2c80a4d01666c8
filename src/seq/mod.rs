//! Lazy sequences over arrays, generators and cached materializations
//!
//! A [`Seq`] is a cheap, clonable handle over one of three backings:
//!
//! - **array**: a shared `Vec<T>`; materializing returns the same `Arc` every time
//! - **generator**: a factory producing a fresh cursor per traversal, so the
//!   source's side effects repeat on every traversal
//! - **cached**: wraps another sequence and materializes it at most once
//!
//! Every combinator returns a new generator-backed sequence; only terminal
//! operations (`to_array`, `for_each`, aggregations) drive iteration.

mod aggregate;
mod async_traversal;
mod combinators;
mod order;
mod truthy;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use once_cell::sync::OnceCell;

pub use async_traversal::SeqStream;
pub use truthy::Truthy;

/// A single-pass traversal over a sequence
pub type Cursor<T> = Box<dyn Iterator<Item = T> + Send + 'static>;

type Factory<T> = Arc<dyn Fn() -> Cursor<T> + Send + Sync + 'static>;

/// An element paired with its 0-based position in the traversal that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WithIndex<T> {
    pub value: T,
    pub index: usize,
}

/// Which backing a sequence currently uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    Array,
    Generator,
    Cached,
}

/// A lazy, re-iterable sequence of `T`
pub struct Seq<T> {
    source: Source<T>,
}

enum Source<T> {
    Array(Arc<Vec<T>>),
    Generator(Factory<T>),
    Cached(Arc<Memo<T>>),
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        let source = match &self.source {
            Source::Array(data) => Source::Array(Arc::clone(data)),
            Source::Generator(factory) => Source::Generator(Arc::clone(factory)),
            Source::Cached(memo) => Source::Cached(Arc::clone(memo)),
        };
        Seq { source }
    }
}

impl<T> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Seq");
        out.field("kind", &self.kind());
        match &self.source {
            Source::Array(data) => out.field("len", &data.len()),
            Source::Cached(memo) => out.field("materialized", &memo.slot.get().is_some()),
            Source::Generator(_) => &mut out,
        };
        out.finish()
    }
}

impl<T> Seq<T> {
    /// The backing this sequence uses
    pub fn kind(&self) -> SeqKind {
        match self.source {
            Source::Array(_) => SeqKind::Array,
            Source::Generator(_) => SeqKind::Generator,
            Source::Cached(_) => SeqKind::Cached,
        }
    }

    /// The materialized elements, when available without traversal
    pub(crate) fn known_elements(&self) -> Option<&Arc<Vec<T>>> {
        match &self.source {
            Source::Array(data) => Some(data),
            Source::Cached(memo) => memo.slot.get(),
            Source::Generator(_) => None,
        }
    }
}

impl<T> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wrap an owned vector as an array-backed sequence
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_arc(Arc::new(items))
    }

    /// Wrap a shared vector; `to_array` hands back this exact `Arc`
    pub fn from_arc(items: Arc<Vec<T>>) -> Self {
        Seq {
            source: Source::Array(items),
        }
    }

    /// Build a generator-backed sequence from a cursor factory.
    ///
    /// The factory runs once per traversal. Nothing runs at construction.
    ///
    /// # Examples
    /// ```
    /// use lazy_seq::Seq;
    ///
    /// let squares = Seq::generate(|| (1..4).map(|x| x * x));
    /// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
    /// assert_eq!(squares.to_vec(), vec![1, 4, 9]);
    /// ```
    pub fn generate<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        let factory: Factory<T> = Arc::new(move || Box::new(factory().into_iter()) as Cursor<T>);
        Seq {
            source: Source::Generator(factory),
        }
    }

    /// Start a fresh traversal
    pub fn cursor(&self) -> Cursor<T> {
        match &self.source {
            Source::Array(data) => Box::new(ArrayCursor::new(Arc::clone(data))),
            Source::Generator(factory) => factory(),
            Source::Cached(memo) => Box::new(ArrayCursor::new(memo.materialize())),
        }
    }

    /// Materialize the sequence.
    ///
    /// Array-backed and cached sequences return the same `Arc` on every call;
    /// generator-backed sequences traverse their source again.
    pub fn to_array(&self) -> Arc<Vec<T>> {
        match &self.source {
            Source::Array(data) => Arc::clone(data),
            Source::Generator(factory) => Arc::new(factory().collect()),
            Source::Cached(memo) => memo.materialize(),
        }
    }

    /// Collect into an owned vector
    pub fn to_vec(&self) -> Vec<T> {
        match self.known_elements() {
            Some(data) => data.as_ref().clone(),
            None => self.cursor().collect(),
        }
    }

    /// Wrap this sequence so its source is traversed at most once.
    ///
    /// Array-backed and already-cached sequences are returned unchanged.
    pub fn cache(&self) -> Self {
        match &self.source {
            Source::Array(_) | Source::Cached(_) => self.clone(),
            Source::Generator(_) => Seq {
                source: Source::Cached(Arc::new(Memo::new(self.clone()))),
            },
        }
    }

    /// True once the elements are held in memory (array-backed, or cached and forced)
    pub fn is_materialized(&self) -> bool {
        self.known_elements().is_some()
    }
}

/// Memo slot of a cached sequence.
///
/// The slot is written at most once. Other threads block until the running
/// materialization finishes; only re-entrant access from the materializing
/// thread itself traverses the wrapped source directly.
struct Memo<T> {
    inner: Seq<T>,
    slot: OnceCell<Arc<Vec<T>>>,
    owner: Mutex<Option<ThreadId>>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(inner: Seq<T>) -> Self {
        Self {
            inner,
            slot: OnceCell::new(),
            owner: Mutex::new(None),
        }
    }

    fn materialize(&self) -> Arc<Vec<T>> {
        if let Some(data) = self.slot.get() {
            return Arc::clone(data);
        }
        let me = thread::current().id();
        if *lock_owner(&self.owner) == Some(me) {
            log::debug!("cached sequence accessed during its own materialization; reading source directly");
            return self.inner.to_array();
        }
        let data = self.slot.get_or_init(|| {
            *lock_owner(&self.owner) = Some(me);
            let _guard = OwnerGuard(&self.owner);
            let data = self.inner.to_array();
            log::debug!("materialized cached sequence with {} elements", data.len());
            data
        });
        Arc::clone(data)
    }
}

fn lock_owner(owner: &Mutex<Option<ThreadId>>) -> MutexGuard<'_, Option<ThreadId>> {
    owner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the materializing thread on exit, including unwinding
struct OwnerGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        *lock_owner(self.0) = None;
    }
}

/// Cursor over shared, already materialized elements
struct ArrayCursor<T> {
    data: Arc<Vec<T>>,
    pos: usize,
}

impl<T> ArrayCursor<T> {
    fn new(data: Arc<Vec<T>>) -> Self {
        Self { data, pos: 0 }
    }
}

impl<T: Clone> Iterator for ArrayCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.data.get(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<T> IntoIterator for Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Cursor<T> {
        self.cursor()
    }
}

impl<T> IntoIterator for &Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;
    type IntoIter = Cursor<T>;

    fn into_iter(self) -> Cursor<T> {
        self.cursor()
    }
}

impl<T> PartialEq for Seq<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Element-wise comparison; traverses both sides.
    fn eq(&self, other: &Self) -> bool {
        self.cursor().eq(other.cursor())
    }
}

impl<T> FromIterator<T> for Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Seq::from_vec(iter.into_iter().collect())
    }
}

// ================================
// Canonicalization
// ================================

/// A zero-argument cursor factory, see [`generator`]
pub struct Generator<F>(pub F);

/// Anything that can be turned into a [`Seq`]
pub trait IntoSeq<T> {
    fn into_seq(self) -> Seq<T>;
}

impl<T> IntoSeq<T> for Seq<T> {
    fn into_seq(self) -> Seq<T> {
        self
    }
}

impl<T> IntoSeq<T> for Vec<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn into_seq(self) -> Seq<T> {
        Seq::from_vec(self)
    }
}

impl<T> IntoSeq<T> for Arc<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    fn into_seq(self) -> Seq<T> {
        Seq::from_arc(self)
    }
}

impl<T, const N: usize> IntoSeq<T> for [T; N]
where
    T: Clone + Send + Sync + 'static,
{
    fn into_seq(self) -> Seq<T> {
        Seq::from_vec(self.into())
    }
}

impl<T> IntoSeq<T> for &[T]
where
    T: Clone + Send + Sync + 'static,
{
    fn into_seq(self) -> Seq<T> {
        Seq::from_vec(self.to_vec())
    }
}

impl<T, F, I> IntoSeq<T> for Generator<F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> I + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
{
    fn into_seq(self) -> Seq<T> {
        Seq::generate(self.0)
    }
}

/// Canonicalize a sequence, ordered collection or [`Generator`].
///
/// An existing `Seq` is returned as-is; collections become array-backed;
/// generators become generator-backed.
///
/// # Examples
/// ```
/// use lazy_seq::{generator, sequence, SeqKind};
///
/// let a = sequence(vec![1, 2, 3]);
/// assert_eq!(a.kind(), SeqKind::Array);
///
/// let g = sequence(generator(|| vec![1, 3]));
/// assert_eq!(g.kind(), SeqKind::Generator);
/// assert_eq!(g.concat(vec![5]).to_vec(), vec![1, 3, 5]);
/// ```
pub fn sequence<T, S>(source: S) -> Seq<T>
where
    S: IntoSeq<T>,
{
    source.into_seq()
}

/// Mark a closure as a cursor factory for [`sequence`]
pub fn generator<F>(factory: F) -> Generator<F> {
    Generator(factory)
}

/// Array-backed sequence over the given items
pub fn array<T>(items: impl IntoIterator<Item = T>) -> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    items.into_iter().collect()
}

/// Wrap any sequence source so it is materialized at most once
pub fn cache<T, S>(source: S) -> Seq<T>
where
    T: Clone + Send + Sync + 'static,
    S: IntoSeq<T>,
{
    source.into_seq().cache()
}

// ================================
// Constructors
// ================================

/// A sequence with no elements
pub fn empty<T>() -> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    Seq::from_vec(Vec::new())
}

/// A sequence with a single element
pub fn once<T>(item: T) -> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    Seq::from_vec(vec![item])
}

/// Half-open integer range `[start, end)`
pub fn range(start: i64, end: i64) -> Seq<i64> {
    Seq::generate(move || start..end)
}

/// Half-open integer range `[0, end)`
pub fn range_to(end: i64) -> Seq<i64> {
    range(0, end)
}

/// Endless generator; bound it with `take` or `take_while`
pub fn repeat_with<T, F>(f: F) -> Seq<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Seq::generate(move || {
        let f = Arc::clone(&f);
        std::iter::repeat_with(move || f())
    })
}

/// Values of a string-keyed mapping, in the mapping's iteration order
pub fn values<K, V, M>(map: M) -> Seq<V>
where
    M: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Clone + Send + Sync + 'static,
{
    map.into_iter().map(|(_, v)| v).collect()
}

/// Keys of a string-keyed mapping, in the mapping's iteration order
pub fn keys<K, V, M>(map: M) -> Seq<String>
where
    M: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
{
    map.into_iter().map(|(k, _)| k.as_ref().to_owned()).collect()
}

/// Values of a JSON object; any other JSON value yields an empty sequence
pub fn values_of_json(value: &serde_json::Value) -> Seq<serde_json::Value> {
    match value.as_object() {
        Some(object) => object.values().cloned().collect(),
        None => empty(),
    }
}

