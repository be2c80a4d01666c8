use crate::seq::Seq;

/// Extension trait turning iterators into sequences
pub trait SeqIteratorExt: IntoIterator + Sized
where
    Self::Item: Clone + Send + Sync + 'static,
{
    /// Drain the iterator into an array-backed sequence
    fn collect_seq(self) -> Seq<Self::Item> {
        self.into_iter().collect()
    }

    /// Wrap a clonable iterator as a generator-backed sequence.
    ///
    /// Each traversal starts from a fresh clone, so no element is pulled
    /// until the sequence is consumed.
    fn lazy_seq(self) -> Seq<Self::Item>
    where
        Self: Clone + Send + Sync + 'static,
        Self::IntoIter: Send + 'static,
    {
        Seq::generate(move || self.clone())
    }
}

impl<I> SeqIteratorExt for I
where
    I: IntoIterator,
    I::Item: Clone + Send + Sync + 'static,
{
}
