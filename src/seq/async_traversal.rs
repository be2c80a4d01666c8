//! Cooperative async traversal.
//!
//! Elements are visited strictly in order on the calling task. After each
//! callback the traversal yields to the scheduler with
//! [`tokio::task::yield_now`], so other ready work gets a turn between
//! elements. There is no concurrency and no cancellation: dropping the
//! future is the only way to stop early.

use std::collections::HashMap;
use std::hash::Hash;

use async_stream::stream;
use futures_util::stream::{BoxStream, StreamExt};
use tokio::task::yield_now;

use super::aggregate::GroupAccumulator;
use super::Seq;
use crate::seq_configuration::SeqConfig;

/// A boxed stream over the elements of a sequence
pub type SeqStream<T> = BoxStream<'static, T>;

/// Counts visited elements and decides when to yield
struct Cadence {
    every: usize,
    visited: usize,
}

impl Cadence {
    fn new(config: &SeqConfig) -> Self {
        Self {
            every: config.yield_every.max(1),
            visited: 0,
        }
    }

    async fn tick(&mut self) {
        self.visited += 1;
        if self.visited % self.every == 0 {
            yield_now().await;
        }
    }
}

impl<T> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Visit every element, yielding to the scheduler after each callback.
    ///
    /// # Examples
    /// ```
    /// use lazy_seq::range;
    ///
    /// # async fn example() {
    /// let mut total = 0;
    /// range(0, 100).async_for_each(|v| total += v).await;
    /// assert_eq!(total, 4950);
    /// # }
    /// ```
    pub async fn async_for_each<F>(&self, f: F)
    where
        F: FnMut(T),
    {
        self.async_for_each_with(&SeqConfig::default(), f).await
    }

    /// `async_for_each` with the configured yield cadence
    pub async fn async_for_each_with<F>(&self, config: &SeqConfig, mut f: F)
    where
        F: FnMut(T),
    {
        let mut cadence = Cadence::new(config);
        let mut cursor = self.cursor();
        while let Some(v) = cursor.next() {
            f(v);
            cadence.tick().await;
        }
        log::debug!("async traversal visited {} elements", cadence.visited);
    }

    /// Fallible `async_for_each`; the first error ends the traversal
    pub async fn async_try_for_each<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(T) -> Result<(), E>,
    {
        let mut cadence = Cadence::new(&SeqConfig::default());
        let mut cursor = self.cursor();
        while let Some(v) = cursor.next() {
            f(v)?;
            cadence.tick().await;
        }
        Ok(())
    }

    /// Cooperative `group_by`; same accumulation, one yield per element
    pub async fn async_group_by<K, R, KF, MF, RF>(
        &self,
        key_fn: KF,
        map_fn: MF,
        reduce_fn: RF,
    ) -> HashMap<K, R>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> K,
        MF: FnMut(T) -> R,
        RF: FnMut(R, R) -> R,
    {
        self.async_group_by_with(&SeqConfig::default(), key_fn, map_fn, reduce_fn)
            .await
    }

    /// `async_group_by` with the configured yield cadence
    pub async fn async_group_by_with<K, R, KF, MF, RF>(
        &self,
        config: &SeqConfig,
        key_fn: KF,
        map_fn: MF,
        reduce_fn: RF,
    ) -> HashMap<K, R>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> K,
        MF: FnMut(T) -> R,
        RF: FnMut(R, R) -> R,
    {
        let mut acc = GroupAccumulator::new(key_fn, map_fn, reduce_fn);
        self.async_for_each_with(config, |v| acc.visit(v)).await;
        acc.finish()
    }

    /// Cooperative `count_by`
    pub async fn async_count_by<K, KF>(&self, key_fn: KF) -> HashMap<K, usize>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> K,
    {
        self.async_group_by(key_fn, |_| 1, |a, b| a + b).await
    }

    /// Expose the sequence as a stream that yields to the scheduler after
    /// handing out each element. The source is not touched until first poll.
    pub fn into_stream(&self) -> SeqStream<T> {
        let source = self.clone();
        stream! {
            let cursor = source.cursor();
            for item in cursor {
                yield item;
                yield_now().await;
            }
        }
        .boxed()
    }
}
