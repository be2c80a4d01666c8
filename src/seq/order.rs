//! Ordering by incremental minimum extraction.
//!
//! Each round re-scans the whole source. Elements tied with the round's
//! minimum are yielded during the scan in encounter order, while the
//! smallest element strictly greater than the minimum becomes the next
//! round's minimum. The first round is preceded by one `min_by` pass.
//!
//! Quadratic, but it never needs random access or a sort buffer, and it
//! starts yielding before the last round is reached. Every round is a new
//! traversal, so cache a generator with side effects before ordering it.

use std::sync::Arc;

use super::{Cursor, Seq};

impl<T> Seq<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Order the sequence under a strict less-than.
    ///
    /// Stable: tied elements come out in encounter order. Reversing the
    /// comparator reverses the groups but keeps ties in encounter order.
    ///
    /// # Examples
    /// ```
    /// use lazy_seq::array;
    ///
    /// let ordered = array(vec![3, 1, 2, 1]).order_by(|a, b| a < b);
    /// assert_eq!(ordered.to_vec(), vec![1, 1, 2, 3]);
    /// ```
    pub fn order_by<F>(&self, less: F) -> Seq<T>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let less = Arc::new(less);
        Seq::generate(move || OrderBy::new(source.clone(), Arc::clone(&less)))
    }
}

enum Round<T> {
    /// The initial minimum has not been computed yet
    Start,
    /// Scanning for elements tied with `current`
    Scan {
        current: T,
        candidate: Option<T>,
        cursor: Cursor<T>,
    },
    Done,
}

struct OrderBy<T, F> {
    source: Seq<T>,
    less: Arc<F>,
    round: Round<T>,
    rounds: usize,
}

impl<T, F> OrderBy<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T, &T) -> bool,
{
    fn new(source: Seq<T>, less: Arc<F>) -> Self {
        Self {
            source,
            less,
            round: Round::Start,
            rounds: 0,
        }
    }

    fn begin_round(&mut self, minimum: Option<T>) {
        self.round = match minimum {
            Some(current) => {
                self.rounds += 1;
                Round::Scan {
                    current,
                    candidate: None,
                    cursor: self.source.cursor(),
                }
            }
            None => {
                log::trace!("order_by finished after {} rounds", self.rounds);
                Round::Done
            }
        };
    }
}

impl<T, F> Iterator for OrderBy<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T, &T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            match &mut self.round {
                Round::Start => {
                    let less = Arc::clone(&self.less);
                    let minimum = self.source.min_by(|a, b| less(a, b));
                    self.begin_round(minimum);
                }
                Round::Scan {
                    current,
                    candidate,
                    cursor,
                } => match cursor.next() {
                    Some(v) => {
                        let less = &self.less;
                        if less(&*current, &v) {
                            let better = match candidate.as_ref() {
                                Some(best) => less(&v, best),
                                None => true,
                            };
                            if better {
                                *candidate = Some(v);
                            }
                        } else if !less(&v, &*current) {
                            return Some(v);
                        }
                    }
                    None => {
                        let next = candidate.take();
                        self.begin_round(next);
                    }
                },
                Round::Done => return None,
            }
        }
    }
}
