use lazy_seq::*;
use serde_json::json;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

// Generator-backed sequence that counts how often its factory runs
fn counting(values: Vec<i32>) -> (Seq<i32>, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let seq = sequence(generator(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        values.clone()
    }));
    (seq, runs)
}

#[test]
fn test_sequence_of_seq_is_identity() {
    let (seq, runs) = counting(vec![1, 2]);
    let same = sequence(seq.clone());
    assert_eq!(same.kind(), SeqKind::Generator);
    assert_eq!(same.to_vec(), vec![1, 2]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let arr = array(vec![1, 2, 3]);
    assert!(Arc::ptr_eq(&sequence(arr.clone()).to_array(), &arr.to_array()));
}

#[test]
fn test_sequence_kinds() {
    assert_eq!(sequence(vec![1, 2]).kind(), SeqKind::Array);
    assert_eq!(sequence([1, 2, 3]).kind(), SeqKind::Array);
    assert_eq!(sequence(&[1, 2][..]).kind(), SeqKind::Array);
    assert_eq!(sequence(generator(|| 0..3)).kind(), SeqKind::Generator);
    assert_eq!(sequence(generator(|| 0..3)).cache().kind(), SeqKind::Cached);
}

#[test]
fn test_array_to_array_is_pointer_equal() {
    let backing = Arc::new(vec![1, 2, 3]);
    let seq = sequence(Arc::clone(&backing));
    let first = seq.to_array();
    let second = seq.to_array();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &backing));
}

#[test]
fn test_generator_reruns_per_traversal() {
    let (seq, runs) = counting(vec![1, 3]);
    assert_eq!(seq.to_vec(), vec![1, 3]);
    assert_eq!(seq.to_vec(), vec![1, 3]);
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    let a = seq.to_array();
    let b = seq.to_array();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_combinator_chain_is_lazy() {
    let (seq, runs) = counting(vec![1, 2, 3, 4]);
    let pipeline = seq
        .map(|x| x * 10)
        .filter(|x| *x > 10)
        .flat_map(|x| vec![x, x])
        .chunk(2)
        .order_by(|a, b| a < b);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.size(), 3);
    assert!(runs.load(Ordering::SeqCst) > 0);
}

#[test]
fn test_cache_runs_source_once() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (seq, runs) = counting(vec![5, 6, 7]);
    let cached = cache(seq);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert!(!cached.is_materialized());

    let first = cached.to_array();
    let second = cached.to_array();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, vec![5, 6, 7]);

    // iteration, size and positional access all reuse the memo
    assert_eq!(cached.map(|x| x + 1).to_vec(), vec![6, 7, 8]);
    assert_eq!(cached.size(), 3);
    assert_eq!(cached.nth(2), Some(7));
    assert!(cached.is_materialized());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_first_iteration_triggers_materialization() {
    let (seq, runs) = counting(vec![1, 2]);
    let cached = seq.cache();
    assert_eq!(cached.first(), Some(1));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(cached.to_vec(), vec![1, 2]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_of_array_or_cached_is_unchanged() {
    let arr = array(vec![1, 2]);
    assert_eq!(arr.cache().kind(), SeqKind::Array);
    assert!(Arc::ptr_eq(&arr.cache().to_array(), &arr.to_array()));

    let (seq, runs) = counting(vec![1]);
    let once_cached = seq.cache();
    let twice = once_cached.cache();
    twice.to_vec();
    once_cached.to_vec();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_recovers_after_panicking_source() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let cached = Seq::generate(move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("source failed");
        }
        vec![1, 2]
    })
    .cache();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| cached.to_vec()));
    assert!(outcome.is_err());
    assert!(!cached.is_materialized());

    assert_eq!(cached.to_vec(), vec![1, 2]);
    assert_eq!(cached.to_vec(), vec![1, 2]);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cache_is_shared_across_threads() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let cached = Seq::generate(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        vec![1, 2, 3]
    })
    .cache();

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let cached = cached.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cached.to_array()
            })
        })
        .collect();
    let results: Vec<Arc<Vec<i32>>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&results[0], &results[1]));
    assert!(Arc::ptr_eq(&results[0], &cached.to_array()));
    assert_eq!(*results[0], vec![1, 2, 3]);
}

#[test]
fn test_cache_reentrant_access_reads_source_directly() {
    let handle: Arc<once_cell::sync::OnceCell<Seq<usize>>> = Arc::new(once_cell::sync::OnceCell::new());
    let runs = Arc::new(AtomicUsize::new(0));
    let (slot, counter) = (Arc::clone(&handle), Arc::clone(&runs));
    let cached = Seq::generate(move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            // reads its own cache while it is being filled
            let seen = slot.get().map_or(0, |own| own.size());
            vec![1, 2, seen]
        } else {
            vec![1, 2]
        }
    })
    .cache();
    assert!(handle.set(cached.clone()).is_ok());

    assert_eq!(cached.to_vec(), vec![1, 2, 2]);
    assert_eq!(cached.to_vec(), vec![1, 2, 2]);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(cached.is_materialized());
}

#[test]
fn test_range_is_half_open() {
    assert_eq!(range(10, 15).to_vec(), vec![10, 11, 12, 13, 14]);
    assert_eq!(range(2, 5).to_vec(), vec![2, 3, 4]);
    assert_eq!(range_to(5).to_vec(), vec![0, 1, 2, 3, 4]);
    assert!(range(5, 5).is_empty());
}

#[test]
fn test_empty_and_once() {
    assert_eq!(empty::<i32>().size(), 0);
    assert_eq!(once("x").to_vec(), vec!["x"]);
}

#[test]
fn test_repeat_with_is_bounded_by_take() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let naturals = repeat_with(move || counter.fetch_add(1, Ordering::SeqCst));
    assert_eq!(naturals.take(4).to_vec(), vec![0, 1, 2, 3]);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn test_values_and_keys_of_mapping() {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), "x");
    map.insert("b".to_string(), "c");
    assert_eq!(values(map.clone()).to_vec(), vec!["x", "c"]);
    assert_eq!(keys(map).to_vec(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_values_of_json_object() {
    let object = json!({ "a": "x", "b": "c" });
    assert_eq!(values_of_json(&object).to_vec(), vec![json!("x"), json!("c")]);
    assert!(values_of_json(&json!([1, 2])).is_empty());
}

#[test]
fn test_seq_iterator_ext() {
    let collected = vec![3, 1, 2].collect_seq();
    assert_eq!(collected.kind(), SeqKind::Array);

    let lazy = (0..4).lazy_seq();
    assert_eq!(lazy.kind(), SeqKind::Generator);
    assert_eq!(lazy.to_vec(), vec![0, 1, 2, 3]);
    assert_eq!(lazy.to_vec(), vec![0, 1, 2, 3]);
}

#[test]
fn test_seq_iterates_with_for_loop() {
    let seq = array(vec![1, 2, 3]);
    let mut total = 0;
    for v in &seq {
        total += v;
    }
    assert_eq!(total, 6);
    assert_eq!(seq, array(vec![1, 2, 3]));
}
