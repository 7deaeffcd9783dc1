// HybridTable integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round trip: find returns the most recently inserted value per key.
// - Count: len equals the number of distinct keys present.
// - Representation: a bucket is a tree iff it grew past the promotion
//   threshold and has not since shrunk below the demotion threshold.
// - Conversion: no entry is lost or duplicated across promotion/demotion.
// - Delete: absent keys are a no-op; a second delete reports not-found.
use hybrid_table::{bucket_index, BucketKind, HybridTable, TableConfig, Thresholds};
use std::collections::BTreeSet;
use std::rc::Rc;

/// `n` distinct keys that all hash to `index` for `capacity` buckets.
fn colliding_keys(capacity: usize, index: usize, n: usize) -> Vec<i64> {
    (0i64..)
        .filter(|&k| bucket_index(k, capacity) == index)
        .take(n)
        .collect()
}

// Test: the worked scenario for a single hot bucket.
// Assumes: capacity 8, promote above 8, demote below 4.
// Verifies: the 9th colliding insert promotes; all 20 keys are found;
// shrinking to 3 entries demotes to a chain holding exactly those 3.
#[test_log::test]
fn hot_bucket_promotes_then_demotes() {
    let mut t = HybridTable::with_capacity(8).unwrap();
    let index = 3;
    let keys = colliding_keys(8, index, 20);

    for (i, &k) in keys.iter().enumerate() {
        assert_eq!(t.insert(k, k * 2), None);
        let expected = if i + 1 > 8 {
            BucketKind::Tree
        } else {
            BucketKind::Chain
        };
        assert_eq!(t.bucket_kind(index), Some(expected), "after insert #{}", i + 1);
        t.validate().unwrap();
    }
    assert_eq!(t.len(), 20);
    assert_eq!(t.bucket_len(index), Some(20));
    for &k in &keys {
        assert_eq!(t.find(k), Some(&(k * 2)));
    }

    for &k in &keys[3..] {
        assert_eq!(t.remove(k), Some(k * 2));
        t.validate().unwrap();
    }
    assert_eq!(t.bucket_kind(index), Some(BucketKind::Chain));
    assert_eq!(t.len(), 3);
    let remaining: BTreeSet<i64> = t.iter().map(|(k, _)| k).collect();
    assert_eq!(remaining, keys[..3].iter().copied().collect::<BTreeSet<i64>>());
    for &k in &keys[3..] {
        assert_eq!(t.find(k), None);
    }
}

// Test: demotion waits for the lower threshold.
// Assumes: default thresholds.
// Verifies: a tree with 4..=8 entries stays a tree.
#[test]
fn tree_survives_until_below_demote_threshold() {
    let mut t = HybridTable::with_capacity(4).unwrap();
    let keys = colliding_keys(4, 0, 9);
    t.extend(keys.iter().map(|&k| (k, ())));
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Tree));

    for &k in &keys[..5] {
        t.remove(k);
        assert_eq!(t.bucket_kind(0), Some(BucketKind::Tree));
    }
    assert_eq!(t.bucket_len(0), Some(4));
    t.remove(keys[5]);
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Chain));
    assert_eq!(t.bucket_len(0), Some(3));
}

// Test: delete semantics.
// Verifies: absent key -> None without side effects; double delete
// returns the value then None; count tracks only successful deletes.
#[test]
fn delete_is_idempotent() {
    let mut t = HybridTable::new();
    assert_eq!(t.remove(1), None);
    assert!(t.is_empty());

    t.insert(1, "one");
    t.insert(2, "two");
    assert_eq!(t.remove(1), Some("one"));
    assert_eq!(t.remove(1), None);
    assert_eq!(t.len(), 1);
    assert_eq!(t.find(2), Some(&"two"));
}

// Test: overwrite semantics.
// Verifies: a later insert replaces the value in place, returns the old
// one, and leaves len unchanged, in both chain and tree buckets.
#[test]
fn overwrite_in_chain_and_tree_buckets() {
    let mut t = HybridTable::with_capacity(1).unwrap();
    t.insert(5, 0);
    assert_eq!(t.insert(5, 1), Some(0));
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Chain));

    t.extend((100..120).map(|k| (k, k)));
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Tree));
    assert_eq!(t.insert(5, 2), Some(1));
    assert_eq!(t.insert(110, -110), Some(110));
    assert_eq!(t.len(), 21);
    assert_eq!(t.find(5), Some(&2));
    assert_eq!(t.find(110), Some(&-110));
    t.validate().unwrap();
}

// Test: negative and extreme keys route and round-trip like any other.
#[test]
fn negative_and_extreme_keys() {
    let mut t = HybridTable::with_capacity(10).unwrap();
    let keys = [i64::MIN, -1_000_000_007, -1, 0, 1, i64::MAX];
    for &k in &keys {
        assert!(t.bucket_index(k) < 10);
        t.insert(k, k.wrapping_mul(3));
    }
    for &k in &keys {
        assert_eq!(t.find(k), Some(&k.wrapping_mul(3)));
    }
    t.validate().unwrap();
}

// Test: values are caller-owned references.
// Assumes: the table never clones or drops payloads beyond its own V.
// Verifies: Rc strong counts go back to 1 once removed or the table drops.
#[test]
fn values_are_moved_not_cloned() {
    let payload = Rc::new(String::from("payload"));
    let mut t = HybridTable::with_capacity(1).unwrap();
    for k in 0..12 {
        t.insert(k, Rc::clone(&payload));
    }
    assert_eq!(Rc::strong_count(&payload), 13);
    let v = t.remove(0).unwrap();
    assert!(Rc::ptr_eq(&v, &payload));
    drop(v);
    assert_eq!(Rc::strong_count(&payload), 12);
    drop(t);
    assert_eq!(Rc::strong_count(&payload), 1);
}

// Test: borrowed values.
// Verifies: the table can hold plain references to caller data.
#[test]
fn holds_borrowed_references() {
    let names = ["zero".to_string(), "one".to_string(), "two".to_string()];
    let mut t: HybridTable<&String> = HybridTable::new();
    for (i, n) in names.iter().enumerate() {
        t.insert(i as i64, n);
    }
    assert_eq!(t.find(1).map(|s| s.as_str()), Some("one"));
}

// Test: custom thresholds.
// Verifies: tighter thresholds promote and demote at the configured sizes.
#[test]
fn custom_thresholds() {
    let cfg = TableConfig::with_capacity(1).thresholds(Thresholds::new(2, 1).unwrap());
    let mut t = HybridTable::with_config(cfg).unwrap();
    t.insert(1, ());
    t.insert(2, ());
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Chain));
    t.insert(3, ());
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Tree));
    t.remove(1);
    t.remove(2);
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Tree));
    t.remove(3);
    assert_eq!(t.bucket_kind(0), Some(BucketKind::Chain));
    assert!(t.is_empty());
}

// Test: bulk load across all buckets.
// Verifies: many keys spread across buckets all round-trip, iteration
// yields each exactly once, and the structure validates.
#[test]
fn bulk_round_trip() {
    let t: HybridTable<i64> = (0..5_000).map(|k| (k * 7 - 10_000, k)).collect();
    assert_eq!(t.len(), 5_000);
    assert_eq!(t.capacity(), HybridTable::<i64>::DEFAULT_CAPACITY);
    for k in 0..5_000 {
        assert_eq!(t.find(k * 7 - 10_000), Some(&k));
    }
    assert_eq!(t.iter().count(), 5_000);
    assert_eq!((&t).into_iter().len(), 5_000);
    t.validate().unwrap();
}

// Test: table can be shared across threads behind a Mutex.
#[test]
fn usable_behind_a_mutex() {
    use std::sync::{Arc, Mutex};
    let t = Arc::new(Mutex::new(HybridTable::<u32>::new()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let t = Arc::clone(&t);
            std::thread::spawn(move || {
                for k in 0..100 {
                    t.lock().unwrap().insert(i * 1000 + k, k as u32);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let t = t.lock().unwrap();
    assert_eq!(t.len(), 400);
    t.validate().unwrap();
}
