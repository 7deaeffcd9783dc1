// HybridTable property tests.
//
// Property 1: state-machine equivalence against std HashMap.
//  - Model: HashMap<i64, i32>.
//  - Operations: insert, remove, find, find_mut, iterate.
//  - Invariant after each step: return values match the model; len ==
//    model.len(); validate() passes (red-black invariants in every tree
//    bucket, key placement, representation sizes, table count).
//
// Property 2: same, with capacity 1 so every key shares one bucket and
// the bucket crosses the promote/demote thresholds over and over.
//
// Property 3: hash range and power-of-two reduction for arbitrary keys.
use hybrid_table::{bucket_index, BucketKind, HybridTable, TableConfig, Thresholds};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Find(usize),
    Bump(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<Op>)> {
    proptest::collection::vec(any::<i64>(), 1..=40).prop_flat_map(|pool| {
        let n = pool.len();
        let op = prop_oneof![
            4 => (0..n, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            3 => (0..n).prop_map(Op::Remove),
            2 => (0..n).prop_map(Op::Find),
            1 => (0..n, any::<i32>()).prop_map(|(i, d)| Op::Bump(i, d)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..160).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_model(
    mut sut: HybridTable<i32>,
    pool: &[i64],
    ops: Vec<Op>,
) -> Result<HybridTable<i32>, TestCaseError> {
    let mut model: HashMap<i64, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i];
                prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(&k));
                prop_assert_eq!(sut.remove(k), None, "second delete must miss");
            }
            Op::Find(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.find(k), model.get(&k));
                prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
            }
            Op::Bump(i, d) => {
                let k = pool[i];
                match (sut.find_mut(k), model.get_mut(&k)) {
                    (Some(a), Some(b)) => {
                        *a = a.wrapping_add(d);
                        *b = b.wrapping_add(d);
                    }
                    (None, None) => {}
                    (a, b) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", a, b),
                }
            }
            Op::Iterate => {
                let seen: BTreeSet<(i64, i32)> = sut.iter().map(|(k, v)| (k, *v)).collect();
                let want: BTreeSet<(i64, i32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(sut.iter().count(), model.len());
                prop_assert_eq!(seen, want);
            }
        }

        if let Err(e) = sut.validate() {
            prop_assert!(false, "validate failed: {}", e);
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(sut)
}

// Property 1: spread keys over a handful of buckets.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_hashmap((pool, ops) in arb_scenario(), capacity in 1usize..=12) {
        let sut = HybridTable::with_capacity(capacity).unwrap();
        run_model(sut, &pool, ops)?;
    }
}

// Property 2: a single bucket with tight thresholds, so conversions happen
// every few operations in both directions.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_single_bucket_conversions((pool, ops) in arb_scenario(), promote in 1usize..=8, gap in 1usize..=4) {
        let demote = promote.saturating_sub(gap);
        let cfg = TableConfig::with_capacity(1).thresholds(Thresholds::new(promote, demote).unwrap());
        let sut = HybridTable::with_config(cfg).unwrap();
        let sut = run_model(sut, &pool, ops)?;

        let kind = sut.bucket_kind(0).unwrap();
        let len = sut.bucket_len(0).unwrap();
        if len > promote {
            prop_assert_eq!(kind, BucketKind::Tree);
        }
        if len < demote {
            prop_assert_eq!(kind, BucketKind::Chain);
        }
    }
}

// Property 3: every key lands in range, and for power-of-two capacities
// the index only depends on the low bits the mask keeps.
proptest! {
    #[test]
    fn prop_hash_in_range(key in any::<i64>(), capacity in 1usize..=4096) {
        prop_assert!(bucket_index(key, capacity) < capacity);
    }

    #[test]
    fn prop_hash_power_of_two(key in any::<i64>(), shift in 0u32..=20) {
        let capacity = 1usize << shift;
        let i = bucket_index(key, capacity);
        prop_assert!(i < capacity);
        prop_assert_eq!(i & (capacity - 1), i % capacity);
    }
}
