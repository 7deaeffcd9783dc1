#![cfg(test)]

// Property tests for RbTree kept inside the crate so the invariant checker
// and the tree internals stay private.

use crate::rbtree::RbTree;
use proptest::prelude::*;
use std::collections::BTreeMap;

// Keys are drawn from a small pool so inserts collide with existing keys
// and removals usually hit; indices shrink towards earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<Op>)> {
    proptest::collection::vec(any::<i64>(), 1..=48).prop_flat_map(|pool| {
        let n = pool.len();
        let op = prop_oneof![
            4 => (0..n, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            3 => (0..n).prop_map(Op::Remove),
            1 => (0..n).prop_map(Op::Get),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: RbTree behaves like BTreeMap<i64, i32> under random
// insert/remove/get sequences, and after every single operation:
// - all red-black invariants hold (root black, no red-red, uniform
//   black-height, ascending in-order keys, consistent parent links);
// - insert returns the previous value exactly when the key existed;
// - remove returns the stored value exactly when the key existed;
// - in-order iteration equals the model's sorted entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_btreemap((pool, ops) in arb_scenario()) {
        let mut sut: RbTree<i32> = RbTree::new();
        let mut model: BTreeMap<i64, i32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
                }
                Op::Remove(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.remove(k), model.remove(&k));
                }
                Op::Get(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.get(k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
                }
            }

            if let Err(e) = sut.check_invariants() {
                prop_assert!(false, "invariant broken: {}", e);
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.min_key(), model.keys().next().copied());
            prop_assert_eq!(sut.max_key(), model.keys().next_back().copied());
        }

        let entries: Vec<(i64, i32)> = sut.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(i64, i32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&entries, &expected);
        prop_assert_eq!(sut.into_sorted_entries(), expected);
    }
}

// Property: building a tree from any key set and then removing all keys in
// an arbitrary order keeps every intermediate tree valid and ends empty.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_full_drain(keys in proptest::collection::btree_set(-1000i64..1000, 0..150), seed in any::<u64>()) {
        let mut sut = RbTree::new();
        for &k in &keys {
            prop_assert_eq!(sut.insert(k, k), None);
        }
        let mut order: Vec<i64> = keys.iter().copied().collect();
        // Deterministic shuffle from the seed.
        let mut s = seed | 1;
        for i in (1..order.len()).rev() {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (s >> 33) as usize % (i + 1);
            order.swap(i, j);
        }
        for k in order {
            prop_assert_eq!(sut.remove(k), Some(k));
            prop_assert!(sut.check_invariants().is_ok());
        }
        prop_assert!(sut.is_empty());
    }
}
