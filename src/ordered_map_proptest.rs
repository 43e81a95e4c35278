#![cfg(test)]

// Property tests for OrderedMap kept inside the crate so they can walk the
// arena and check sizes and parent links directly.

use crate::error::MapError;
use crate::ordered_map::OrderedMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, i32),
    Remove(u8),
    DeleteMin,
    DeleteMax,
    Get(u8),
    Rank(u8),
    Select(usize),
}

// Narrow key space so removals and overwrites hit existing keys often.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (0u8..64, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => (0u8..64).prop_map(Op::Remove),
        1 => Just(Op::DeleteMin),
        1 => Just(Op::DeleteMax),
        2 => (0u8..64).prop_map(Op::Get),
        1 => (0u8..64).prop_map(Op::Rank),
        1 => (0usize..70).prop_map(Op::Select),
    ]
}

// Property: state-machine equivalence against std::collections::BTreeMap.
// After every op: BST order, subtree sizes, parent links, arena membership,
// and in-order key sequence equal to the model's.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_btreemap(ops in proptest::collection::vec(arb_op(), 1..200)) {
        let mut sut: OrderedMap<u8, i32> = OrderedMap::new();
        let mut model: BTreeMap<u8, i32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(sut.remove(&k), model.remove_entry(&k));
                }
                Op::DeleteMin => {
                    let expected = model.pop_first().ok_or(MapError::EmptyStructure);
                    prop_assert_eq!(sut.delete_min(), expected);
                }
                Op::DeleteMax => {
                    let expected = model.pop_last().ok_or(MapError::EmptyStructure);
                    prop_assert_eq!(sut.delete_max(), expected);
                }
                Op::Get(k) => {
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                }
                Op::Rank(k) => {
                    prop_assert_eq!(sut.rank(&k), model.range(..k).count());
                }
                Op::Select(i) => {
                    prop_assert_eq!(sut.select(i), model.iter().nth(i));
                }
            }

            sut.assert_invariants();
            prop_assert_eq!(sut.len(), model.len());
            let s_keys: Vec<u8> = sut.keys().copied().collect();
            let m_keys: Vec<u8> = model.keys().copied().collect();
            prop_assert_eq!(s_keys, m_keys);
            let s_vals: Vec<i32> = sut.values().copied().collect();
            let m_vals: Vec<i32> = model.values().copied().collect();
            prop_assert_eq!(s_vals, m_vals);
        }
    }

    // Sorted insertion builds a single chain; removals must still keep
    // parent links and sizes consistent along it.
    #[test]
    fn prop_degenerate_chain(n in 1usize..300, removals in proptest::collection::vec(0usize..300, 0..50)) {
        let mut sut: OrderedMap<usize, usize> = OrderedMap::new();
        let mut model: BTreeMap<usize, usize> = BTreeMap::new();
        for k in 0..n {
            sut.insert(k, k);
            model.insert(k, k);
        }
        sut.assert_invariants();
        for k in removals {
            prop_assert_eq!(sut.remove(&k), model.remove_entry(&k));
            sut.assert_invariants();
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.iter().map(|(k, _)| *k).eq(model.keys().copied()));
    }
}
