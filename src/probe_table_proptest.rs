#![cfg(test)]

// Property tests for ProbeTable kept inside the crate so they can check
// slot-level invariants that the public API does not expose.

use crate::config::ProbeConfig;
use crate::probe_table::ProbeTable;
use crate::string_hash::Poly31;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=40).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run<H: crate::StringHash>(
    mut sut: ProbeTable<i32, H>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let cfg = *sut.config();
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = &pool[i];
                prop_assert_eq!(sut.put(k.as_str(), v), model.insert(k.clone(), v));
                prop_assert!(sut.load_factor() < cfg.grow_threshold);
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let cap = sut.capacity();
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k));
                if removed.is_some() && sut.capacity() == cap {
                    // No shrink fired: either the load stayed above the
                    // threshold or shrinking would have overloaded the table.
                    let target = cfg.shrunk(cap);
                    prop_assert!(
                        sut.load_factor() > cfg.shrink_threshold
                            || target == cap
                            || sut.len() as f64 / target as f64 >= cfg.grow_threshold
                    );
                }
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::Iterate => {
                let s_keys: BTreeSet<&str> = sut.keys().collect();
                let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// After every op: no probe-run gaps, len parity, load factor inside the
// policy band (a shrink that cannot fire does not count as a violation).
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_hashmap((pool, ops) in arb_scenario()) {
        run(ProbeTable::new(), &pool, ops)?;
    }

    // Few distinct hash values force long clusters, wrap-around, and
    // back-shifts that cross other keys' home slots.
    #[test]
    fn prop_matches_hashmap_under_clustering((pool, ops) in arb_scenario(), buckets in 1u64..4) {
        let hasher = move |k: &str| k.len() as u64 % buckets;
        let cfg = ProbeConfig::default().with_initial_capacity(4);
        run(ProbeTable::with_config(cfg, hasher).unwrap(), &pool, ops)?;
    }

    #[test]
    fn prop_matches_hashmap_with_custom_policy(
        (pool, ops) in arb_scenario(),
        grow in 0.5f64..0.95,
        factor in 1.1f64..4.0,
    ) {
        let cfg = ProbeConfig::default()
            .with_initial_capacity(2)
            .with_thresholds(0.1, grow)
            .with_factors(0.5, factor);
        prop_assume!(cfg.validate().is_ok());
        run(ProbeTable::with_config(cfg, Poly31).unwrap(), &pool, ops)?;
    }
}
