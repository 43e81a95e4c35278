// ProbeTable integration suite.
//
// Each test documents the behavior verified through the public API only:
// - Lookup: the latest put for a key wins; never-inserted keys miss.
// - Sizing: growth and shrink happen on the triggering call.
// - Removal: no tombstones; colliding followers stay reachable.
use assocmap::{ConfigError, MapError, Poly31, ProbeConfig, ProbeTable, StringHash};

// Test: latest value wins and misses are plain `None`.
#[test]
fn latest_put_wins() {
    let mut t = ProbeTable::new();
    for round in 0..3 {
        for i in 0..40 {
            t.put(format!("key{i}"), i * 10 + round);
        }
    }
    for i in 0..40 {
        assert_eq!(t.get(&format!("key{i}")), Some(&(i * 10 + 2)));
    }
    assert_eq!(t.len(), 40);
    assert_eq!(t.get("never"), None);
    assert!(!t.contains_key("never"));
}

// Test: 17 distinct keys from 16 slots grow exactly once, to 32.
#[test]
fn one_growth_for_seventeen_keys() {
    let mut t = ProbeTable::new();
    let mut seen = vec![t.capacity()];
    for i in 0..17 {
        t.put(format!("k{i}"), i);
        if seen.last() != Some(&t.capacity()) {
            seen.push(t.capacity());
        }
    }
    assert_eq!(seen, vec![16, 32]);
    assert_eq!(t.len(), 17);
}

// Test: len tracks distinct inserts minus removals, overwrites excluded.
#[test]
fn len_counts_distinct_live_keys() {
    let mut t = ProbeTable::new();
    for i in 0..30 {
        t.put(format!("k{i}"), i);
    }
    t.put("k0", 99);
    for i in (0..30).step_by(3) {
        assert!(t.remove(&format!("k{i}")).is_some());
    }
    assert_eq!(t.remove("k0"), None);
    assert_eq!(t.len(), 20);
    assert_eq!(t.iter().count(), 20);
}

// Test: three keys sharing a home slot; removing the head keeps the rest.
#[test]
fn colliding_followers_survive_head_removal() {
    let same_home = |_: &str| 42u64;
    let mut t = ProbeTable::with_hasher(same_home);
    t.put("A", 1);
    t.put("B", 2);
    t.put("C", 3);
    assert_eq!(t.remove("A"), Some(1));
    assert_eq!(t.get("B"), Some(&2));
    assert_eq!(t.get("C"), Some(&3));
    assert_eq!(t.get("A"), None);
}

// Test: removing a middle key of a chain keeps the tail reachable.
#[test]
fn colliding_tail_survives_middle_removal() {
    let mut t = ProbeTable::with_hasher(|_: &str| 0u64);
    for k in ["a", "b", "c", "d", "e"] {
        t.put(k, k.to_uppercase());
    }
    t.remove("c");
    for k in ["a", "b", "d", "e"] {
        assert_eq!(t.get(k).map(String::as_str), Some(k.to_uppercase().as_str()));
    }
}

// Test: the table shrinks back as it empties and stays usable.
#[test]
fn shrinks_and_recovers() {
    let mut t = ProbeTable::new();
    for i in 0..100 {
        t.put(format!("k{i}"), i);
    }
    let peak = t.capacity();
    for i in 0..100 {
        t.remove(&format!("k{i}"));
    }
    assert!(t.is_empty());
    assert!(t.capacity() < peak);
    t.put("again", 1);
    assert_eq!(t.get("again"), Some(&1));
}

// Test: a custom hash sees the raw key; the table does the reduction.
#[test]
fn hash_is_reduced_by_the_table() {
    struct Huge;
    impl StringHash for Huge {
        fn hash_str(&self, key: &str) -> u64 {
            u64::MAX - key.len() as u64
        }
    }
    let mut t = ProbeTable::with_hasher(Huge);
    for i in 0..50 {
        t.put("x".repeat(i), i);
    }
    for i in 0..50 {
        assert_eq!(t.get(&"x".repeat(i)), Some(&i));
    }
}

// Test: configuration is validated up front.
#[test]
fn config_validation() {
    let bad = ProbeConfig::default().with_factors(0.5, 0.9);
    assert_eq!(
        ProbeTable::<u8>::with_config(bad, Poly31).err(),
        Some(ConfigError::GrowFactor(0.9))
    );
    let good = ProbeConfig::default().with_initial_capacity(3);
    let t = ProbeTable::<u8>::with_config(good, Poly31).unwrap();
    assert_eq!(t.capacity(), 3);
}

// Test: try_put is the non-panicking path for healthy tables too.
#[test]
fn try_put_reports_previous_value() {
    let mut t = ProbeTable::new();
    assert_eq!(t.try_put("k", 1), Ok(None));
    assert_eq!(t.try_put("k", 2), Ok(Some(1)));
    assert_ne!(t.try_put("j", 3), Err(MapError::TableFull { capacity: 16 }));
}
