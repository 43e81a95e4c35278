//! Capacity-independent string hashing for `ProbeTable`.
//!
//! A `StringHash` maps a key to a raw `u64`; the table reduces it modulo
//! its current capacity on every probe, so a key's home slot moves when
//! the table resizes.

/// Pure, deterministic hash of a string key.
pub trait StringHash {
    fn hash_str(&self, key: &str) -> u64;
}

/// Polynomial rolling hash over the key's bytes: `h = 31 * h + byte`,
/// wrapping on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poly31;

impl StringHash for Poly31 {
    #[inline]
    fn hash_str(&self, key: &str) -> u64 {
        key.bytes()
            .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
    }
}

impl<F> StringHash for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_str(&self, key: &str) -> u64 {
        self(key)
    }
}
