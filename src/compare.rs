//! Total-order comparators for `OrderedMap` keys.

use core::cmp::Ordering;

/// A total order over `K`. `Less`, `Equal` and `Greater` play the roles of
/// a negative, zero and positive comparison result; `Equal` means "same key".
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own `Ord`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K> Compare<K> for Natural
where
    K: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Compare<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
