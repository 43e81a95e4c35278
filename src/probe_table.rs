//! ProbeTable: open-addressing string map with linear probing and eager resize.
//!
//! Every live entry sits in the slot array itself. A lookup starts at the
//! key's home slot `hash(key) mod capacity` and walks forward, wrapping at
//! the end, until it sees the key or an empty slot. There are no tombstones:
//! `remove` re-places the rest of the cluster so that no probe run ever has
//! a gap between an entry's home slot and the entry.

use crate::config::ProbeConfig;
use crate::error::{ConfigError, MapError};
use crate::string_hash::{Poly31, StringHash};
use core::mem;

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
}

pub struct ProbeTable<V, H = Poly31> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
    config: ProbeConfig,
    hasher: H,
}

fn empty_slots<V>(capacity: usize) -> Vec<Option<Entry<V>>> {
    (0..capacity).map(|_| None).collect()
}

impl<V> ProbeTable<V> {
    pub fn new() -> Self {
        Self::with_hasher(Poly31)
    }
}

impl<V> Default for ProbeTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in slot order.
pub struct Iter<'a, V> {
    it: core::slice::Iter<'a, Option<Entry<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .flatten()
            .next()
            .map(|e| (e.key.as_str(), &e.value))
    }
}

/// Iterator over entries in slot order with mutable values.
pub struct IterMut<'a, V> {
    it: core::slice::IterMut<'a, Option<Entry<V>>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .flatten()
            .next()
            .map(|e| (e.key.as_str(), &mut e.value))
    }
}

impl<V, H> ProbeTable<V, H>
where
    H: StringHash,
{
    /// Table with the default sizing policy.
    pub fn with_hasher(hasher: H) -> Self {
        let config = ProbeConfig::default();
        Self {
            slots: empty_slots(config.initial_capacity),
            len: 0,
            config,
            hasher,
        }
    }

    pub fn with_config(config: ProbeConfig, hasher: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            slots: empty_slots(config.initial_capacity),
            len: 0,
            config,
            hasher,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    #[inline]
    fn home(&self, key: &str) -> usize {
        (self.hasher.hash_str(key) % self.slots.len() as u64) as usize
    }

    fn find_index(&self, key: &str) -> Option<usize> {
        let cap = self.slots.len();
        let home = self.home(key);
        for i in 0..cap {
            let idx = (home + i) % cap;
            match &self.slots[idx] {
                None => return None,
                Some(e) if e.key == key => return Some(idx),
                Some(_) => {}
            }
        }
        None
    }

    /// Put `entry` in the first empty slot of its probe run. Keys are
    /// already unique, so no comparison is made and `len` is untouched.
    fn place(&mut self, entry: Entry<V>) -> Result<usize, MapError> {
        let cap = self.slots.len();
        let home = self.home(&entry.key);
        for i in 0..cap {
            let idx = (home + i) % cap;
            if self.slots[idx].is_none() {
                self.slots[idx] = Some(entry);
                return Ok(idx);
            }
        }
        Err(MapError::TableFull { capacity: cap })
    }

    fn rehash(&mut self, new_capacity: usize) -> Result<(), MapError> {
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        tracing::debug!(
            from = old.len(),
            to = new_capacity,
            len = self.len,
            "resizing probe table"
        );
        for entry in old.into_iter().flatten() {
            self.place(entry)?;
        }
        Ok(())
    }

    fn grow_if_needed(&mut self) -> Result<(), MapError> {
        let mut target = self.slots.len();
        while self.len as f64 / target as f64 >= self.config.grow_threshold {
            target = self.config.grown(target);
        }
        if target != self.slots.len() {
            self.rehash(target)?;
        }
        Ok(())
    }

    fn shrink_if_needed(&mut self) {
        let cap = self.slots.len();
        if self.load_factor() > self.config.shrink_threshold {
            return;
        }
        let target = self.config.shrunk(cap);
        if target == cap || self.len as f64 / target as f64 >= self.config.grow_threshold {
            return;
        }
        self.rehash(target)
            .expect("a shrunk table still has more slots than entries");
    }

    /// Insert or overwrite, surfacing a full probe run as an error instead
    /// of panicking. Returns the previous value for an existing key.
    pub fn try_put<K>(&mut self, key: K, value: V) -> Result<Option<V>, MapError>
    where
        K: Into<String>,
    {
        let key = key.into();
        let cap = self.slots.len();
        let home = self.home(&key);
        for i in 0..cap {
            let idx = (home + i) % cap;
            let slot = &mut self.slots[idx];
            match slot {
                Some(e) if e.key == key => return Ok(Some(mem::replace(&mut e.value, value))),
                Some(_) => {}
                None => {
                    *slot = Some(Entry { key, value });
                    self.len += 1;
                    self.grow_if_needed()?;
                    return Ok(None);
                }
            }
        }
        Err(MapError::TableFull { capacity: cap })
    }

    /// Insert or overwrite. Returns the previous value for an existing key.
    ///
    /// # Panics
    ///
    /// Panics if probing finds neither the key nor an empty slot, which the
    /// resize policy rules out for a table whose invariants hold.
    pub fn put<K>(&mut self, key: K, value: V) -> Option<V>
    where
        K: Into<String>,
    {
        match self.try_put(key, value) {
            Ok(prev) => prev,
            Err(e) => panic!("probe table invariant violated: {e}"),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let idx = self.find_index(key)?;
        self.slots[idx].as_ref().map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.find_index(key)?;
        self.slots[idx].as_mut().map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(key).is_some()
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.find_index(key)?;
        let removed = self.slots[idx].take()?;
        self.len -= 1;

        // Close the gap: re-place every entry that follows in the cluster.
        // Each one lands at or before its old slot, so the first empty slot
        // after the cluster stays empty and bounds the walk.
        let cap = self.slots.len();
        let mut next = (idx + 1) % cap;
        let mut moved = 0usize;
        while let Some(entry) = self.slots[next].take() {
            self.place(entry)
                .expect("back-shift always has the vacated slot available");
            moved += 1;
            next = (next + 1) % cap;
        }
        tracing::trace!(slot = idx, moved, "back-shifted cluster after remove");

        self.shrink_if_needed();
        Some(removed.value)
    }

    /// Drop every entry and return to the initial capacity.
    pub fn clear(&mut self) {
        self.slots = empty_slots(self.config.initial_capacity);
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    #[cfg(test)]
    pub(crate) fn slot_of(&self, key: &str) -> Option<usize> {
        self.find_index(key)
    }

    /// Panics unless `len` matches the slot array and every entry is
    /// reachable from its home slot without crossing an empty slot.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let cap = self.slots.len();
        let live = self.slots.iter().filter(|s| s.is_some()).count();
        assert_eq!(live, self.len, "len must count live slots");
        assert!(self.len < cap, "table must keep a free slot");
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some(e) = slot {
                let mut probe = self.home(&e.key);
                while probe != idx {
                    assert!(
                        self.slots[probe].is_some(),
                        "gap at {probe} between home and slot {idx} of {:?}",
                        e.key
                    );
                    probe = (probe + 1) % cap;
                }
            }
        }
    }
}
