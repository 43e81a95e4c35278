//! OrderedMap: unbalanced binary search tree with subtree sizes and parent links.
//!
//! Nodes live in a `SlotMap` arena and refer to each other by `NodeId`, so
//! the parent back-link is a plain index rather than a second owner. All
//! walks are iterative: the tree is never rebalanced and its height can be
//! linear in the number of keys.
//!
//! Invariants between calls:
//! - in-order traversal is strictly ascending under the comparator;
//! - `size(n) == 1 + size(n.left) + size(n.right)`;
//! - a non-root node is its parent's `left` or `right`; the root has no parent;
//! - the arena holds exactly the nodes reachable from the root.

use crate::compare::{Compare, Natural};
use crate::error::MapError;
use core::cmp::Ordering;
use core::mem;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Arena index of a tree node.
    pub(crate) struct NodeId;
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    size: usize,
}

pub struct OrderedMap<K, V, C = Natural> {
    nodes: SlotMap<NodeId, Node<K, V>>,
    root: Option<NodeId>,
    cmp: C,
}

impl<K, V> OrderedMap<K, V>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl<K, V, C> OrderedMap<K, V, C>
where
    C: Compare<K>,
{
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            cmp,
        }
    }

    /// Number of keys; the root's subtree size.
    pub fn len(&self) -> usize {
        self.size(self.root)
    }
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    fn size(&self, n: Option<NodeId>) -> usize {
        n.map_or(0, |id| self.nodes[id].size)
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            cur = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    fn extreme(&self, from: NodeId, side: Side) -> NodeId {
        let mut id = from;
        loop {
            let node = &self.nodes[id];
            let next = match side {
                Side::Left => node.left,
                Side::Right => node.right,
            };
            match next {
                Some(n) => id = n,
                None => return id,
            }
        }
    }

    /// Recompute sizes from `start` up to the root.
    fn refresh_sizes(&mut self, start: Option<NodeId>) {
        let mut cur = start;
        while let Some(id) = cur {
            let (l, r) = (self.nodes[id].left, self.nodes[id].right);
            let size = 1 + self.size(l) + self.size(r);
            let node = &mut self.nodes[id];
            node.size = size;
            cur = node.parent;
        }
    }

    /// Put `with` where `old` hangs today: the root slot or the matching
    /// child slot of `old`'s parent. `with` takes over `old`'s parent link;
    /// `old`'s own links are left for the caller.
    fn transplant(&mut self, old: NodeId, with: Option<NodeId>) {
        let parent = self.nodes[old].parent;
        match parent {
            None => self.root = with,
            Some(p) => {
                let pn = &mut self.nodes[p];
                if pn.left == Some(old) {
                    pn.left = with;
                } else {
                    pn.right = with;
                }
            }
        }
        if let Some(w) = with {
            self.nodes[w].parent = parent;
        }
    }

    /// Insert `key`, or overwrite its value in place if present.
    /// Returns the previous value when the key already existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &mut self.nodes[id];
            match self.cmp.compare(&key, &node.key) {
                Ordering::Less => {
                    side = Side::Left;
                    cur = node.left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    cur = node.right;
                }
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
            }
            parent = Some(id);
        }

        let id = self.nodes.insert(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
            size: 1,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                let pn = &mut self.nodes[p];
                match side {
                    Side::Left => pn.left = Some(id),
                    Side::Right => pn.right = Some(id),
                }
            }
        }

        let mut up = parent;
        while let Some(a) = up {
            let an = &mut self.nodes[a];
            an.size += 1;
            up = an.parent;
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn min(&self) -> Result<(&K, &V), MapError> {
        let root = self.root.ok_or(MapError::EmptyStructure)?;
        let n = &self.nodes[self.extreme(root, Side::Left)];
        Ok((&n.key, &n.value))
    }

    pub fn max(&self) -> Result<(&K, &V), MapError> {
        let root = self.root.ok_or(MapError::EmptyStructure)?;
        let n = &self.nodes[self.extreme(root, Side::Right)];
        Ok((&n.key, &n.value))
    }

    /// Splice out the extreme node on `side` below `subtree`, promoting its
    /// single remaining child.
    fn detach_extreme(&mut self, subtree: NodeId, side: Side) -> (K, V) {
        let id = self.extreme(subtree, side);
        let (parent, child) = {
            let n = &self.nodes[id];
            let child = match side {
                Side::Left => n.right,
                Side::Right => n.left,
            };
            (n.parent, child)
        };
        self.transplant(id, child);
        self.refresh_sizes(parent);
        let node = self.nodes.remove(id).expect("extreme node is live");
        (node.key, node.value)
    }

    /// Remove and return the smallest entry.
    pub fn delete_min(&mut self) -> Result<(K, V), MapError> {
        let root = self.root.ok_or(MapError::EmptyStructure)?;
        Ok(self.detach_extreme(root, Side::Left))
    }

    /// Remove and return the largest entry.
    pub fn delete_max(&mut self) -> Result<(K, V), MapError> {
        let root = self.root.ok_or(MapError::EmptyStructure)?;
        Ok(self.detach_extreme(root, Side::Right))
    }

    /// Remove `key` and return its entry; absent keys leave the map untouched.
    ///
    /// A node with at most one child is replaced by that child. A node with
    /// two children is replaced by its in-order successor, which first hands
    /// its own right child to its old parent.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let z = self.find(key)?;
        let (left, right, parent) = {
            let n = &self.nodes[z];
            (n.left, n.right, n.parent)
        };

        let lowest = match (left, right) {
            (l, None) => {
                self.transplant(z, l);
                parent
            }
            (None, r) => {
                self.transplant(z, r);
                parent
            }
            (Some(l), Some(r)) => {
                let s = self.extreme(r, Side::Left);
                let adjacent = s == r;
                let lowest = if !adjacent {
                    let s_parent = self.nodes[s].parent;
                    let s_right = self.nodes[s].right;
                    self.transplant(s, s_right);
                    self.nodes[s].right = Some(r);
                    self.nodes[r].parent = Some(s);
                    s_parent
                } else {
                    Some(s)
                };
                self.transplant(z, Some(s));
                self.nodes[s].left = Some(l);
                self.nodes[l].parent = Some(s);
                tracing::trace!(adjacent, "grafted in-order successor");
                lowest
            }
        };

        self.refresh_sizes(lowest);
        let node = self.nodes.remove(z).expect("found node is live");
        Some((node.key, node.value))
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    /// Number of keys strictly less than `key`.
    pub fn rank(&self, key: &K) -> usize {
        let mut rank = 0;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            match self.cmp.compare(key, &node.key) {
                Ordering::Less => cur = node.left,
                Ordering::Greater => {
                    rank += 1 + self.size(node.left);
                    cur = node.right;
                }
                Ordering::Equal => return rank + self.size(node.left),
            }
        }
        rank
    }

    /// The entry with exactly `index` smaller keys, if `index < len()`.
    pub fn select(&self, index: usize) -> Option<(&K, &V)> {
        let mut i = index;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            let left = self.size(node.left);
            match i.cmp(&left) {
                Ordering::Less => cur = node.left,
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Greater => {
                    i -= left + 1;
                    cur = node.right;
                }
            }
        }
        None
    }

    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            map: self,
            next: self.root.map(|r| self.extreme(r, Side::Left)),
            remaining: self.len(),
        }
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// In-order successor found by following parent links only.
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(r) = self.nodes[id].right {
            return Some(self.extreme(r, Side::Left));
        }
        let mut child = id;
        let mut up = self.nodes[id].parent;
        while let Some(p) = up {
            if self.nodes[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            up = self.nodes[p].parent;
        }
        None
    }

    /// Panics unless ordering, sizes, parent links and arena membership
    /// all agree with the tree reachable from the root.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        if let Some(r) = self.root {
            assert!(self.nodes[r].parent.is_none(), "root must not have a parent");
        }
        let mut reachable = 0usize;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            reachable += 1;
            let n = &self.nodes[id];
            assert_eq!(
                n.size,
                1 + self.size(n.left) + self.size(n.right),
                "stale subtree size"
            );
            for child in [n.left, n.right].into_iter().flatten() {
                assert_eq!(self.nodes[child].parent, Some(id), "broken parent link");
                stack.push(child);
            }
        }
        assert_eq!(reachable, self.nodes.len(), "arena holds unreachable nodes");
        assert_eq!(reachable, self.len());
        let keys: Vec<&K> = self.keys().collect();
        for w in keys.windows(2) {
            assert_eq!(
                self.cmp.compare(w[0], w[1]),
                Ordering::Less,
                "in-order keys must ascend strictly"
            );
        }
    }
}

/// In-order iterator over `(key, value)` pairs.
pub struct Iter<'a, K, V, C> {
    map: &'a OrderedMap<K, V, C>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    C: Compare<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let map = self.map;
        self.next = map.successor(id);
        self.remaining -= 1;
        let n = &map.nodes[id];
        Some((&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C> ExactSizeIterator for Iter<'a, K, V, C> where C: Compare<K> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(keys: &[i32]) -> OrderedMap<i32, String> {
        let mut m = OrderedMap::new();
        for &k in keys {
            m.insert(k, k.to_string());
        }
        m.assert_invariants();
        m
    }

    fn keys_of<C: Compare<i32>>(m: &OrderedMap<i32, String, C>) -> Vec<i32> {
        m.keys().copied().collect()
    }

    #[test]
    fn empty_map() {
        let m: OrderedMap<i32, String> = OrderedMap::new();
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
        assert!(keys_of(&m).is_empty());
        assert_eq!(m.get(&5), None);
        assert_eq!(m.min(), Err(MapError::EmptyStructure));
        assert_eq!(m.max(), Err(MapError::EmptyStructure));
    }

    #[test]
    fn insert_overwrites_without_growing() {
        let mut m = build(&[5]);
        assert_eq!(m.insert(5, "five".to_string()), Some("5".to_string()));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&5).map(String::as_str), Some("five"));
        m.assert_invariants();
    }

    #[test]
    fn keys_come_out_sorted() {
        let m = build(&[7, 3, 10, 5, 4]);
        assert_eq!(keys_of(&m), vec![3, 4, 5, 7, 10]);
        let values: Vec<&str> = m.values().map(String::as_str).collect();
        assert_eq!(values, ["3", "4", "5", "7", "10"]);
        assert_eq!(m.iter().len(), 5);
    }

    #[test]
    fn remove_two_child_root_promotes_successor() {
        let mut m = build(&[5, 3, 7, 2, 4, 6, 8]);
        assert_eq!(m.remove(&5), Some((5, "5".to_string())));
        assert_eq!(keys_of(&m), vec![2, 3, 4, 6, 7, 8]);
        assert_eq!(m.root.map(|r| m.nodes[r].key), Some(6));
        m.assert_invariants();
    }

    #[test]
    fn remove_with_successor_as_direct_child() {
        let mut m = build(&[5, 3, 7, 8]);
        m.remove(&5);
        assert_eq!(keys_of(&m), vec![3, 7, 8]);
        assert_eq!(m.root.map(|r| m.nodes[r].key), Some(7));
        m.assert_invariants();
    }

    #[test]
    fn remove_successor_with_right_child() {
        // The root's successor 60 carries a right subtree {65, 62}.
        let mut m = build(&[50, 30, 70, 60, 80, 65, 62]);
        m.remove(&50);
        assert_eq!(m.root.map(|r| m.nodes[r].key), Some(60));
        assert_eq!(keys_of(&m), vec![30, 60, 62, 65, 70, 80]);
        m.assert_invariants();
        m.remove(&60);
        assert_eq!(keys_of(&m), vec![30, 62, 65, 70, 80]);
        m.assert_invariants();
    }

    #[test]
    fn remove_leaf_and_single_child_nodes() {
        let mut m = build(&[5, 3, 7, 2, 8]);
        assert!(m.remove(&2).is_some());
        m.assert_invariants();
        assert!(m.remove(&3).is_some());
        m.assert_invariants();
        assert!(m.remove(&7).is_some());
        m.assert_invariants();
        assert_eq!(keys_of(&m), vec![5, 8]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut m = build(&[2, 1, 3]);
        assert_eq!(m.remove(&9), None);
        assert_eq!(m.len(), 3);
        m.assert_invariants();
    }

    #[test]
    fn delete_min_and_max_drain_in_order() {
        let mut m = build(&[5, 3, 7, 2, 4, 6, 8]);
        assert_eq!(m.delete_min().map(|(k, _)| k), Ok(2));
        assert_eq!(m.delete_max().map(|(k, _)| k), Ok(8));
        m.assert_invariants();
        assert_eq!(m.min().map(|(k, _)| *k), Ok(3));
        assert_eq!(m.max().map(|(k, _)| *k), Ok(7));

        let mut drained = Vec::new();
        while let Ok((k, _)) = m.delete_min() {
            drained.push(k);
            m.assert_invariants();
        }
        assert_eq!(drained, vec![3, 4, 5, 6, 7]);
        assert_eq!(m.delete_min(), Err(MapError::EmptyStructure));
        assert_eq!(m.delete_max(), Err(MapError::EmptyStructure));
    }

    #[test]
    fn delete_extremes_promote_only_child() {
        // Root 1 has only a right subtree; 9 has only a left subtree.
        let mut m = build(&[1, 9, 5, 3, 7]);
        assert_eq!(m.delete_min().map(|(k, _)| k), Ok(1));
        assert_eq!(m.root.map(|r| m.nodes[r].key), Some(9));
        assert_eq!(m.delete_max().map(|(k, _)| k), Ok(9));
        assert_eq!(m.root.map(|r| m.nodes[r].key), Some(5));
        m.assert_invariants();
    }

    #[test]
    fn rank_and_select_agree() {
        let m = build(&[50, 20, 80, 10, 30, 70, 90]);
        for (i, k) in keys_of(&m).into_iter().enumerate() {
            assert_eq!(m.rank(&k), i);
            assert_eq!(m.select(i).map(|(key, _)| *key), Some(k));
        }
        assert_eq!(m.rank(&0), 0);
        assert_eq!(m.rank(&55), 4);
        assert_eq!(m.rank(&100), 7);
        assert_eq!(m.select(7), None);
    }

    #[test]
    fn custom_comparator_reverses_order() {
        let mut m = OrderedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for k in [1, 4, 2, 3] {
            m.insert(k, k.to_string());
        }
        assert_eq!(keys_of(&m), vec![4, 3, 2, 1]);
        assert_eq!(m.min().map(|(k, _)| *k), Ok(4));
        m.assert_invariants();
    }

    #[test]
    fn degenerate_chain_is_handled_without_recursion() {
        let keys: Vec<i32> = (0..5_000).collect();
        let mut m = build(&keys);
        assert_eq!(m.len(), 5_000);
        assert_eq!(m.get(&4_999).map(String::as_str), Some("4999"));
        assert_eq!(m.keys().count(), 5_000);
        assert!(m.remove(&2_500).is_some());
        assert_eq!(m.delete_max().map(|(k, _)| k), Ok(4_999));
        assert_eq!(m.len(), 4_998);
        m.assert_invariants();
    }

    #[test]
    fn clear_detaches_everything() {
        let mut m = build(&[3, 1, 2]);
        if let Some(v) = m.get_mut(&2) {
            v.push('!');
        }
        assert_eq!(m.get(&2).map(String::as_str), Some("2!"));
        m.clear();
        assert!(m.is_empty());
        assert!(!m.contains_key(&2));
        m.assert_invariants();
        m.insert(4, "4".into());
        assert_eq!(keys_of(&m), vec![4]);
    }

    #[test]
    fn iterators_are_single_pass() {
        let m = build(&[2, 1, 3]);
        let mut it = m.keys();
        assert_eq!(it.by_ref().count(), 3);
        assert_eq!(it.next(), None);
        assert_eq!(m.keys().count(), 3);
    }
}
