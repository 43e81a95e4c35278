//! assocmap: two single-threaded associative maps with different trade-offs.
//!
//! Internal Design:
//!
//! Summary
//! - `ProbeTable<V, H>`: unordered `String -> V` map. Open addressing with
//!   linear probing over a flat slot array; resizes eagerly on the call
//!   that crosses a load threshold.
//! - `OrderedMap<K, V, C>`: ordered `K -> V` map. Unbalanced binary search
//!   tree whose nodes carry their subtree size and a parent link, giving
//!   rank/select and parent-walking in-order iteration.
//! - The two maps share only the error type; neither depends on the other.
//!
//! ProbeTable
//! - A key's home slot is `hash(key) mod capacity`. The hash (`StringHash`)
//!   is capacity-independent, so home slots move on every resize.
//! - Growth happens when an insert brings the load factor to the grow
//!   threshold, shrinking when a removal brings it to the shrink threshold.
//!   Both are set per table through `ProbeConfig` (16 slots, 0.75, 0.25,
//!   x2, x0.5 by default) and re-insert every entry into a fresh array.
//! - Removal never leaves a tombstone. The freed slot is cleared and every
//!   following entry of the cluster is re-placed, so "stop at the first
//!   empty slot" stays a correct miss condition for lookups.
//! - A probe that visits every slot without a hit or an empty slot means
//!   the resize policy has been bypassed; `try_put` reports it as
//!   `MapError::TableFull` and `put` panics.
//!
//! OrderedMap
//! - Nodes live in a `slotmap::SlotMap` arena. `left`, `right` and `parent`
//!   are arena keys, so back-links never own anything.
//! - Insert attaches a leaf and bumps sizes on the way back to the root.
//!   Removal uses successor promotion for two-child nodes and recomputes
//!   sizes from the lowest structurally changed node upward.
//! - No rebalancing: height is linear in the worst case. Every walk is a
//!   loop, never recursion, so degenerate trees do not exhaust the stack.
//! - `min`/`max`/`delete_min`/`delete_max` on an empty map return
//!   `MapError::EmptyStructure`.
//!
//! Conventions
//! - Misses are `Option::None`, never errors.
//! - Removing an absent key is a no-op that returns `None` in both maps.
//! - Mutation takes `&mut self`; there is no interior locking. Share across
//!   threads behind an external lock.
//! - Resizes and structural changes emit `tracing` events at debug/trace
//!   level; no subscriber is installed by the crate.

pub mod compare;
pub mod config;
pub mod error;
pub mod ordered_map;
mod ordered_map_proptest;
pub mod probe_table;
mod probe_table_proptest;
pub mod string_hash;

// Public surface
pub use compare::{Compare, Natural};
pub use config::ProbeConfig;
pub use error::{ConfigError, MapError};
pub use ordered_map::OrderedMap;
pub use probe_table::ProbeTable;
pub use string_hash::{Poly31, StringHash};
