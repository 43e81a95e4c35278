//! Error types shared by both maps.
//!
//! Misses are not errors: lookups and removals report absence through
//! `Option`. The variants here cover structural preconditions and
//! configuration that cannot be honored.

/// Failure of a structural operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// `min`/`max`/`delete_min`/`delete_max` on an empty map.
    #[error("operation requires a non-empty map")]
    EmptyStructure,
    /// Linear probing visited every slot without finding room or the key.
    ///
    /// The resize policy keeps the load factor below one, so observing this
    /// means the table's invariants are already broken.
    #[error("probe sequence exhausted all {capacity} slots")]
    TableFull { capacity: usize },
}

/// Rejected `ProbeConfig`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,
    #[error("grow threshold {0} must lie in (0, 1]")]
    GrowThreshold(f64),
    #[error("shrink threshold {shrink} must lie in (0, {grow})")]
    ShrinkThreshold { shrink: f64, grow: f64 },
    #[error("grow factor {0} must be greater than 1")]
    GrowFactor(f64),
    #[error("shrink factor {0} must lie in (0, 1)")]
    ShrinkFactor(f64),
    #[error("shrinking at load {shrink} by {factor} would reach the grow threshold {grow}")]
    Oscillation { shrink: f64, factor: f64, grow: f64 },
}
