//! Construction-time sizing policy for `ProbeTable`.

use crate::error::ConfigError;

pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
pub const DEFAULT_GROW_THRESHOLD: f64 = 0.75;
pub const DEFAULT_SHRINK_THRESHOLD: f64 = 0.25;
pub const DEFAULT_GROW_FACTOR: f64 = 2.0;
pub const DEFAULT_SHRINK_FACTOR: f64 = 0.5;

/// Capacity and resize thresholds for a `ProbeTable`.
///
/// The table grows as soon as an insert brings `len / capacity` to
/// `grow_threshold` and shrinks as soon as a removal brings it down to
/// `shrink_threshold`. Both resizes run inline on the triggering call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeConfig {
    pub initial_capacity: usize,
    pub grow_threshold: f64,
    pub shrink_threshold: f64,
    pub grow_factor: f64,
    pub shrink_factor: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            grow_threshold: DEFAULT_GROW_THRESHOLD,
            shrink_threshold: DEFAULT_SHRINK_THRESHOLD,
            grow_factor: DEFAULT_GROW_FACTOR,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
        }
    }
}

impl ProbeConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_thresholds(mut self, shrink: f64, grow: f64) -> Self {
        self.shrink_threshold = shrink;
        self.grow_threshold = grow;
        self
    }

    pub fn with_factors(mut self, shrink: f64, grow: f64) -> Self {
        self.shrink_factor = shrink;
        self.grow_factor = grow;
        self
    }

    /// Check that the policy cannot strand the table full or make it
    /// bounce between sizes on a single insert/remove pair.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(self.grow_threshold > 0.0 && self.grow_threshold <= 1.0) {
            return Err(ConfigError::GrowThreshold(self.grow_threshold));
        }
        if !(self.shrink_threshold > 0.0 && self.shrink_threshold < self.grow_threshold) {
            return Err(ConfigError::ShrinkThreshold {
                shrink: self.shrink_threshold,
                grow: self.grow_threshold,
            });
        }
        if !(self.grow_factor > 1.0) {
            return Err(ConfigError::GrowFactor(self.grow_factor));
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(ConfigError::ShrinkFactor(self.shrink_factor));
        }
        if self.shrink_threshold / self.shrink_factor >= self.grow_threshold {
            return Err(ConfigError::Oscillation {
                shrink: self.shrink_threshold,
                factor: self.shrink_factor,
                grow: self.grow_threshold,
            });
        }
        Ok(())
    }

    /// Capacity after growing from `capacity`; always strictly larger.
    pub(crate) fn grown(&self, capacity: usize) -> usize {
        let scaled = (capacity as f64 * self.grow_factor).ceil() as usize;
        scaled.max(capacity + 1)
    }

    /// Capacity after shrinking from `capacity`; never below one slot.
    pub(crate) fn shrunk(&self, capacity: usize) -> usize {
        let scaled = (capacity as f64 * self.shrink_factor).floor() as usize;
        scaled.clamp(1, capacity.max(1))
    }
}
