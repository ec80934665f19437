// src/bucket.rs

// discrete leaky bucket: the clamped capacity counter under every throttle

/// A discrete leaky bucket with a fixed total capacity.
///
/// All arithmetic is saturating-by-construction: `used` can never leave the
/// range `0..=total_capacity`, no matter what sequence of leaks, uses, and
/// resets is applied. The bucket has no time source of its own; callers
/// convert elapsed time into leak units before calling in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiscreteLeakyBucket {
    total_capacity: u64,
    used: u64,
}

impl DiscreteLeakyBucket {
    /// Create an empty bucket with the given total capacity.
    pub(crate) fn new(total_capacity: u64) -> Self {
        Self {
            total_capacity,
            used: 0,
        }
    }

    pub(crate) fn total_capacity(&self) -> u64 {
        self.total_capacity
    }

    pub(crate) fn capacity_used(&self) -> u64 {
        self.used
    }

    pub(crate) fn capacity_free(&self) -> u64 {
        self.total_capacity - self.used
    }

    /// Drain up to `units` of used capacity, flooring at an empty bucket.
    pub(crate) fn leak(&mut self, units: u64) {
        self.used = self.used.saturating_sub(units);
    }

    /// Consume capacity directly, bypassing the leak step. Clamped at the
    /// total capacity so the bucket invariant survives oversized requests
    /// (admission checks belong to the owning throttle, not the bucket).
    pub(crate) fn use_capacity(&mut self, units: u64) {
        self.used = self.used.saturating_add(units).min(self.total_capacity);
    }

    /// Overwrite the used capacity, clamped at the total capacity. Used for
    /// snapshot restore and test bootstrapping.
    pub(crate) fn reset_used(&mut self, units: u64) {
        self.used = units.min(self.total_capacity);
    }
}
