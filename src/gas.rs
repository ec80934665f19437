// src/gas.rs

// gas-denominated throttle and its deterministic wrapper

// dependencies
use crate::bucket::DiscreteLeakyBucket;
use crate::clock::{Clock, Timestamp};
use crate::config::GasThrottleConfig;
use crate::errors::ThrottleError;
use crate::snapshot::UsageSnapshot;
use crate::throttle::NANOS_PER_SEC;
use std::fmt;

/// A leaky-bucket throttle denominated directly in gas.
///
/// Unlike [`BucketThrottle`](crate::BucketThrottle) there is no fixed-point
/// unit cost: the requested amount *is* gas, and the bucket leaks
/// `gas_per_sec` every second. Mutation stays in integer arithmetic; only
/// the diagnostic reads produce floating point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasLimitBucketThrottle {
    bucket: DiscreteLeakyBucket,
    gas_per_sec: u64,
    last_allowed_units: Option<u64>,
}

impl GasLimitBucketThrottle {
    /// Create a throttle leaking `gas_per_sec`, with a one-second burst
    /// period (so total capacity equals the per-second rate).
    pub fn with_gas_per_sec(gas_per_sec: u64) -> Result<Self, ThrottleError> {
        Self::with_config(&GasThrottleConfig::new(gas_per_sec))
    }

    /// Create a throttle leaking `gas_per_sec`, accumulating capacity over
    /// `burst_period_secs`.
    pub fn with_gas_per_sec_and_burst_period(
        gas_per_sec: u64,
        burst_period_secs: u64,
    ) -> Result<Self, ThrottleError> {
        Self::with_config(&GasThrottleConfig::new(gas_per_sec).burst_period_secs(burst_period_secs))
    }

    /// Create a throttle from a validated configuration.
    pub fn with_config(config: &GasThrottleConfig) -> Result<Self, ThrottleError> {
        let capacity = config.total_capacity()?;
        Ok(Self {
            bucket: DiscreteLeakyBucket::new(capacity),
            gas_per_sec: config.gas_per_sec,
            last_allowed_units: None,
        })
    }

    /// Decide whether `gas` units fit, given `elapsed_nanos` since the
    /// previous decision. Leak first, then consume; the leak is kept even
    /// when the request is denied.
    pub fn allow(&mut self, gas: u64, elapsed_nanos: u64) -> bool {
        self.leak_for(elapsed_nanos);
        if gas > self.bucket.capacity_free() {
            return false;
        }
        self.bucket.use_capacity(gas);
        self.last_allowed_units = Some(gas);
        true
    }

    /// Undo the most recent successful `allow`; idempotent.
    pub fn reclaim_last_allowed_use(&mut self) {
        if let Some(units) = self.last_allowed_units.take() {
            tracing::trace!(units, "reclaiming last allowed gas");
            self.bucket.leak(units);
        }
    }

    /// Commit permanently to the most recent grant.
    pub fn reset_last_allowed_use(&mut self) {
        self.last_allowed_units = None;
    }

    /// Percentage of total capacity that would be in use after leaking for
    /// a further `hypothetical_elapsed_nanos`. Pure read, no mutation.
    pub fn percent_used(&self, hypothetical_elapsed_nanos: u64) -> f64 {
        let used = self.bucket.capacity_used();
        let remaining = used - used.min(self.effective_leak(hypothetical_elapsed_nanos));
        100.0 * remaining as f64 / self.bucket.total_capacity() as f64
    }

    /// Ratio of free to used capacity, with `i64::MAX` standing in for the
    /// infinite headroom of an empty bucket.
    pub fn free_to_used_ratio(&self) -> i64 {
        let used = self.bucket.capacity_used();
        if used == 0 {
            return i64::MAX;
        }
        i64::try_from(self.bucket.capacity_free() / used).unwrap_or(i64::MAX)
    }

    fn leak_for(&mut self, elapsed_nanos: u64) {
        let units = self.effective_leak(elapsed_nanos);
        self.bucket.leak(units);
    }

    fn effective_leak(&self, elapsed_nanos: u64) -> u64 {
        match elapsed_nanos.checked_mul(self.gas_per_sec) {
            Some(product) => product / NANOS_PER_SEC,
            // enough time passed that the exact product no longer matters
            None => self.bucket.capacity_used(),
        }
    }

    /// Configured leak rate in gas per second.
    pub fn gas_per_sec(&self) -> u64 {
        self.gas_per_sec
    }

    pub fn total_capacity(&self) -> u64 {
        self.bucket.total_capacity()
    }

    pub fn capacity_used(&self) -> u64 {
        self.bucket.capacity_used()
    }

    pub fn capacity_free(&self) -> u64 {
        self.bucket.capacity_free()
    }

    pub(crate) fn reset_used(&mut self, units: u64) {
        self.bucket.reset_used(units);
    }
}

/// A [`GasLimitBucketThrottle`] driven by consensus timestamps, with the
/// same timeline bookkeeping and snapshot protocol as
/// [`DeterministicThrottle`](crate::DeterministicThrottle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasLimitDeterministicThrottle {
    delegate: GasLimitBucketThrottle,
    last_decision_time: Option<Timestamp>,
    name: Option<String>,
}

impl GasLimitDeterministicThrottle {
    pub fn with_gas_per_sec(gas_per_sec: u64) -> Result<Self, ThrottleError> {
        Self::with_config(GasThrottleConfig::new(gas_per_sec))
    }

    pub fn with_gas_per_sec_and_burst_period(
        gas_per_sec: u64,
        burst_period_secs: u64,
    ) -> Result<Self, ThrottleError> {
        Self::with_config(GasThrottleConfig::new(gas_per_sec).burst_period_secs(burst_period_secs))
    }

    /// Create a throttle from a validated configuration, carrying over its
    /// diagnostic name if one was set.
    pub fn with_config(config: GasThrottleConfig) -> Result<Self, ThrottleError> {
        let delegate = GasLimitBucketThrottle::with_config(&config)?;
        tracing::debug!(
            gas_per_sec = config.gas_per_sec,
            burst_period_secs = config.burst_period_secs,
            name = config.name.as_deref(),
            capacity = delegate.total_capacity(),
            "created gas throttle"
        );
        Ok(Self {
            delegate,
            last_decision_time: None,
            name: config.name,
        })
    }

    /// Builder-style: attach a diagnostic name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Decide whether `gas` units are admitted at consensus time `now`.
    /// Same timeline contract as the count variant: first decision leaks
    /// nothing, equal timestamps are fine, backwards timestamps fail
    /// without mutating state.
    pub fn allow(&mut self, gas: u64, now: Timestamp) -> Result<bool, ThrottleError> {
        let elapsed_nanos = match self.last_decision_time {
            None => 0,
            Some(last) => now
                .nanos_since(last)
                .ok_or(ThrottleError::TimestampWentBackwards {
                    last,
                    proposed: now,
                })?,
        };
        let decision = self.delegate.allow(gas, elapsed_nanos);
        self.last_decision_time = Some(now);
        Ok(decision)
    }

    /// Decide whether `gas` units are admitted right now, reading the
    /// current time from the given clock.
    pub fn allow_now(&mut self, gas: u64, clock: &impl Clock) -> Result<bool, ThrottleError> {
        let now = clock.now()?;
        self.allow(gas, now)
    }

    pub fn reclaim_last_allowed_use(&mut self) {
        self.delegate.reclaim_last_allowed_use();
    }

    pub fn reset_last_allowed_use(&mut self) {
        self.delegate.reset_last_allowed_use();
    }

    /// Percentage of capacity in use after a hypothetical further leak;
    /// pure read.
    pub fn percent_used(&self, hypothetical_elapsed_nanos: u64) -> f64 {
        self.delegate.percent_used(hypothetical_elapsed_nanos)
    }

    /// Free-to-used ratio with the empty-bucket `i64::MAX` sentinel.
    pub fn free_to_used_ratio(&self) -> i64 {
        self.delegate.free_to_used_ratio()
    }

    /// Capture the current usage as a transferable snapshot. Pure read.
    pub fn usage_snapshot(&self) -> UsageSnapshot {
        UsageSnapshot::new(self.delegate.capacity_used(), self.last_decision_time)
    }

    /// Adopt a snapshot wholesale, bypassing leak arithmetic.
    pub fn reset_usage_to(&mut self, snapshot: UsageSnapshot) {
        tracing::debug!(
            name = self.name.as_deref(),
            %snapshot,
            "restoring gas throttle usage from snapshot"
        );
        self.delegate.reset_used(snapshot.used());
        self.last_decision_time = snapshot.last_decision_time();
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn gas_per_sec(&self) -> u64 {
        self.delegate.gas_per_sec()
    }

    pub fn total_capacity(&self) -> u64 {
        self.delegate.total_capacity()
    }

    pub fn capacity_used(&self) -> u64 {
        self.delegate.capacity_used()
    }

    pub fn capacity_free(&self) -> u64 {
        self.delegate.capacity_free()
    }

    pub fn last_decision_time(&self) -> Option<Timestamp> {
        self.last_decision_time
    }
}

impl fmt::Display for GasLimitDeterministicThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GasLimitDeterministicThrottle{{")?;
        if let Some(name) = &self.name {
            write!(f, "name={name}, ")?;
        }
        write!(
            f,
            "gas/sec={}, used={}/{}, last decision @ ",
            self.delegate.gas_per_sec(),
            self.delegate.capacity_used(),
            self.delegate.total_capacity(),
        )?;
        match self.last_decision_time {
            Some(time) => write!(f, "{time}}}"),
            None => write!(f, "<never>}}"),
        }
    }
}
