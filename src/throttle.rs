// src/throttle.rs

// fixed-point transaction-count throttle and its deterministic wrapper

// dependencies
use crate::bucket::DiscreteLeakyBucket;
use crate::clock::{Clock, Timestamp};
use crate::config::ThrottleConfig;
use crate::errors::ThrottleError;
use crate::snapshot::UsageSnapshot;
use std::fmt;

/// Milli-transactions per whole transaction.
pub const MTPS_PER_TPS: u64 = 1_000;

/// Nanoseconds per second.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Fixed-point capacity units representing one nanosecond-transaction.
pub const CAPACITY_UNITS_PER_NANO_TXN: u64 = 1_000;

/// Fixed-point capacity units representing one whole transaction.
pub const CAPACITY_UNITS_PER_TXN: u64 = CAPACITY_UNITS_PER_NANO_TXN * NANOS_PER_SEC;

/// Capacity units accumulated per second by one mTPS of configured rate.
pub(crate) const CAPACITY_UNITS_PER_SEC_PER_MTPS: u64 = CAPACITY_UNITS_PER_TXN / MTPS_PER_TPS;

// The whole fixed-point scheme hinges on one mTPS leaking exactly one
// capacity unit per nanosecond; every replica must agree on this.
const _: () = assert!(CAPACITY_UNITS_PER_SEC_PER_MTPS == NANOS_PER_SEC);
const _: () = assert!(CAPACITY_UNITS_PER_TXN == 1_000_000_000_000);

/// A leaky-bucket throttle over a count of transactions, in fixed-point
/// capacity units.
///
/// The throttle has no clock; callers supply the nanoseconds elapsed since
/// the previous decision. All mutation is 64-bit integer arithmetic with
/// every multiplication overflow-guarded, so identical call sequences give
/// identical results on every replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketThrottle {
    bucket: DiscreteLeakyBucket,
    milli_tps: u64,
    last_allowed_units: Option<u64>,
}

impl BucketThrottle {
    /// Create a throttle admitting `tps` whole transactions per second,
    /// with a one-second burst period.
    pub fn with_tps(tps: u64) -> Result<Self, ThrottleError> {
        Self::with_config(&ThrottleConfig::per_second(tps))
    }

    /// Create a throttle admitting `milli_tps` milli-transactions per
    /// second, with a one-second burst period.
    pub fn with_milli_tps(milli_tps: u64) -> Result<Self, ThrottleError> {
        Self::with_config(&ThrottleConfig::new(milli_tps))
    }

    /// Create a throttle admitting `tps` whole transactions per second,
    /// accumulating capacity over `burst_period_secs`.
    pub fn with_tps_and_burst_period(
        tps: u64,
        burst_period_secs: u64,
    ) -> Result<Self, ThrottleError> {
        Self::with_config(&ThrottleConfig::per_second(tps).burst_period_secs(burst_period_secs))
    }

    /// Create a throttle admitting `milli_tps` milli-transactions per
    /// second, accumulating capacity over `burst_period_secs`.
    pub fn with_milli_tps_and_burst_period(
        milli_tps: u64,
        burst_period_secs: u64,
    ) -> Result<Self, ThrottleError> {
        Self::with_config(&ThrottleConfig::new(milli_tps).burst_period_secs(burst_period_secs))
    }

    /// Create a throttle from a validated configuration.
    pub fn with_config(config: &ThrottleConfig) -> Result<Self, ThrottleError> {
        let capacity = config.total_capacity_units()?;
        Ok(Self {
            bucket: DiscreteLeakyBucket::new(capacity),
            milli_tps: config.milli_tps,
            last_allowed_units: None,
        })
    }

    /// Decide whether `n` transactions fit, given `elapsed_nanos` since the
    /// previous decision. Leak first, then consume; the leak is kept even
    /// when the request is denied.
    pub fn allow(&mut self, n: u64, elapsed_nanos: u64) -> bool {
        self.leak_for(elapsed_nanos);
        let Some(required) = n.checked_mul(CAPACITY_UNITS_PER_TXN) else {
            // a request too large to cost out can never fit
            return false;
        };
        if required > self.bucket.capacity_free() {
            return false;
        }
        self.bucket.use_capacity(required);
        self.last_allowed_units = Some(required);
        true
    }

    /// Undo the most recent successful `allow`. Idempotent: a second call
    /// without an intervening grant is a no-op.
    pub fn reclaim_last_allowed_use(&mut self) {
        if let Some(units) = self.last_allowed_units.take() {
            tracing::trace!(units, "reclaiming last allowed use");
            self.bucket.leak(units);
        }
    }

    /// Commit permanently to the most recent grant, making a later reclaim
    /// a no-op.
    pub fn reset_last_allowed_use(&mut self) {
        self.last_allowed_units = None;
    }

    // one mTPS leaks exactly one capacity unit per nanosecond, so the
    // elapsed-time leak is a single guarded multiplication
    fn leak_for(&mut self, elapsed_nanos: u64) {
        match elapsed_nanos.checked_mul(self.milli_tps) {
            Some(units) => self.bucket.leak(units),
            // enough time passed that the exact product no longer matters
            None => self.bucket.leak(self.bucket.capacity_used()),
        }
    }

    /// Configured rate in milli-transactions per second.
    pub fn milli_tps(&self) -> u64 {
        self.milli_tps
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

/// A [`BucketThrottle`] driven by consensus timestamps instead of raw
/// elapsed durations.
///
/// The wrapper records the time of every decision and converts successive
/// timestamps into the elapsed nanoseconds the bucket arithmetic needs. The
/// recorded time never moves backwards: a timestamp earlier than the last
/// decision is an ordering violation and fails without touching any state.
/// Current usage can be exported as a [`UsageSnapshot`] and adopted by any
/// equivalently configured throttle, which is how replicas hand state to
/// each other across reconnects and restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicThrottle {
    delegate: BucketThrottle,
    last_decision_time: Option<Timestamp>,
    name: Option<String>,
}

impl DeterministicThrottle {
    pub fn with_tps(tps: u64) -> Result<Self, ThrottleError> {
        Self::with_config(ThrottleConfig::per_second(tps))
    }

    pub fn with_milli_tps(milli_tps: u64) -> Result<Self, ThrottleError> {
        Self::with_config(ThrottleConfig::new(milli_tps))
    }

    pub fn with_tps_and_burst_period(
        tps: u64,
        burst_period_secs: u64,
    ) -> Result<Self, ThrottleError> {
        Self::with_config(ThrottleConfig::per_second(tps).burst_period_secs(burst_period_secs))
    }

    pub fn with_milli_tps_and_burst_period(
        milli_tps: u64,
        burst_period_secs: u64,
    ) -> Result<Self, ThrottleError> {
        Self::with_config(ThrottleConfig::new(milli_tps).burst_period_secs(burst_period_secs))
    }

    /// Create a throttle from a validated configuration, carrying over its
    /// diagnostic name if one was set.
    pub fn with_config(config: ThrottleConfig) -> Result<Self, ThrottleError> {
        let delegate = BucketThrottle::with_config(&config)?;
        tracing::debug!(
            milli_tps = config.milli_tps,
            burst_period_secs = config.burst_period_secs,
            name = config.name.as_deref(),
            capacity = delegate.total_capacity(),
            "created deterministic throttle"
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

    /// Decide whether `n` transactions are admitted at consensus time `now`.
    ///
    /// The very first decision uses zero elapsed time (there is no baseline
    /// to leak from). Afterwards `now` may equal the previous decision time
    /// but must never precede it; a backwards timestamp is an error and the
    /// throttle is left exactly as it was. On any `Ok` outcome, allowed or
    /// denied, `now` becomes the new last decision time.
    pub fn allow(&mut self, n: u64, now: Timestamp) -> Result<bool, ThrottleError> {
        let elapsed_nanos = match self.last_decision_time {
            None => 0,
            Some(last) => now
                .nanos_since(last)
                .ok_or(ThrottleError::TimestampWentBackwards {
                    last,
                    proposed: now,
                })?,
        };
        let decision = self.delegate.allow(n, elapsed_nanos);
        self.last_decision_time = Some(now);
        Ok(decision)
    }

    /// Decide whether `n` transactions are admitted right now, reading the
    /// current time from the given clock.
    pub fn allow_now(&mut self, n: u64, clock: &impl Clock) -> Result<bool, ThrottleError> {
        let now = clock.now()?;
        self.allow(n, now)
    }

    /// Undo the most recent successful `allow`; idempotent.
    pub fn reclaim_last_allowed_use(&mut self) {
        self.delegate.reclaim_last_allowed_use();
    }

    /// Commit permanently to the most recent grant.
    pub fn reset_last_allowed_use(&mut self) {
        self.delegate.reset_last_allowed_use();
    }

    /// Capture the current usage as a transferable snapshot. Pure read.
    pub fn usage_snapshot(&self) -> UsageSnapshot {
        UsageSnapshot::new(self.delegate.capacity_used(), self.last_decision_time)
    }

    /// Adopt a snapshot wholesale, bypassing leak arithmetic. This is how a
    /// replica resumes another's (or its own prior) throttle state exactly.
    pub fn reset_usage_to(&mut self, snapshot: UsageSnapshot) {
        tracing::debug!(
            name = self.name.as_deref(),
            %snapshot,
            "restoring throttle usage from snapshot"
        );
        self.delegate.reset_used(snapshot.used());
        self.last_decision_time = snapshot.last_decision_time();
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn milli_tps(&self) -> u64 {
        self.delegate.milli_tps()
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

impl fmt::Display for DeterministicThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeterministicThrottle{{")?;
        if let Some(name) = &self.name {
            write!(f, "name={name}, ")?;
        }
        write!(
            f,
            "mtps={}, used={}/{}, last decision @ ",
            self.delegate.milli_tps(),
            self.delegate.capacity_used(),
            self.delegate.total_capacity(),
        )?;
        match self.last_decision_time {
            Some(time) => write!(f, "{time}}}"),
            None => write!(f, "<never>}}"),
        }
    }
}
