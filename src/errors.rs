// src/errors.rs

// error handling for the throttle types

// dependencies
use crate::clock::{ClockError, Timestamp};

/// Error type for throttle configuration and replay-ordering issues.
///
/// Ordinary capacity exhaustion is not an error; `allow` reports it as a
/// plain `false` decision.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThrottleError {
    /// Configured rate is zero; such a throttle would never leak.
    #[error("throttle rate must be positive")]
    ZeroRate,

    /// Rate and burst period combine to a bucket too small to ever admit
    /// one whole unit of work.
    #[error(
        "a throttle of rate {rate} with burst period {burst_period_secs}s \
         can never admit a full unit of work"
    )]
    NeverPasses { rate: u64, burst_period_secs: u64 },

    /// Rate and burst period combine to a capacity beyond 64-bit range.
    #[error("bucket capacity for rate {rate} over {burst_period_secs}s overflows 64 bits")]
    CapacityOverflow { rate: u64, burst_period_secs: u64 },

    /// A decision timestamp earlier than the last recorded decision; the
    /// consensus timeline must never move backwards.
    #[error("throttle timeline must advance, but {proposed} is not after {last}")]
    TimestampWentBackwards { last: Timestamp, proposed: Timestamp },

    /// The injected wall clock failed (no-timestamp overload only).
    #[error("clock error occurred")]
    Clock(#[from] ClockError),
}
