// src/lib.rs

//! # Consensus Throttle
//!
//! Deterministic leaky-bucket throttles for consensus-ordered admission
//! control. Every replica that feeds a throttle the same configuration and
//! the same ordered sequence of decision timestamps computes byte-identical
//! allow/deny decisions: all mutating arithmetic is overflow-guarded 64-bit
//! integer math, and current usage round-trips exactly through
//! [`UsageSnapshot`] for state transfer across restarts and reconnects.
//!
//! ## Quick Example
//!
//! ```rust
//! use consensus_throttle::{DeterministicThrottle, Timestamp};
//!
//! let mut throttle = DeterministicThrottle::with_tps(100).unwrap();
//!
//! let t0 = Timestamp::from_secs(1_700_000_000);
//! assert!(throttle.allow(1, t0).unwrap());
//!
//! // a decision earlier on the timeline is a replay error, not a denial
//! assert!(throttle.allow(1, t0.minus_nanos(1)).is_err());
//!
//! // usage can be handed to another replica and adopted exactly
//! let snapshot = throttle.usage_snapshot();
//! let mut twin = DeterministicThrottle::with_tps(100).unwrap();
//! twin.reset_usage_to(snapshot);
//! assert_eq!(twin.usage_snapshot(), snapshot);
//! ```

// private modules
mod bucket;
mod clock;
mod config;
mod errors;
mod gas;
mod snapshot;
mod throttle;

// public API exports
pub use clock::{Clock, ClockError, SystemClock, Timestamp};
pub use config::{GasThrottleConfig, ThrottleConfig};
pub use errors::ThrottleError;
pub use gas::{GasLimitBucketThrottle, GasLimitDeterministicThrottle};
pub use snapshot::UsageSnapshot;
pub use throttle::{
    BucketThrottle, CAPACITY_UNITS_PER_NANO_TXN, CAPACITY_UNITS_PER_TXN, DeterministicThrottle,
    MTPS_PER_TPS, NANOS_PER_SEC,
};
