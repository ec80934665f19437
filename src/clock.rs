// src/clock.rs

// consensus timestamps and clock abstraction

// dependencies
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A consensus decision timestamp, in whole nanoseconds since the Unix epoch.
///
/// Replicas exchange and compare these values directly, so the representation
/// must be a plain integer with no platform-dependent precision. Ordering is
/// ordinary integer ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1_000_000_000))
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Nanoseconds from `earlier` to `self`, or `None` if `self` is earlier.
    pub const fn nanos_since(self, earlier: Timestamp) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }

    pub const fn plus_nanos(self, nanos: u64) -> Self {
        Self(self.0.saturating_add(nanos))
    }

    pub const fn minus_nanos(self, nanos: u64) -> Self {
        Self(self.0.saturating_sub(nanos))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.0 / 1_000_000_000, self.0 % 1_000_000_000)
    }
}

/// Clock trait to abstract wall-clock retrieval for the no-timestamp
/// `allow` overload. Implementors must be thread-safe (Send + Sync).
/// Consensus-driven callers never touch a clock; they pass the ordered
/// timestamp explicitly.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<Timestamp, ClockError>;
}

/// Clock error type
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("system time is before the Unix epoch")]
    SystemTimeError,
}

/// SystemClock implementation using the system time.
/// Returns the current time in nanoseconds since the Unix epoch.
/// This is the default clock used by the no-timestamp overload.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| Timestamp::from_nanos(d.as_nanos() as u64))
            .map_err(|_| ClockError::SystemTimeError)
    }
}
