// src/snapshot.rs

// usage snapshots: the state-transfer payload shared by both throttle variants

// dependencies
use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The minimal state needed to resume a deterministic throttle's decisions
/// identically on another replica, or on the same replica after a restart.
///
/// Two snapshots are equal iff both fields are equal, so a snapshot doubles
/// as an equality-comparable test fixture. The serde form is stable: a plain
/// `used` integer and an optional integer timestamp, both exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageSnapshot {
    used: u64,
    last_decision_time: Option<Timestamp>,
}

impl UsageSnapshot {
    pub const fn new(used: u64, last_decision_time: Option<Timestamp>) -> Self {
        Self {
            used,
            last_decision_time,
        }
    }

    /// Capacity units (or gas) in use when the snapshot was taken.
    pub const fn used(&self) -> u64 {
        self.used
    }

    /// Consensus time of the last decision, or `None` for a throttle that
    /// had not yet decided anything.
    pub const fn last_decision_time(&self) -> Option<Timestamp> {
        self.last_decision_time
    }
}

impl fmt::Display for UsageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_decision_time {
            Some(time) => write!(f, "used={} @ {}", self.used, time),
            None => write!(f, "used={} @ <never>", self.used),
        }
    }
}
