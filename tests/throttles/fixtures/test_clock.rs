// tests/throttles/fixtures/test_clock.rs

// dependencies
use consensus_throttle::{Clock, ClockError, Timestamp};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

// Test clock implementation
#[derive(Debug, Clone)]
pub struct TestClock {
    nanos: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
}

impl TestClock {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(initial.as_nanos())),
            should_fail: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn advance_nanos(&self, nanos: u64) {
        self.nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_nanos(secs * 1_000_000_000);
    }

    pub fn set(&self, time: Timestamp) {
        self.nanos.store(time.as_nanos(), Ordering::Relaxed);
    }

    // Make the next call to `now()` return an error
    pub fn fail_next_call(&self) {
        self.should_fail.store(true, Ordering::Relaxed);
    }

    pub fn current(&self) -> Timestamp {
        Timestamp::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

impl Clock for TestClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        if self.should_fail.swap(false, Ordering::Relaxed) {
            Err(ClockError::SystemTimeError)
        } else {
            Ok(self.current())
        }
    }
}
