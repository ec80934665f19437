// tests/throttles/main.rs


mod config_tests;
mod gas_throttle_tests;

// Re-export common test utilities
pub use fixtures::test_clock::TestClock;
