// tests/throttles/gas_throttle_tests.rs

#[cfg(test)]
mod tests {
    use crate::TestClock;
    use consensus_throttle::{
        GasLimitBucketThrottle, GasLimitDeterministicThrottle, GasThrottleConfig, ThrottleError,
        Timestamp,
    };

    fn t0() -> Timestamp {
        Timestamp::from_secs(1_700_000_000)
    }

    #[test]
    fn percent_used_reflects_hypothetical_leaks() {
        let mut throttle = GasLimitBucketThrottle::with_gas_per_sec(1_000_000).unwrap();
        assert!(throttle.allow(500_000, 0));

        assert_eq!(throttle.percent_used(0), 50.0);
        // 250ms at 1M gas/sec leaks 250k of the 500k in use
        assert_eq!(throttle.percent_used(250_000_000), 25.0);
        // the hypothetical read never mutates
        assert_eq!(throttle.capacity_used(), 500_000);
    }

    #[test]
    fn percent_used_floors_at_zero() {
        let mut throttle = GasLimitBucketThrottle::with_gas_per_sec(1_000_000).unwrap();
        assert!(throttle.allow(500_000, 0));
        assert_eq!(throttle.percent_used(10_000_000_000), 0.0);
    }

    #[test]
    fn free_to_used_ratio_with_nothing_used_is_the_sentinel() {
        let throttle = GasLimitBucketThrottle::with_gas_per_sec(1_000_000).unwrap();
        assert_eq!(throttle.free_to_used_ratio(), i64::MAX);
    }

    #[test]
    fn free_to_used_ratio_is_an_integer_quotient() {
        let mut throttle = GasLimitBucketThrottle::with_gas_per_sec(1_000_000).unwrap();
        assert!(throttle.allow(200_000, 0));
        assert_eq!(throttle.free_to_used_ratio(), 4);
    }

    #[test]
    fn gas_reclaim_is_idempotent() {
        let mut throttle = GasLimitBucketThrottle::with_gas_per_sec(1_000_000).unwrap();
        assert!(throttle.allow(300_000, 0));
        assert!(throttle.allow(400_000, 0));

        throttle.reclaim_last_allowed_use();
        assert_eq!(throttle.capacity_used(), 300_000);
        throttle.reclaim_last_allowed_use();
        assert_eq!(throttle.capacity_used(), 300_000);
    }

    #[test]
    fn deterministic_gas_throttle_follows_the_timeline_contract() {
        let mut throttle = GasLimitDeterministicThrottle::with_gas_per_sec(1_000_000).unwrap();

        assert!(throttle.allow(1_000_000, t0()).unwrap());
        assert!(!throttle.allow(1, t0()).unwrap());

        // half a second restores half the capacity
        let later = t0().plus_nanos(500_000_000);
        assert!(throttle.allow(500_000, later).unwrap());
        assert_eq!(throttle.capacity_free(), 0);

        let result = throttle.allow(1, t0());
        assert!(matches!(
            result.unwrap_err(),
            ThrottleError::TimestampWentBackwards { .. }
        ));
        assert_eq!(throttle.last_decision_time(), Some(later));
    }

    #[test]
    fn gas_snapshot_round_trip_is_identity() {
        let mut throttle = GasLimitDeterministicThrottle::with_gas_per_sec(1_000_000).unwrap();
        assert!(throttle.allow(250_000, t0()).unwrap());

        let snapshot = throttle.usage_snapshot();
        throttle.reset_usage_to(snapshot);
        assert_eq!(throttle.usage_snapshot(), snapshot);
    }

    #[test]
    fn gas_wall_clock_overload_reads_the_injected_clock() {
        let clock = TestClock::new(t0());
        let mut throttle = GasLimitDeterministicThrottle::with_gas_per_sec(1_000).unwrap();

        assert!(throttle.allow_now(1_000, &clock).unwrap());
        clock.advance_secs(2);
        assert!(throttle.allow_now(1_000, &clock).unwrap());
        assert_eq!(throttle.last_decision_time(), Some(clock.current()));
    }

    #[test]
    fn named_gas_throttle_renders_its_configuration() {
        let throttle = GasLimitDeterministicThrottle::with_config(
            GasThrottleConfig::new(15_000_000).named("consensus-gas"),
        )
        .unwrap();

        let rendered = throttle.to_string();
        assert!(rendered.contains("name=consensus-gas"));
        assert!(rendered.contains("gas/sec=15000000"));
        assert!(rendered.contains("<never>"));
    }
}
