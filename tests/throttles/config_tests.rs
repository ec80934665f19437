// tests/throttles/config_tests.rs

#[cfg(test)]
mod tests {
    use consensus_throttle::{
        BucketThrottle, DeterministicThrottle, GasLimitBucketThrottle, GasThrottleConfig,
        ThrottleConfig, ThrottleError,
    };

    // Config validation tests
    #[test]
    fn config_rejects_zero_rate() {
        let config = ThrottleConfig::new(0);
        let result = config.validate();
        assert_eq!(result.unwrap_err(), ThrottleError::ZeroRate);
    }

    #[test]
    fn config_rejects_throttle_that_can_never_pass() {
        // 500 mTPS over a one-second burst accumulates half a transaction
        let config = ThrottleConfig::new(500);
        let result = config.validate();
        assert!(matches!(
            result.unwrap_err(),
            ThrottleError::NeverPasses {
                rate: 500,
                burst_period_secs: 1,
            }
        ));
    }

    #[test]
    fn config_rejects_zero_burst_period() {
        let config = ThrottleConfig::per_second(100).burst_period_secs(0);
        assert!(matches!(
            config.validate().unwrap_err(),
            ThrottleError::NeverPasses { .. }
        ));
    }

    #[test]
    fn config_rejects_capacity_overflow() {
        let config = ThrottleConfig::new(u64::MAX);
        assert!(matches!(
            config.validate().unwrap_err(),
            ThrottleError::CapacityOverflow { .. }
        ));
    }

    #[test]
    fn overwhelming_tps_still_fails_deterministically() {
        // the TPS-to-mTPS conversion saturates, and the saturated rate can
        // never pass the capacity check
        let result = DeterministicThrottle::with_tps(u64::MAX);
        assert!(matches!(
            result.unwrap_err(),
            ThrottleError::CapacityOverflow { .. }
        ));
    }

    #[test]
    fn a_longer_burst_period_rescues_a_subunit_rate() {
        // half a transaction per second never passes alone, but over four
        // seconds the bucket holds two whole transactions
        assert!(ThrottleConfig::new(500).validate().is_err());
        let config = ThrottleConfig::new(500).burst_period_secs(4);
        assert!(config.validate().is_ok());
        let throttle = BucketThrottle::with_config(&config).unwrap();
        assert_eq!(
            throttle.total_capacity(),
            2 * consensus_throttle::CAPACITY_UNITS_PER_TXN
        );
    }

    #[test]
    fn config_accepts_valid_parameters() {
        let config = ThrottleConfig::per_second(100).burst_period_secs(2);
        assert!(config.validate().is_ok());
    }

    // Test config builder pattern
    #[test]
    fn config_builder_pattern_works() {
        let config = ThrottleConfig::new(1)
            .milli_tps(10_000)
            .burst_period_secs(5)
            .named("crypto-transfers");
        assert!(config.validate().is_ok());

        let throttle = DeterministicThrottle::with_config(config).unwrap();
        assert_eq!(throttle.milli_tps(), 10_000);
        assert_eq!(throttle.name(), Some("crypto-transfers"));
    }

    #[test]
    fn constructor_with_invalid_config_fails() {
        let result = DeterministicThrottle::with_config(ThrottleConfig::new(0));
        assert_eq!(result.unwrap_err(), ThrottleError::ZeroRate);
    }

    // Gas config tests
    #[test]
    fn gas_config_rejects_zero_rate() {
        let result = GasThrottleConfig::new(0).validate();
        assert_eq!(result.unwrap_err(), ThrottleError::ZeroRate);
    }

    #[test]
    fn gas_config_rejects_capacity_overflow() {
        let config = GasThrottleConfig::new(u64::MAX).burst_period_secs(2);
        assert!(matches!(
            config.validate().unwrap_err(),
            ThrottleError::CapacityOverflow { .. }
        ));
    }

    #[test]
    fn gas_config_builder_pattern_works() {
        let config = GasThrottleConfig::new(1)
            .gas_per_sec(15_000_000)
            .burst_period_secs(2)
            .named("contract-gas");
        assert!(config.validate().is_ok());

        let throttle = GasLimitBucketThrottle::with_config(&config).unwrap();
        assert_eq!(throttle.gas_per_sec(), 15_000_000);
        assert_eq!(throttle.total_capacity(), 30_000_000);
    }
}
