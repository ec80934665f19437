// src/config.rs

//! Configuration types for the throttle variants

// dependencies
use crate::errors::ThrottleError;
use crate::throttle::{CAPACITY_UNITS_PER_SEC_PER_MTPS, CAPACITY_UNITS_PER_TXN, MTPS_PER_TPS};

/// Configuration for the transaction-count throttle.
///
/// Rates are carried in milli-transactions-per-second (mTPS), the finest
/// granularity the fixed-point arithmetic supports; whole-TPS figures are
/// converted on entry. The burst period defaults to one second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    pub(crate) milli_tps: u64,
    pub(crate) burst_period_secs: u64,
    pub(crate) name: Option<String>,
}

impl ThrottleConfig {
    /// Create a new configuration from a rate in milli-transactions-per-second
    pub fn new(milli_tps: u64) -> Self {
        Self {
            milli_tps,
            burst_period_secs: 1,
            name: None,
        }
    }

    /// Create a new configuration from a rate in whole transactions-per-second
    pub fn per_second(tps: u64) -> Self {
        // saturated rates always fail validation
        Self::new(tps.saturating_mul(MTPS_PER_TPS))
    }

    /// Builder-style: set rate in milli-transactions-per-second
    pub fn milli_tps(mut self, milli_tps: u64) -> Self {
        self.milli_tps = milli_tps;
        self
    }

    /// Builder-style: set burst period in whole seconds
    pub fn burst_period_secs(mut self, burst_period_secs: u64) -> Self {
        self.burst_period_secs = burst_period_secs;
        self
    }

    /// Builder-style: attach a diagnostic name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ThrottleError> {
        self.total_capacity_units().map(|_| ())
    }

    /// Total bucket capacity in fixed-point capacity units, or the
    /// configuration error that rules this rate/burst combination out.
    pub(crate) fn total_capacity_units(&self) -> Result<u64, ThrottleError> {
        if self.milli_tps == 0 {
            return Err(ThrottleError::ZeroRate);
        }
        let capacity = self
            .milli_tps
            .checked_mul(CAPACITY_UNITS_PER_SEC_PER_MTPS)
            .and_then(|per_sec| per_sec.checked_mul(self.burst_period_secs))
            .ok_or(ThrottleError::CapacityOverflow {
                rate: self.milli_tps,
                burst_period_secs: self.burst_period_secs,
            })?;
        if capacity < CAPACITY_UNITS_PER_TXN {
            return Err(ThrottleError::NeverPasses {
                rate: self.milli_tps,
                burst_period_secs: self.burst_period_secs,
            });
        }
        Ok(capacity)
    }
}

/// Configuration for the gas-denominated throttle.
///
/// Rate and capacity are raw gas figures; no fixed-point scaling applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasThrottleConfig {
    pub(crate) gas_per_sec: u64,
    pub(crate) burst_period_secs: u64,
    pub(crate) name: Option<String>,
}

impl GasThrottleConfig {
    /// Create a new configuration from a rate in gas-per-second
    pub fn new(gas_per_sec: u64) -> Self {
        Self {
            gas_per_sec,
            burst_period_secs: 1,
            name: None,
        }
    }

    /// Builder-style: set rate in gas-per-second
    pub fn gas_per_sec(mut self, gas_per_sec: u64) -> Self {
        self.gas_per_sec = gas_per_sec;
        self
    }

    /// Builder-style: set burst period in whole seconds
    pub fn burst_period_secs(mut self, burst_period_secs: u64) -> Self {
        self.burst_period_secs = burst_period_secs;
        self
    }

    /// Builder-style: attach a diagnostic name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ThrottleError> {
        self.total_capacity().map(|_| ())
    }

    /// Total bucket capacity in gas, or the configuration error that rules
    /// this rate/burst combination out.
    pub(crate) fn total_capacity(&self) -> Result<u64, ThrottleError> {
        if self.gas_per_sec == 0 {
            return Err(ThrottleError::ZeroRate);
        }
        let capacity = self
            .gas_per_sec
            .checked_mul(self.burst_period_secs)
            .ok_or(ThrottleError::CapacityOverflow {
                rate: self.gas_per_sec,
                burst_period_secs: self.burst_period_secs,
            })?;
        if capacity < 1 {
            return Err(ThrottleError::NeverPasses {
                rate: self.gas_per_sec,
                burst_period_secs: self.burst_period_secs,
            });
        }
        Ok(capacity)
    }
}
