//! # Cell configuration.
//!
//! Provides [`CellConfig`], the construction-time settings for a
//! [`Cell`](crate::Cell).
//!
//! ## Sentinel values
//! - `pool_size = 0` → sharding disabled: handlers run inline on the default
//!   queue's worker, no pool queues are created.
//! - `pool_size = n > 0` → `n` pool queues, one dedicated worker each. `n`
//!   must be odd; even nonzero sizes are rejected by [`CellConfig::validate`].

use crate::error::ConfigError;

/// Construction-time configuration for a [`Cell`](crate::Cell).
///
/// ## Field semantics
/// - `pool_size`: number of sharded queues (`0` = sharding disabled). When
///   nonzero it must be odd — a compatibility constraint on the configuration
///   surface, checked at construction.
/// - `capture_panic`: whether queue workers catch panics raised inside
///   handler tasks. With capture on, a panicking handler is reported and the
///   worker keeps processing subsequent tasks; with capture off, the panic
///   kills that queue's worker.
#[derive(Clone, Debug)]
pub struct CellConfig {
    /// Number of sharded queues. `0` disables sharding; nonzero must be odd.
    pub pool_size: usize,

    /// Catch panics inside handler tasks instead of letting them kill the
    /// owning queue's worker.
    pub capture_panic: bool,
}

impl CellConfig {
    /// Creates a configuration with the given pool size and panic capture on.
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            ..Self::default()
        }
    }

    /// Checks the pool-size constraint.
    ///
    /// Negative sizes are unrepresentable (`usize`); the only rejected value
    /// class is even nonzero.
    ///
    /// # Example
    /// ```
    /// use eventcell::CellConfig;
    ///
    /// assert!(CellConfig::new(0).validate().is_ok());
    /// assert!(CellConfig::new(3).validate().is_ok());
    /// assert!(CellConfig::new(4).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size > 0 && self.pool_size % 2 == 0 {
            return Err(ConfigError::EvenPoolSize {
                size: self.pool_size,
            });
        }
        Ok(())
    }

    /// True if sharding is enabled (`pool_size > 0`).
    #[inline]
    pub fn is_sharded(&self) -> bool {
        self.pool_size > 0
    }
}

impl Default for CellConfig {
    /// Default configuration:
    ///
    /// - `pool_size = 0` (sharding disabled)
    /// - `capture_panic = true`
    fn default() -> Self {
        Self {
            pool_size: 0,
            capture_panic: true,
        }
    }
}
