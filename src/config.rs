//! Compute configuration.
//!
//! The worker count is an explicit value carried by [`ComputeConfig`] into
//! every kernel call. A process-wide default seeds `ComputeConfig::default()`
//! and can be changed by the host application before contexts are built.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{KolumnError, Result};

/// Environment variable overriding the worker count in [`ComputeConfig::from_env`].
pub const NUM_WORKERS_ENV: &str = "KOLUMN_NUM_WORKERS";

/// Process-wide default worker count. Zero means "use hardware parallelism".
static DEFAULT_NUM_WORKERS: AtomicUsize = AtomicUsize::new(0);

/// Returns the process-wide default worker count.
///
/// Falls back to [`std::thread::available_parallelism`] until
/// [`set_default_num_workers`] is called.
#[must_use]
pub fn default_num_workers() -> usize {
    match DEFAULT_NUM_WORKERS.load(Ordering::Relaxed) {
        0 => std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1),
        n => n,
    }
}

/// Sets the process-wide default worker count.
///
/// Contexts that were already built keep their own pool size.
///
/// # Errors
///
/// Returns [`KolumnError::ValidationError`] if `num_workers` is zero.
pub fn set_default_num_workers(num_workers: usize) -> Result<()> {
    if num_workers == 0 {
        return Err(KolumnError::ValidationError(
            "num_workers must be at least 1".to_string(),
        ));
    }
    DEFAULT_NUM_WORKERS.store(num_workers, Ordering::Relaxed);
    Ok(())
}

/// Configuration for kernel execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeConfig {
    /// Number of workers each kernel call fans out to (default: process-wide default).
    pub num_workers: usize,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            num_workers: default_num_workers(),
        }
    }
}

impl ComputeConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of workers.
    #[must_use]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Creates a config that runs every kernel on a single worker.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default().with_num_workers(1)
    }

    /// Creates a config from the default, applying `KOLUMN_NUM_WORKERS` if set.
    ///
    /// Unparseable or zero values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(NUM_WORKERS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.num_workers = n,
                _ => warn!(value = %raw, "ignoring invalid {}", NUM_WORKERS_ENV),
            }
        }
        config
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_workers` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(KolumnError::ValidationError(
                "num_workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ComputeConfig::default();
        assert!(config.num_workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ComputeConfig::new().with_num_workers(6);
        assert_eq!(config.num_workers, 6);
        assert_eq!(ComputeConfig::sequential().num_workers, 1);
    }

    #[test]
    fn test_config_validation() {
        let config = ComputeConfig::new().with_num_workers(0);
        assert!(matches!(config.validate(), Err(KolumnError::ValidationError(_))));
    }

    #[test]
    fn test_set_default_rejects_zero() {
        assert!(set_default_num_workers(0).is_err());
    }
}
