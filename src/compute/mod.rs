//! Parallel compute kernels.
//!
//! Every kernel follows the same fork-join shape:
//!
//! ```text
//!  inputs (read-only)        fresh output buffer
//!  ┌──────────────────┐      ┌────┬────┬────┬──────┐
//!  │ x, y, validity   │ ───▶ │ w0 │ w1 │ w2 │  w3  │  one disjoint &mut slice
//!  └──────────────────┘      └────┴────┴────┴──────┘  per ChunkRange
//!                               │    │    │     │
//!                               └────┴─ join ───┘
//!                                       ▼
//!                            null count recomputed, vector returned
//! ```
//!
//! Operand checks run before any allocation, so a failing call never
//! exposes a partially written vector.

mod case;
mod chunk;
mod numeric;
mod string;

pub use case::{swap_case, to_lower, to_title, to_upper};
pub use chunk::{split_disjoint_mut, ChunkPlanner, ChunkRange};
pub use numeric::{
    add, add_literal, divide, divide_literal, multiply, multiply_literal, power_literal, subtract,
    subtract_literal,
};
pub use string::{add_prefix, add_suffix, concat};

use crate::config::ComputeConfig;
use crate::error::{KolumnError, Result};

/// Execution context threaded into every kernel call.
///
/// Owns a worker pool of exactly `num_workers` threads; a kernel call plans
/// one chunk per worker and returns only after all of them finish.
#[derive(Debug)]
pub struct ComputeContext {
    config: ComputeConfig,
    pool: rayon::ThreadPool,
}

impl ComputeContext {
    /// Creates a context from a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the pool cannot be built.
    pub fn new(config: ComputeConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_workers)
            .thread_name(|i| format!("kolumn-worker-{i}"))
            .build()
            .map_err(|e| KolumnError::ThreadPool(e.to_string()))?;
        Ok(Self { config, pool })
    }

    /// Creates a context using the process-wide default worker count.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn with_default_workers() -> Result<Self> {
        Self::new(ComputeConfig::default())
    }

    /// Creates a context running every kernel on one worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn sequential() -> Result<Self> {
        Self::new(ComputeConfig::sequential())
    }

    /// Returns the config this context was built from.
    #[must_use]
    pub fn config(&self) -> &ComputeConfig {
        &self.config
    }

    /// Returns the number of workers per kernel call.
    #[must_use]
    pub fn num_workers(&self) -> usize {
        self.config.num_workers
    }

    /// Plans `[0, n)` into one chunk per worker.
    #[must_use]
    pub fn plan(&self, n: usize) -> Vec<ChunkRange> {
        ChunkPlanner::new(self.num_workers()).plan(n)
    }

    /// Runs `op` inside this context's worker pool.
    pub(crate) fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }
}
