use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default RNG seed for sequence generation and per-pair draws.
pub const DEFAULT_SEED: u64 = 42;

/// Default warmup window in milliseconds.
pub const DEFAULT_WARMUP_MS: u64 = 200;

/// Default measurement window in milliseconds.
pub const DEFAULT_MAX_TIME_MS: u64 = 2_000;

/// Default minimum number of measured iterations.
pub const DEFAULT_MIN_ITERS: u32 = 1;

/// Default cap on measured iterations.
pub const DEFAULT_MAX_ITERS: u32 = 10_000;

/// Measurement configuration for the harness.
///
/// Loadable from JSON; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Seed for the sequence and for the routine's draws.
    pub seed: u64,

    /// Warmup window in milliseconds. Invocations inside it are discarded.
    pub warmup_ms: u64,

    /// Measurement window in milliseconds.
    pub max_time_ms: u64,

    /// Measured invocations always run at least this many times.
    pub min_iters: u32,

    /// Measurement stops after this many invocations even inside the window.
    pub max_iters: u32,

    /// Restore the pristine sequence before every measured invocation.
    ///
    /// Off by default: values then drift cumulatively across invocations.
    pub reset_each_iteration: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            warmup_ms: DEFAULT_WARMUP_MS,
            max_time_ms: DEFAULT_MAX_TIME_MS,
            min_iters: DEFAULT_MIN_ITERS,
            max_iters: DEFAULT_MAX_ITERS,
            reset_each_iteration: false,
        }
    }
}

impl MeasureConfig {
    /// Load a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check iteration bounds.
    pub fn validate(&self) -> Result<()> {
        if self.min_iters == 0 {
            return Err(Error::invalid_config("min_iters must be at least 1"));
        }
        if self.max_iters < self.min_iters {
            return Err(Error::invalid_config(format!(
                "max_iters ({}) is below min_iters ({})",
                self.max_iters, self.min_iters
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    #[must_use]
    pub fn max_time(&self) -> Duration {
        Duration::from_millis(self.max_time_ms)
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the warmup window.
    #[must_use]
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup_ms = duration_to_millis(warmup);
        self
    }

    /// Set the measurement window.
    #[must_use]
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time_ms = duration_to_millis(max_time);
        self
    }

    #[must_use]
    pub fn with_min_iters(mut self, min_iters: u32) -> Self {
        self.min_iters = min_iters;
        self
    }

    #[must_use]
    pub fn with_max_iters(mut self, max_iters: u32) -> Self {
        self.max_iters = max_iters;
        self
    }

    #[must_use]
    pub fn with_reset_each_iteration(mut self, reset: bool) -> Self {
        self.reset_each_iteration = reset;
        self
    }
}

// Saturates instead of truncating; windows beyond u64 ms are not meaningful.
fn duration_to_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
