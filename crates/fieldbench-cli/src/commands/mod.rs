pub mod compare;
pub mod report;
pub mod run;
pub mod verify;
pub mod version;

use fieldbench_core::MeasureConfig;
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use std::time::Duration;

/// Default sequence length.
pub const DEFAULT_ELEMENTS: usize = 512;

/// Measurement flags shared by `compare` and `run`.
///
/// Unset flags fall back to the config file, then to the built-in defaults.
#[derive(clap::Args, Debug, Clone)]
pub struct MeasureArgs {
    /// Number of records in the sequence
    #[arg(long, short = 'n', default_value_t = DEFAULT_ELEMENTS)]
    pub elements: usize,

    /// RNG seed for the sequence and the per-pair draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Warmup window in milliseconds (invocations discarded)
    #[arg(long, value_name = "MS")]
    pub warmup_ms: Option<u64>,

    /// Measurement window in milliseconds
    #[arg(long, value_name = "MS")]
    pub max_ms: Option<u64>,

    /// Minimum number of measured invocations
    #[arg(long)]
    pub min_iters: Option<u32>,

    /// Maximum number of measured invocations
    #[arg(long)]
    pub max_iters: Option<u32>,

    /// Restore the initial sequence before every measured invocation
    #[arg(long)]
    pub reset: bool,
}

impl Default for MeasureArgs {
    fn default() -> Self {
        Self {
            elements: DEFAULT_ELEMENTS,
            seed: None,
            warmup_ms: None,
            max_ms: None,
            min_iters: None,
            max_iters: None,
            reset: false,
        }
    }
}

/// Build the measurement config: file (if any), then flag overrides.
pub fn load_config(path: Option<&Path>, args: &MeasureArgs) -> Result<MeasureConfig> {
    let mut config = match path {
        Some(path) => MeasureConfig::from_json_file(path).into_diagnostic()?,
        None => MeasureConfig::default(),
    };

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(ms) = args.warmup_ms {
        config = config.with_warmup(Duration::from_millis(ms));
    }
    if let Some(ms) = args.max_ms {
        config = config.with_max_time(Duration::from_millis(ms));
    }
    if let Some(n) = args.min_iters {
        config = config.with_min_iters(n);
    }
    if let Some(n) = args.max_iters {
        config = config.with_max_iters(n);
    }
    if args.reset {
        config = config.with_reset_each_iteration(true);
    }

    config.validate().into_diagnostic()?;
    Ok(config)
}
