//! Write-back micro-benchmark.
//!
//! Measures the pairwise mutation routine under each write-back strategy and
//! produces a versioned report. For statistically rigorous numbers use the
//! Criterion suite in `fieldbench-bench`.
//!
//! ## Design Principles
//! - Single-threaded, no I/O inside the timed region
//! - Deterministic inputs: sequence and draws come from one seed
//! - Warmup window + measurement window + simple statistics

use crate::config::MeasureConfig;
use crate::error::Result;
use crate::mutation::Strategy;
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod harness;
pub mod stats;

pub use harness::{
    compare, measure, measure_strategy, speedup, verify_strategies, Comparison, Measurement,
    Verification,
};
pub use stats::compute_stats;

/// Bench report schema version. Bump when changing JSON structure.
pub const BENCH_SCHEMA_VERSION: u32 = 1;

/// Fewer measured iterations than this triggers `LOW_ITERS`.
pub const LOW_ITERS_THRESHOLD: u32 = 10;

/// Severity levels for bench warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
}

/// A benchmark warning with a stable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchWarning {
    /// Stable warning code (e.g., `LOW_ITERS`).
    pub code: String,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl BenchWarning {
    #[must_use]
    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warn(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warn,
            message: message.into(),
        }
    }
}

/// Warning codes for bench.
pub mod codes {
    pub const LOW_ITERS: &str = "LOW_ITERS";
    pub const NO_PAIRS: &str = "NO_PAIRS";
    pub const NON_FINITE: &str = "NON_FINITE";
    pub const VALUES_DRIFT: &str = "VALUES_DRIFT";
}

/// Runtime information for the benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRuntimeInfo {
    pub fieldbench_version: String,
    pub os: String,
    pub arch: String,
}

/// Benchmark parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchParams {
    pub elements: usize,
    #[serde(flatten)]
    pub config: MeasureConfig,
}

/// Statistics for a single measurement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BenchStats {
    pub mean_ns: u64,
    pub min_ns: u64,
    pub median_ns: u64,
    pub p95_ns: u64,
    pub max_ns: u64,
}

/// Result of measuring one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    /// Stable identifier (the strategy name, e.g. `single_field`).
    pub name: String,
    /// Label used in the human summary line.
    pub label: String,
    /// Unit of measurement.
    pub unit: String,
    /// Sequence length.
    pub elements: usize,
    /// Number of measured invocations.
    pub samples: u32,
    /// Number of discarded warmup invocations.
    pub warmup_samples: u32,
    /// Mean time in nanoseconds.
    pub mean_ns: u64,
    /// Minimum time in nanoseconds.
    pub min_ns: u64,
    /// Median time in nanoseconds.
    pub median_ns: u64,
    /// 95th percentile time in nanoseconds.
    pub p95_ns: u64,
    /// Maximum time in nanoseconds.
    pub max_ns: u64,
    /// Whether the final sequence held infinite or NaN values.
    pub non_finite: bool,
}

impl BenchResult {
    /// Create a result for `strategy` from a measurement.
    #[must_use]
    pub fn new(strategy: Strategy, measurement: &Measurement) -> Self {
        let stats = measurement.stats;
        Self {
            name: strategy.as_str().to_string(),
            label: strategy.label().to_string(),
            unit: "ns/op".to_string(),
            elements: measurement.elements,
            samples: measurement.iterations,
            warmup_samples: measurement.warmup_iterations,
            mean_ns: stats.mean_ns,
            min_ns: stats.min_ns,
            median_ns: stats.median_ns,
            p95_ns: stats.p95_ns,
            max_ns: stats.max_ns,
            non_finite: measurement.non_finite,
        }
    }

    /// Mean time in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_secs(&self) -> f64 {
        self.mean_ns as f64 / 1_000_000_000.0
    }

    /// `<label> updated <N> elements in <seconds> seconds.`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} updated {} elements in {:.6} seconds.",
            self.label,
            self.elements,
            self.mean_secs()
        )
    }
}

/// `A speedup of <ratio> times.`
#[must_use]
pub fn speedup_line(ratio: f64) -> String {
    format!("A speedup of {ratio:.3} times.")
}

/// Complete benchmark report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// Schema version for this report format.
    pub bench_schema_version: u32,
    /// Runtime information.
    pub runtime: BenchRuntimeInfo,
    /// Benchmark parameters.
    pub params: BenchParams,
    /// Benchmark results.
    pub results: Vec<BenchResult>,
    /// `mean(whole_element) / mean(single_field)` when both were measured and
    /// the single-field mean is non-zero.
    pub speedup: Option<f64>,
    /// Warnings encountered during benchmarking.
    pub warnings: Vec<BenchWarning>,
}

impl BenchReport {
    /// Create a new benchmark report.
    #[must_use]
    pub fn new(
        params: BenchParams,
        results: Vec<BenchResult>,
        speedup: Option<f64>,
        warnings: Vec<BenchWarning>,
    ) -> Self {
        Self {
            bench_schema_version: BENCH_SCHEMA_VERSION,
            runtime: BenchRuntimeInfo {
                fieldbench_version: crate::version::VERSION.to_string(),
                os: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
            },
            params,
            results,
            speedup,
            warnings,
        }
    }

    /// Human summary: one line per result, then the speedup line if any.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.results.iter().map(BenchResult::summary_line).collect();
        if let Some(ratio) = self.speedup {
            lines.push(speedup_line(ratio));
        }
        lines
    }
}

/// Measure both strategies and build a report.
pub fn run_compare_bench(elements: usize, config: &MeasureConfig) -> Result<BenchReport> {
    config.validate()?;
    info!(elements, "comparing write-back strategies");

    let comparison = compare(elements, config);
    let results = vec![
        BenchResult::new(Strategy::WholeElement, &comparison.whole),
        BenchResult::new(Strategy::SingleField, &comparison.single),
    ];
    let speedup = comparison.speedup();
    let warnings = collect_warnings(elements, config, &results);

    Ok(BenchReport::new(
        BenchParams {
            elements,
            config: config.clone(),
        },
        results,
        speedup,
        warnings,
    ))
}

/// Measure one strategy and build a report. The report carries no speedup.
pub fn run_strategy_bench(
    strategy: Strategy,
    elements: usize,
    config: &MeasureConfig,
) -> Result<BenchReport> {
    config.validate()?;
    info!(elements, %strategy, "measuring write-back strategy");

    let measurement = measure_strategy(strategy, elements, config);
    let results = vec![BenchResult::new(strategy, &measurement)];
    let warnings = collect_warnings(elements, config, &results);

    Ok(BenchReport::new(
        BenchParams {
            elements,
            config: config.clone(),
        },
        results,
        None,
        warnings,
    ))
}

fn collect_warnings(
    elements: usize,
    config: &MeasureConfig,
    results: &[BenchResult],
) -> Vec<BenchWarning> {
    let mut warnings = Vec::new();

    if elements < 2 {
        warnings.push(BenchWarning::warn(
            codes::NO_PAIRS,
            format!("{elements} element(s): no pairs exist, the routine does no pairwise work"),
        ));
    }

    for result in results {
        if result.samples < LOW_ITERS_THRESHOLD {
            warnings.push(BenchWarning::info(
                codes::LOW_ITERS,
                format!(
                    "{}: low iteration count ({}); results may have high variance",
                    result.name, result.samples
                ),
            ));
        }
        if result.non_finite {
            warnings.push(BenchWarning::warn(
                codes::NON_FINITE,
                format!(
                    "{}: sequence holds infinite or NaN values (identical g lanes divide by zero)",
                    result.name
                ),
            ));
        }
    }

    if !config.reset_each_iteration && elements >= 2 {
        warnings.push(BenchWarning::info(
            codes::VALUES_DRIFT,
            "sequence is not reset between iterations; values drift cumulatively",
        ));
    }

    warnings
}
