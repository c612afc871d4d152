//! Measurement loop.
//!
//! [`measure`] owns one sequence for the duration of the call, runs a warmup
//! window whose invocations are discarded, then times each invocation until
//! the measurement window closes. All timing state lives in the returned
//! [`Measurement`].
//!
//! Unless `reset_each_iteration` is set, every invocation mutates the values
//! left by the previous one, so field values drift over a run. That drift is a
//! known source of run-to-run variance.

use super::stats::compute_stats;
use super::BenchStats;
use crate::config::MeasureConfig;
use crate::mutation::Strategy;
use crate::record::{build_sequence, Record};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Result of one [`measure`] call.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Sequence length.
    pub elements: usize,
    /// Measured invocations.
    pub iterations: u32,
    /// Discarded warmup invocations.
    pub warmup_iterations: u32,
    /// Sum of measured invocation times.
    pub total: Duration,
    /// Mean per-invocation time.
    pub mean: Duration,
    /// Per-invocation sample statistics.
    pub stats: BenchStats,
    /// Whether any field of the final sequence is infinite or NaN.
    pub non_finite: bool,
}

impl Measurement {
    /// True when the two means differ by at most a factor of `1 + tolerance`.
    ///
    /// Two zero means are consistent; a zero and a non-zero mean are not.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_consistent_with(&self, other: &Measurement, tolerance: f64) -> bool {
        let a = self.mean.as_nanos() as f64;
        let b = other.mean.as_nanos() as f64;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        if hi == 0.0 {
            return true;
        }
        if lo == 0.0 {
            return false;
        }
        hi / lo <= 1.0 + tolerance
    }
}

/// Measure `routine` over a freshly generated sequence of `element_count`
/// records.
///
/// The sequence and the routine's RNG are both derived from `config.seed`, so
/// two calls with equal configs start from the same values and see the same
/// draws. `min_iters` below 1 is treated as 1 and `max_iters` below
/// `min_iters` as `min_iters`.
pub fn measure<F>(mut routine: F, element_count: usize, config: &MeasureConfig) -> Measurement
where
    F: FnMut(&mut [Record], &mut ChaCha8Rng),
{
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut seq = build_sequence(element_count, &mut rng);
    let pristine = if config.reset_each_iteration {
        Some(seq.clone())
    } else {
        None
    };

    debug!(
        elements = element_count,
        seed = config.seed,
        warmup_ms = config.warmup_ms,
        max_time_ms = config.max_time_ms,
        "starting measurement"
    );

    let warmup = config.warmup();
    let mut warmup_iterations: u32 = 0;
    if !warmup.is_zero() {
        let start = Instant::now();
        loop {
            routine(black_box(seq.as_mut_slice()), &mut rng);
            warmup_iterations += 1;
            if start.elapsed() >= warmup {
                break;
            }
        }
    }
    trace!(warmup_iterations, "warmup done");

    let min_iters = config.min_iters.max(1) as usize;
    let max_iters = (config.max_iters as usize).max(min_iters);
    let max_time = config.max_time();

    let mut samples: Vec<u64> = Vec::with_capacity(min_iters);
    let window = Instant::now();
    while samples.len() < min_iters
        || (samples.len() < max_iters && window.elapsed() < max_time)
    {
        if let Some(pristine) = &pristine {
            seq.copy_from_slice(pristine);
        }
        let start = Instant::now();
        routine(black_box(seq.as_mut_slice()), &mut rng);
        samples.push(duration_to_nanos(start.elapsed()));
    }
    black_box(&seq);

    let stats = compute_stats(&samples);
    let total_ns: u64 = samples.iter().fold(0u64, |acc, &s| acc.saturating_add(s));
    let non_finite = seq.iter().any(|r| !r.is_finite());
    let iterations = u32::try_from(samples.len()).unwrap_or(u32::MAX);

    debug!(
        elements = element_count,
        iterations,
        mean_ns = stats.mean_ns,
        non_finite,
        "measurement done"
    );

    Measurement {
        elements: element_count,
        iterations,
        warmup_iterations,
        total: Duration::from_nanos(total_ns),
        mean: Duration::from_nanos(stats.mean_ns),
        stats,
        non_finite,
    }
}

/// Measure the mutation routine with one write-back strategy.
pub fn measure_strategy(
    strategy: Strategy,
    element_count: usize,
    config: &MeasureConfig,
) -> Measurement {
    measure(
        |seq, rng| strategy.apply(seq, rng),
        element_count,
        config,
    )
}

/// Both strategies measured under the same config.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub whole: Measurement,
    pub single: Measurement,
}

impl Comparison {
    /// `mean(whole) / mean(single)`; `None` when the single-field mean is zero.
    #[must_use]
    pub fn speedup(&self) -> Option<f64> {
        speedup(self.whole.mean, self.single.mean)
    }
}

/// Measure whole-element write-back, then single-field write-back.
pub fn compare(element_count: usize, config: &MeasureConfig) -> Comparison {
    let whole = measure_strategy(Strategy::WholeElement, element_count, config);
    let single = measure_strategy(Strategy::SingleField, element_count, config);
    Comparison { whole, single }
}

/// Ratio of two durations; `None` when `single` is zero.
#[must_use]
pub fn speedup(whole: Duration, single: Duration) -> Option<f64> {
    if single.is_zero() {
        return None;
    }
    Some(whole.as_secs_f64() / single.as_secs_f64())
}

/// Outcome of running both strategies once on equal inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub elements: usize,
    /// Index of the first record that differs, if any.
    pub first_mismatch: Option<usize>,
    /// Whether the final sequence holds non-finite values.
    pub non_finite: bool,
}

impl Verification {
    #[must_use]
    pub fn identical(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Run each strategy once on clones of the same seeded sequence, with
/// identically seeded RNGs, and compare the results field for field.
///
/// Comparison is bitwise so NaN lanes produced by the unguarded division
/// compare equal to themselves.
#[must_use]
pub fn verify_strategies(element_count: usize, seed: u64) -> Verification {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let initial = build_sequence(element_count, &mut rng);

    let mut whole = initial.clone();
    Strategy::WholeElement.apply(&mut whole, &mut rng.clone());

    let mut single = initial;
    Strategy::SingleField.apply(&mut single, &mut rng);

    let first_mismatch = whole
        .iter()
        .zip(&single)
        .position(|(w, s)| !bitwise_eq(w, s));
    let non_finite = whole.iter().any(|r| !r.is_finite());

    Verification {
        elements: element_count,
        first_mismatch,
        non_finite,
    }
}

fn bitwise_eq(lhs: &Record, rhs: &Record) -> bool {
    lhs.fields()
        .iter()
        .zip(rhs.fields().iter())
        .all(|(l, r)| {
            l.as_array()
                .iter()
                .zip(r.as_array())
                .all(|(x, y)| x.to_bits() == y.to_bits())
        })
}

/// Convert Duration to nanoseconds as u64, saturating.
fn duration_to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Lanes;

    fn quick_config() -> MeasureConfig {
        MeasureConfig::default()
            .with_warmup(Duration::from_millis(5))
            .with_max_time(Duration::from_millis(30))
            .with_min_iters(3)
            .with_max_iters(50)
    }

    #[test]
    fn test_measure_zero_elements() {
        let mut calls = 0u32;
        let mut seen_len = usize::MAX;
        let m = measure(
            |seq, _rng| {
                calls += 1;
                seen_len = seq.len();
            },
            0,
            &quick_config(),
        );

        assert_eq!(m.elements, 0);
        assert_eq!(seen_len, 0);
        assert!(m.iterations >= 3);
        assert_eq!(calls, m.iterations + m.warmup_iterations);
        assert!(m.mean < Duration::from_millis(1), "mean was {:?}", m.mean);
        assert!(!m.non_finite);
    }

    #[test]
    fn test_measure_strategy_zero_elements_near_zero() {
        let m = measure_strategy(Strategy::SingleField, 0, &quick_config());
        assert!(m.mean < Duration::from_millis(1));
    }

    #[test]
    fn test_measure_respects_min_iters_with_zero_window() {
        let config = MeasureConfig::default()
            .with_warmup(Duration::ZERO)
            .with_max_time(Duration::ZERO)
            .with_min_iters(7)
            .with_max_iters(7);

        let m = measure_strategy(Strategy::WholeElement, 4, &config);
        assert_eq!(m.iterations, 7);
        assert_eq!(m.warmup_iterations, 0);
        assert_eq!(m.stats.mean_ns, m.mean.as_nanos() as u64);
    }

    #[test]
    fn test_measure_caps_at_max_iters() {
        let config = MeasureConfig::default()
            .with_warmup(Duration::ZERO)
            .with_max_time(Duration::from_secs(60))
            .with_min_iters(1)
            .with_max_iters(5);

        let m = measure_strategy(Strategy::SingleField, 2, &config);
        assert_eq!(m.iterations, 5);
    }

    #[test]
    fn test_measure_zero_min_iters_runs_once() {
        let config = MeasureConfig::default()
            .with_warmup(Duration::ZERO)
            .with_max_time(Duration::ZERO)
            .with_min_iters(0)
            .with_max_iters(0);

        let m = measure_strategy(Strategy::SingleField, 2, &config);
        assert_eq!(m.iterations, 1);
    }

    #[test]
    fn test_measure_stats_ordering() {
        let m = measure_strategy(Strategy::WholeElement, 32, &quick_config());

        assert!(m.stats.min_ns <= m.stats.median_ns);
        assert!(m.stats.median_ns <= m.stats.p95_ns);
        assert!(m.stats.p95_ns <= m.stats.max_ns);
        assert!(m.stats.min_ns <= m.stats.mean_ns && m.stats.mean_ns <= m.stats.max_ns);
        assert!(m.total >= m.mean);
    }

    #[test]
    fn test_reset_each_iteration_sees_pristine_sequence() {
        let config = quick_config().with_reset_each_iteration(true);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let pristine = build_sequence(3, &mut rng);

        let mut measured_starts = Vec::new();
        measure(
            |seq, _rng| {
                measured_starts.push(seq.to_vec());
                seq[0].a += Lanes::splat(1.0);
            },
            3,
            &config.with_warmup(Duration::ZERO),
        );

        assert!(!measured_starts.is_empty());
        for start in &measured_starts {
            assert_eq!(start, &pristine);
        }
    }

    #[test]
    fn test_values_drift_without_reset() {
        let config = quick_config().with_warmup(Duration::ZERO);
        let mut starts = Vec::new();
        measure(
            |seq, _rng| {
                starts.push(seq[0].a);
                seq[0].a += Lanes::splat(1.0);
            },
            1,
            &config,
        );

        assert!(starts.len() >= 3);
        assert_ne!(starts[0], starts[1]);
    }

    #[test]
    fn test_compare_512_reports_both() {
        let config = MeasureConfig::default()
            .with_warmup(Duration::ZERO)
            .with_max_time(Duration::ZERO)
            .with_min_iters(1)
            .with_max_iters(1);

        let cmp = compare(512, &config);
        assert_eq!(cmp.whole.elements, 512);
        assert_eq!(cmp.single.elements, 512);
        assert!(cmp.whole.mean >= Duration::ZERO);
        assert!(cmp.single.mean > Duration::ZERO);

        let ratio = cmp.speedup().expect("single-field mean is non-zero");
        assert!(ratio.is_finite() && ratio > 0.0);
    }

    #[test]
    fn test_speedup() {
        let ratio = speedup(Duration::from_millis(30), Duration::from_millis(10)).unwrap();
        assert!((ratio - 3.0).abs() < 1e-12);
        assert_eq!(speedup(Duration::from_millis(30), Duration::ZERO), None);
    }

    #[test]
    fn test_verify_strategies_identical() {
        for n in [0, 1, 2, 17, 512] {
            let v = verify_strategies(n, 1234);
            assert!(v.identical(), "n = {n} mismatched at {:?}", v.first_mismatch);
            assert_eq!(v.elements, n);
        }
    }

    #[test]
    fn test_repeat_measurements_within_band() {
        let config = quick_config();
        let first = measure_strategy(Strategy::SingleField, 64, &config);
        let second = measure_strategy(Strategy::SingleField, 64, &config);

        // Generous band: this guards the timing code, not the machine.
        assert!(
            first.is_consistent_with(&second, 9.0),
            "{:?} vs {:?}",
            first.mean,
            second.mean
        );
    }

    fn with_mean(ns: u64) -> Measurement {
        let stats = compute_stats(&[ns]);
        Measurement {
            elements: 1,
            iterations: 1,
            warmup_iterations: 0,
            total: Duration::from_nanos(ns),
            mean: Duration::from_nanos(ns),
            stats,
            non_finite: false,
        }
    }

    #[test]
    fn test_is_consistent_with() {
        assert!(with_mean(100).is_consistent_with(&with_mean(150), 0.5));
        assert!(!with_mean(100).is_consistent_with(&with_mean(151), 0.5));
        assert!(with_mean(150).is_consistent_with(&with_mean(100), 0.5));
        assert!(with_mean(0).is_consistent_with(&with_mean(0), 0.0));
        assert!(!with_mean(0).is_consistent_with(&with_mean(10), 100.0));
    }
}
