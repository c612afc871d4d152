//! Statistics over per-invocation samples.

use super::BenchStats;

/// Compute statistics from a collection of duration samples (in nanoseconds).
///
/// The samples are sorted internally. Returns mean, min, median (p50), p95,
/// and max.
///
/// # Panics
/// Panics if `samples` is empty.
#[must_use]
pub fn compute_stats(samples: &[u64]) -> BenchStats {
    assert!(!samples.is_empty(), "samples must not be empty");

    let mut sorted: Vec<u64> = samples.to_vec();
    sorted.sort_unstable();

    let len = sorted.len();
    let min_ns = sorted[0];
    let max_ns = sorted[len - 1];

    let mean_ns = compute_mean(&sorted);

    // Median (50th percentile)
    let median_ns = percentile(&sorted, 50);

    // 95th percentile
    let p95_ns = percentile(&sorted, 95);

    BenchStats {
        mean_ns,
        min_ns,
        median_ns,
        p95_ns,
        max_ns,
    }
}

/// Integer mean of the samples, accumulated in `u128` so long runs of
/// large samples cannot overflow.
///
/// # Panics
/// Panics if `samples` is empty.
#[must_use]
pub fn compute_mean(samples: &[u64]) -> u64 {
    assert!(!samples.is_empty(), "samples must not be empty");

    let total: u128 = samples.iter().map(|&s| u128::from(s)).sum();
    let mean = total / samples.len() as u128;
    u64::try_from(mean).unwrap_or(u64::MAX)
}

/// Compute the nth percentile from a sorted slice.
///
/// Uses the "nearest rank" method.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
fn percentile(sorted: &[u64], p: u32) -> u64 {
    assert!(!sorted.is_empty());
    assert!(p <= 100);

    if p == 0 {
        return sorted[0];
    }
    if p == 100 {
        return sorted[sorted.len() - 1];
    }

    // Nearest rank method: ceil((p/100) * n)
    let n = sorted.len();
    let rank = ((f64::from(p) / 100.0) * n as f64).ceil() as usize;
    let index = rank.saturating_sub(1).min(n - 1);

    sorted[index]
}
