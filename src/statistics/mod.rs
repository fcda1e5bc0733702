//! Statistical helpers for lap aggregation.
//!
//! This module provides the small amount of arithmetic behind the trimmed
//! lap statistics: mean, sample standard deviation, and the percentile
//! window bounds used to discard outlier laps.

/// Arithmetic mean. Returns 0 for an empty slice; callers guard emptiness
/// at the [`crate::measurement::LapTimer`] level.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation (n − 1 denominator).
///
/// Returns 0 for fewer than two samples, where the estimator is undefined.
pub fn sample_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - 1) as f64;
    var.sqrt()
}

/// Index bounds `[lo, hi)` of the 20th–80th percentile window over a sorted
/// sequence of `count` samples.
///
/// Boundary rule: `lo = floor(0.2·count)`, `hi = floor(0.8·count)`, upper
/// bound exclusive. For `count = 20` this is `[4, 16)`. The window is empty
/// only at `count <= 1`.
pub fn trim_bounds(count: usize) -> (usize, usize) {
    let lo = (0.2 * count as f64).floor() as usize;
    let hi = (0.8 * count as f64).floor() as usize;
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sample_std_identical_values() {
        assert_eq!(sample_std(&[4.0; 10]), 0.0);
    }

    #[test]
    fn test_sample_std_known_value() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] with n-1 denominator is 32/7.
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sample_std(&xs), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_sample_std_degenerate() {
        assert_eq!(sample_std(&[]), 0.0);
        assert_eq!(sample_std(&[3.0]), 0.0);
    }

    #[test]
    fn test_trim_bounds_at_twenty() {
        // The documented boundary rule: count=20 trims to indices [4, 16).
        assert_eq!(trim_bounds(20), (4, 16));
    }

    #[test]
    fn test_trim_bounds_small_counts() {
        assert_eq!(trim_bounds(0), (0, 0));
        assert_eq!(trim_bounds(1), (0, 0));
        assert_eq!(trim_bounds(2), (0, 1));
        assert_eq!(trim_bounds(3), (0, 2));
        assert_eq!(trim_bounds(4), (0, 3));
        assert_eq!(trim_bounds(5), (1, 4));
    }

    #[test]
    fn test_trim_bounds_never_empty_above_one() {
        for count in 2..200 {
            let (lo, hi) = trim_bounds(count);
            assert!(lo < hi, "empty window at count={count}");
            assert!(hi <= count);
        }
    }
}
