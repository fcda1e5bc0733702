//! Lap stopwatch with trimmed robust statistics.
//!
//! The timer starts measuring on construction. Each [`LapTimer::next_lap`]
//! finalizes the current lap, appends its wall-clock duration to an
//! append-only sequence, and immediately begins timing the next lap.
//! Reported statistics discard outlier laps: they are computed over the
//! subsequence between the 20th and 80th percentile of the sorted laps.

use std::time::Instant;

use crate::error::{Error, Result};
use crate::statistics::{mean, sample_std, trim_bounds};

/// Wall-clock lap stopwatch.
///
/// ```
/// use aplusb::measurement::LapTimer;
///
/// let mut t = LapTimer::start();
/// for _ in 0..20 {
///     // ... the operation being measured ...
///     t.next_lap();
/// }
/// println!("{} +- {} s", t.lap_avg().unwrap(), t.lap_std().unwrap());
/// ```
#[derive(Debug)]
pub struct LapTimer {
    /// Recorded lap durations in seconds, in recording order.
    laps: Vec<f64>,
    lap_start: Instant,
}

impl LapTimer {
    /// Start the stopwatch; the first lap begins now.
    pub fn start() -> Self {
        Self {
            laps: Vec::new(),
            lap_start: Instant::now(),
        }
    }

    /// Build a timer over pre-recorded lap durations (seconds).
    ///
    /// The next call to [`next_lap`](Self::next_lap) appends to the given
    /// sequence as if the laps had been recorded live.
    pub fn from_laps(laps: Vec<f64>) -> Self {
        Self {
            laps,
            lap_start: Instant::now(),
        }
    }

    /// Finalize the current lap and begin timing the next one.
    pub fn next_lap(&mut self) {
        let now = Instant::now();
        self.laps.push(now.duration_since(self.lap_start).as_secs_f64());
        self.lap_start = now;
    }

    /// All recorded laps, in recording order.
    pub fn laps(&self) -> &[f64] {
        &self.laps
    }

    /// Laps surviving the percentile trim.
    ///
    /// Sorts a copy of the recorded laps ascending and keeps the slice
    /// `[floor(0.2·n), floor(0.8·n))`. If that window would be empty (only
    /// possible with a single lap), the full unsorted sequence is returned
    /// instead; trimming never discards every sample.
    ///
    /// Fails with [`Error::NoSamplesRecorded`] when no lap has been
    /// recorded yet.
    pub fn laps_filtered(&self) -> Result<Vec<f64>> {
        if self.laps.is_empty() {
            return Err(Error::NoSamplesRecorded);
        }
        let mut sorted = self.laps.clone();
        sorted.sort_by(f64::total_cmp);
        let (lo, hi) = trim_bounds(sorted.len());
        if lo >= hi {
            return Ok(self.laps.clone());
        }
        Ok(sorted[lo..hi].to_vec())
    }

    /// Arithmetic mean over the trimmed laps, in seconds.
    pub fn lap_avg(&self) -> Result<f64> {
        Ok(mean(&self.laps_filtered()?))
    }

    /// Sample standard deviation over the trimmed laps, in seconds.
    pub fn lap_std(&self) -> Result<f64> {
        Ok(sample_std(&self.laps_filtered()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_laps_fails_fast() {
        let t = LapTimer::start();
        assert!(matches!(t.lap_avg(), Err(Error::NoSamplesRecorded)));
        assert!(matches!(t.lap_std(), Err(Error::NoSamplesRecorded)));
        assert!(matches!(t.laps_filtered(), Err(Error::NoSamplesRecorded)));
    }

    #[test]
    fn test_identical_laps() {
        let t = LapTimer::from_laps(vec![0.25; 20]);
        assert_eq!(t.lap_avg().unwrap(), 0.25);
        assert_eq!(t.lap_std().unwrap(), 0.0);
    }

    #[test]
    fn test_boundary_rule_one_to_twenty() {
        // Sorted laps 1..=20 trim to indices [4, 16), i.e. values 5..=16.
        // This pins the floor/exclusive-upper boundary rule exactly.
        let t = LapTimer::from_laps((1..=20).map(f64::from).collect());
        assert_eq!(t.lap_avg().unwrap(), 10.5);
        let expected_std = 13.0f64.sqrt(); // variance 143/11 over 5..=16
        assert!((t.lap_std().unwrap() - expected_std).abs() < 1e-12);
    }

    #[test]
    fn test_single_lap_falls_back_to_full_sequence() {
        let t = LapTimer::from_laps(vec![3.0]);
        assert_eq!(t.laps_filtered().unwrap(), vec![3.0]);
        assert_eq!(t.lap_avg().unwrap(), 3.0);
        assert_eq!(t.lap_std().unwrap(), 0.0);
    }

    #[test]
    fn test_trim_discards_extremes() {
        // One huge outlier among 20 laps must not survive the trim.
        let mut laps = vec![1.0; 19];
        laps.push(1_000.0);
        let t = LapTimer::from_laps(laps);
        assert_eq!(t.lap_avg().unwrap(), 1.0);
        assert_eq!(t.lap_std().unwrap(), 0.0);
    }

    #[test]
    fn test_filter_sorts_a_copy() {
        let t = LapTimer::from_laps(vec![5.0, 1.0, 3.0]);
        // Recording order is preserved in laps(); only the filtered view sorts.
        assert_eq!(t.laps(), &[5.0, 1.0, 3.0]);
        assert_eq!(t.laps_filtered().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_live_laps_are_recorded() {
        let mut t = LapTimer::start();
        for _ in 0..3 {
            std::hint::black_box((0..1000).sum::<u64>());
            t.next_lap();
        }
        assert_eq!(t.laps().len(), 3);
        assert!(t.laps().iter().all(|&lap| lap >= 0.0));
        assert!(t.lap_avg().unwrap() >= 0.0);
    }
}
