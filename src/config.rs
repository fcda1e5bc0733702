//! Configuration for a benchmark run.

use std::path::PathBuf;

/// Configuration options for a vector-addition benchmark run.
///
/// Defaults reproduce the classic exercise: 100 million elements, work
/// groups of 128, 20 timed laps per phase.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of `f32` elements per array.
    ///
    /// Default: 100,000,000.
    pub n: usize,

    /// 1-D local work-group size. The global size is `n` rounded up to the
    /// next multiple of this.
    ///
    /// Default: 128.
    pub work_group_size: usize,

    /// Timed laps per measured phase (kernel dispatch, result readback).
    ///
    /// Default: 20.
    pub laps: usize,

    /// Deterministic seed for input generation.
    ///
    /// When `None`, the seed is `n as u64`, so a given problem size always
    /// gets the same inputs.
    pub seed: Option<u64>,

    /// Path to the kernel source file, read at startup.
    ///
    /// Default: `kernels/aplusb.cl`, relative to the working directory.
    pub kernel_path: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            n: 100_000_000,
            work_group_size: 128,
            laps: 20,
            seed: None,
            kernel_path: PathBuf::from("kernels/aplusb.cl"),
        }
    }
}

impl BenchConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a small configuration for smoke runs and development.
    ///
    /// Uses 1 Mi elements and 10 laps so a full run finishes in well under
    /// a second on the host backend.
    pub fn quick() -> Self {
        Self {
            n: 1 << 20,
            laps: 10,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the element count.
    pub fn n(mut self, n: usize) -> Self {
        assert!(n > 0, "n must be positive");
        self.n = n;
        self
    }

    /// Set the local work-group size.
    pub fn work_group_size(mut self, size: usize) -> Self {
        assert!(size > 0, "work_group_size must be positive");
        self.work_group_size = size;
        self
    }

    /// Set the number of timed laps per phase.
    pub fn laps(mut self, laps: usize) -> Self {
        assert!(laps > 0, "laps must be positive");
        self.laps = laps;
        self
    }

    /// Set a deterministic input seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the kernel source path.
    pub fn kernel_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.kernel_path = path.into();
        self
    }

    /// Resolve the effective input seed.
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or(self.n as u64)
    }

    /// Check the configuration for internal consistency.
    ///
    /// Returns an error message if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.n == 0 {
            return Err("n must be positive".to_string());
        }
        if self.work_group_size == 0 {
            return Err("work_group_size must be positive".to_string());
        }
        if self.laps == 0 {
            return Err("laps must be positive".to_string());
        }
        Ok(())
    }
}
