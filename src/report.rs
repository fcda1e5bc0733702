//! Benchmark results and throughput arithmetic.

use serde::{Deserialize, Serialize};

const GIB: f64 = (1024u64 * 1024 * 1024) as f64;
const F32_BYTES: f64 = std::mem::size_of::<f32>() as f64;

/// Trimmed timing summary of one measured phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseTiming {
    /// Trimmed mean lap duration in seconds.
    pub avg_s: f64,
    /// Trimmed sample standard deviation in seconds.
    pub std_s: f64,
}

/// Everything a completed run reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Name of the device the run executed on.
    pub device: String,
    /// Elements per array.
    pub n: usize,
    /// Local work-group size used for the dispatch.
    pub work_group_size: usize,
    /// Timed laps per phase.
    pub laps: usize,
    /// Program build log, when the runtime produced one.
    pub build_log: Option<String>,
    /// Kernel dispatch timing.
    pub kernel: PhaseTiming,
    /// Achieved arithmetic throughput in GFLOPS (one add per element).
    pub gflops: f64,
    /// Device-memory traffic during the kernel in GiB/s: two arrays read,
    /// one written, 4 bytes per element.
    pub memory_bandwidth_gib_s: f64,
    /// Result readback timing.
    pub transfer: PhaseTiming,
    /// Device-to-host transfer rate in GiB/s.
    pub transfer_bandwidth_gib_s: f64,
    /// Whether the strict per-element verification passed. A report is only
    /// produced when it did; the field keeps the JSON self-describing.
    pub verified: bool,
}

/// GFLOPS for `n` additions taking `avg_s` seconds per lap.
pub fn gflops(n: usize, avg_s: f64) -> f64 {
    n as f64 / avg_s / 1e9
}

/// Device-memory bandwidth in GiB/s for the kernel phase: `3·n·4` bytes
/// (two reads, one write) per lap.
pub fn kernel_bandwidth_gib_s(n: usize, avg_s: f64) -> f64 {
    3.0 * n as f64 * F32_BYTES / avg_s / GIB
}

/// Device-to-host bandwidth in GiB/s for the readback phase: `n·4` bytes
/// per lap.
pub fn transfer_bandwidth_gib_s(n: usize, avg_s: f64) -> f64 {
    n as f64 * F32_BYTES / avg_s / GIB
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gflops() {
        // 1e9 adds in one second is exactly 1 GFLOPS.
        assert_eq!(gflops(1_000_000_000, 1.0), 1.0);
        assert_relative_eq!(gflops(100_000_000, 0.01), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kernel_bandwidth() {
        // n = 2^28 gives 3·n·4 = 3 GiB of traffic per lap.
        let n = 1usize << 28;
        assert_relative_eq!(kernel_bandwidth_gib_s(n, 1.0), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transfer_bandwidth() {
        let n = (1u64 << 30) as usize / 4;
        assert_relative_eq!(transfer_bandwidth_gib_s(n, 1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport {
            device: "Host reference device".to_string(),
            n: 1024,
            work_group_size: 128,
            laps: 20,
            build_log: None,
            kernel: PhaseTiming { avg_s: 0.5, std_s: 0.01 },
            gflops: gflops(1024, 0.5),
            memory_bandwidth_gib_s: kernel_bandwidth_gib_s(1024, 0.5),
            transfer: PhaseTiming { avg_s: 0.25, std_s: 0.0 },
            transfer_bandwidth_gib_s: transfer_bandwidth_gib_s(1024, 0.25),
            verified: true,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"verified\":true"));
        assert!(json.contains("\"n\":1024"));
    }
}
