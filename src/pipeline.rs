//! The benchmark pipeline.
//!
//! One linear sequence: generate inputs, allocate device buffers, build the
//! kernel, dispatch it repeatedly under the lap timer, read the result back
//! repeatedly under a second timer, then verify every element against the
//! CPU with strict IEEE-754 equality.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::BenchConfig;
use crate::error::{Error, Result};
use crate::kernel::{load_kernel_source, KERNEL_NAME};
use crate::measurement::LapTimer;
use crate::report::{
    gflops, kernel_bandwidth_gib_s, transfer_bandwidth_gib_s, PhaseTiming, RunReport,
};
use crate::runtime::ComputeBackend;

/// Generate the two input arrays deterministically from `seed`.
///
/// A given seed always produces the same inputs, so runs are reproducible
/// across backends and machines.
pub fn generate_inputs(n: usize, seed: u64) -> (Vec<f32>, Vec<f32>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for _ in 0..n {
        a.push(rng.random::<f32>());
        b.push(rng.random::<f32>());
    }
    (a, b)
}

/// Smallest multiple of `multiple` that is >= `n`.
fn round_up(n: usize, multiple: usize) -> usize {
    n.div_ceil(multiple) * multiple
}

/// Verify `c[i] == a[i] + b[i]` for every element.
///
/// This is a functional-correctness oracle, not a tolerance comparison:
/// the device performed the same single-precision addition the CPU does, so
/// the results must match bit for bit. Any differing element is fatal.
pub fn verify(a: &[f32], b: &[f32], c: &[f32]) -> Result<()> {
    for (index, ((&x, &y), &z)) in a.iter().zip(b).zip(c).enumerate() {
        let expected = x + y;
        if z != expected {
            return Err(Error::Mismatch { index, expected, actual: z });
        }
    }
    Ok(())
}

/// Run the full lifecycle on `backend` and report throughput.
pub fn run(backend: &mut dyn ComputeBackend, config: &BenchConfig) -> Result<RunReport> {
    config.validate().map_err(Error::InvalidConfig)?;
    let n = config.n;

    let (a, b) = generate_inputs(n, config.resolved_seed());

    let a_buf = backend.create_buffer_with_data(&a)?;
    let b_buf = backend.create_buffer_with_data(&b)?;
    let c_buf = backend.create_buffer(n)?;

    let source = load_kernel_source(&config.kernel_path)?;
    backend.build_program(&source)?;
    let build_log = backend.build_log().map(str::to_owned);

    let kern = backend.create_kernel(KERNEL_NAME)?;
    backend.set_arg_buffer(kern, 0, a_buf)?;
    backend.set_arg_buffer(kern, 1, b_buf)?;
    backend.set_arg_buffer(kern, 2, c_buf)?;
    backend.set_arg_u64(kern, 3, n as u64)?;

    let global = round_up(n, config.work_group_size);

    // Each dispatch blocks on its completion event before the lap ends, so
    // a lap covers exactly one kernel execution.
    let mut timer = LapTimer::start();
    for _ in 0..config.laps {
        backend.dispatch(kern, global, config.work_group_size)?;
        timer.next_lap();
    }
    let kernel_timing = PhaseTiming {
        avg_s: timer.lap_avg()?,
        std_s: timer.lap_std()?,
    };

    let mut c = vec![0.0f32; n];
    let mut timer = LapTimer::start();
    for _ in 0..config.laps {
        backend.read_buffer(c_buf, &mut c)?;
        timer.next_lap();
    }
    let transfer_timing = PhaseTiming {
        avg_s: timer.lap_avg()?,
        std_s: timer.lap_std()?,
    };

    verify(&a, &b, &c)?;

    Ok(RunReport {
        device: backend.device_name().to_string(),
        n,
        work_group_size: config.work_group_size,
        laps: config.laps,
        build_log,
        kernel: kernel_timing,
        gflops: gflops(n, kernel_timing.avg_s),
        memory_bandwidth_gib_s: kernel_bandwidth_gib_s(n, kernel_timing.avg_s),
        transfer: transfer_timing,
        transfer_bandwidth_gib_s: transfer_bandwidth_gib_s(n, transfer_timing.avg_s),
        verified: true,
    })
}

/// Add two arrays through the backend's full dispatch path.
///
/// Buffers, program build, argument binding, one dispatch, one readback.
/// Exposed so the end-to-end numeric property can be exercised on arbitrary
/// inputs without the benchmarking loops around it.
pub fn execute_vector_add(
    backend: &mut dyn ComputeBackend,
    source: &str,
    a: &[f32],
    b: &[f32],
    work_group_size: usize,
) -> Result<Vec<f32>> {
    let n = a.len();
    let a_buf = backend.create_buffer_with_data(a)?;
    let b_buf = backend.create_buffer_with_data(b)?;
    let c_buf = backend.create_buffer(n)?;

    backend.build_program(source)?;
    let kern = backend.create_kernel(KERNEL_NAME)?;
    backend.set_arg_buffer(kern, 0, a_buf)?;
    backend.set_arg_buffer(kern, 1, b_buf)?;
    backend.set_arg_buffer(kern, 2, c_buf)?;
    backend.set_arg_u64(kern, 3, n as u64)?;

    backend.dispatch(kern, round_up(n, work_group_size), work_group_size)?;

    let mut c = vec![0.0f32; n];
    backend.read_buffer(c_buf, &mut c)?;
    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up() {
        // The default problem size happens to divide evenly.
        assert_eq!(round_up(100_000_000, 128), 100_000_000);
        assert_eq!(round_up(100_000_001, 128), 100_000_128);
        assert_eq!(round_up(128, 128), 128);
        assert_eq!(round_up(1, 128), 128);
    }

    #[test]
    fn test_generate_inputs_deterministic() {
        let (a1, b1) = generate_inputs(64, 7);
        let (a2, b2) = generate_inputs(64, 7);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        let (a3, _) = generate_inputs(64, 8);
        assert_ne!(a1, a3);
    }

    #[test]
    fn test_generate_inputs_in_unit_interval() {
        let (a, b) = generate_inputs(256, 1);
        assert!(a.iter().chain(&b).all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_verify_accepts_exact_sums() {
        let a = [0.1f32, 1.5, -2.0];
        let b = [0.7f32, 0.25, 2.0];
        let c: Vec<f32> = a.iter().zip(&b).map(|(&x, &y)| x + y).collect();
        assert!(verify(&a, &b, &c).is_ok());
    }

    #[test]
    fn test_verify_rejects_any_difference() {
        let a = [1.0f32, 2.0];
        let b = [1.0f32, 2.0];
        let mut c = vec![2.0f32, 4.0];
        c[1] = 4.0 + f32::EPSILON * 4.0;
        let err = verify(&a, &b, &c).unwrap_err();
        assert!(matches!(err, Error::Mismatch { index: 1, .. }));
    }
}
