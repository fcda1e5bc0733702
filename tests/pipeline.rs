//! End-to-end pipeline runs on the host reference backend.

use proptest::prelude::*;

use aplusb::pipeline;
use aplusb::runtime::{BackendSpec, ComputeBackend, HostBackend};
use aplusb::{BenchConfig, Error};

const KERNEL_SOURCE: &str = include_str!("../kernels/aplusb.cl");

#[test]
fn quick_run_reports_verified_throughput() {
    let config = BenchConfig::quick().kernel_path("kernels/aplusb.cl");
    let mut backend = BackendSpec::Host.resolve().unwrap();

    let report = pipeline::run(backend.as_mut(), &config).unwrap();

    assert!(report.verified);
    assert_eq!(report.n, 1 << 20);
    assert_eq!(report.laps, 10);
    assert_eq!(report.device, HostBackend::new().device_name());
    assert!(report.gflops > 0.0);
    assert!(report.memory_bandwidth_gib_s > 0.0);
    assert!(report.transfer_bandwidth_gib_s > 0.0);
    assert!(report.kernel.avg_s > 0.0);
    assert!(report.transfer.avg_s > 0.0);
}

#[test]
fn same_seed_reproduces_the_same_report_inputs() {
    let config = BenchConfig::quick()
        .n(4096)
        .seed(99)
        .kernel_path("kernels/aplusb.cl");

    let mut backend = HostBackend::new();
    let first = pipeline::run(&mut backend, &config).unwrap();
    let mut backend = HostBackend::new();
    let second = pipeline::run(&mut backend, &config).unwrap();

    assert_eq!(first.n, second.n);
    assert!(first.verified && second.verified);
}

#[test]
fn missing_kernel_file_is_fatal() {
    let config = BenchConfig::quick()
        .n(16)
        .kernel_path("kernels/does-not-exist.cl");
    let mut backend = HostBackend::new();

    let err = pipeline::run(&mut backend, &config).unwrap_err();
    assert!(matches!(err, Error::KernelSource { .. }));
}

#[test]
fn empty_kernel_file_is_fatal() {
    let file = tempfile::NamedTempFile::new().unwrap();

    let config = BenchConfig::quick().n(16).kernel_path(file.path());
    let mut backend = HostBackend::new();

    let err = pipeline::run(&mut backend, &config).unwrap_err();
    assert!(matches!(err, Error::EmptyKernelSource { .. }));
}

#[test]
fn padded_global_size_leaves_tail_untouched() {
    // n = 100 with work groups of 64 dispatches 128 work items; the guard in
    // the kernel must keep the extra 28 from writing anywhere.
    let (a, b) = pipeline::generate_inputs(100, 100);
    let mut backend = HostBackend::new();

    let c = pipeline::execute_vector_add(&mut backend, KERNEL_SOURCE, &a, &b, 64).unwrap();

    assert_eq!(c.len(), 100);
    pipeline::verify(&a, &b, &c).unwrap();
}

// ============================================================================
// Numeric property: c[i] is bitwise equal to a[i] + b[i]
// ============================================================================

/// Finite values only: a finite pair can never sum to NaN, so bitwise
/// comparison against the host-computed sum is well defined.
fn finite_f32() -> impl Strategy<Value = f32> {
    use proptest::num::f32::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
}

proptest! {
    #[test]
    fn vector_add_matches_scalar_addition_exactly(
        pairs in prop::collection::vec((finite_f32(), finite_f32()), 1..200),
        work_group_size in prop_oneof![Just(1usize), Just(2), Just(32), Just(64), Just(128)],
    ) {
        let (a, b): (Vec<f32>, Vec<f32>) = pairs.into_iter().unzip();
        let mut backend = HostBackend::new();

        let c = pipeline::execute_vector_add(
            &mut backend,
            KERNEL_SOURCE,
            &a,
            &b,
            work_group_size,
        ).unwrap();

        prop_assert_eq!(c.len(), a.len());
        for i in 0..a.len() {
            let expected = a[i] + b[i];
            prop_assert_eq!(
                c[i].to_bits(),
                expected.to_bits(),
                "element {} differs: {} vs {}", i, c[i], expected
            );
        }
    }
}
