//! # aplusb
//!
//! A teaching exercise for the minimal lifecycle of a GPU compute task:
//! device discovery, context/queue creation, buffer allocation, kernel
//! compilation, dispatch, readback, strict verification, and throughput
//! benchmarking (GFLOPS and memory bandwidth) of an elementwise vector
//! addition `c[i] = a[i] + b[i]`.
//!
//! The compute runtime sits behind the [`runtime::ComputeBackend`] trait.
//! The host reference backend is always available; the real OpenCL backend
//! (via `opencl3`) is compiled in with the `opencl` cargo feature.
//!
//! ## Quick start
//!
//! ```
//! use aplusb::{BenchConfig, pipeline, runtime::BackendSpec};
//!
//! let config = BenchConfig::quick().kernel_path("kernels/aplusb.cl");
//! let mut backend = BackendSpec::Host.resolve().unwrap();
//! let report = pipeline::run(backend.as_mut(), &config).unwrap();
//! assert!(report.verified);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;

// Functional modules
pub mod device;
pub mod kernel;
pub mod measurement;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod runtime;
pub mod statistics;

// Re-exports for public API
pub use config::BenchConfig;
pub use error::{Error, Result};
