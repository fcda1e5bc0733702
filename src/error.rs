//! Error taxonomy for the whole run.
//!
//! Every failure is fatal: errors propagate with `?` up to `main`, which
//! prints the message on stderr and exits non-zero. There is no
//! recovered-locally path anywhere in this crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All the ways a run can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Platform enumeration yielded zero usable devices. Covers both the
    /// zero-platform and the all-platforms-empty case.
    #[error("no compute devices available")]
    NoDevicesAvailable,

    /// Lap statistics were requested before any lap was recorded.
    #[error("no laps recorded")]
    NoSamplesRecorded,

    /// The kernel source file could not be read.
    #[error("failed to read kernel source at {path}: {source}")]
    KernelSource {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The kernel source file was readable but empty.
    #[error("kernel source at {path} is empty; is the working directory set to the crate root?")]
    EmptyKernelSource {
        /// Path that was read.
        path: PathBuf,
    },

    /// A compute runtime call returned a non-success status.
    #[error("compute runtime call failed with code {code} at {call}")]
    Runtime {
        /// Call site, e.g. `clCreateContext`.
        call: &'static str,
        /// Raw status code from the runtime.
        code: i32,
    },

    /// Program compilation failed; carries the runtime's build log.
    #[error("kernel program build failed:\n{log}")]
    ProgramBuild {
        /// Build log retrieved from the runtime.
        log: String,
    },

    /// The CPU reference and the device result disagree. Strict IEEE-754
    /// equality per element; any differing element is fatal.
    #[error("CPU and GPU results differ at index {index}: expected {expected}, got {actual}")]
    Mismatch {
        /// First differing element.
        index: usize,
        /// CPU reference value.
        expected: f32,
        /// Value read back from the device.
        actual: f32,
    },

    /// The requested configuration cannot be honored.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No kernel of this name exists in the built program.
    #[error("unknown kernel {0:?} in built program")]
    UnknownKernel(String),

    /// A buffer or kernel handle does not belong to this backend.
    #[error("invalid {kind} handle {id}")]
    InvalidHandle {
        /// "buffer" or "kernel".
        kind: &'static str,
        /// The handle's index.
        id: usize,
    },

    /// A kernel was dispatched with an argument slot left unbound.
    #[error("kernel argument {index} is not bound")]
    MissingArg {
        /// Positional argument index.
        index: u32,
    },

    /// Global/local work shape is unusable.
    #[error("invalid work shape: {0}")]
    InvalidWorkShape(String),
}

impl Error {
    /// Shorthand for mapping a runtime status code to [`Error::Runtime`].
    pub fn runtime(call: &'static str, code: i32) -> Self {
        Self::Runtime { call, code }
    }
}
