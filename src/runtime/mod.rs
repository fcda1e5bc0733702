//! Compute runtime abstraction.
//!
//! The benchmark pipeline talks to an abstract [`ComputeBackend`] that
//! exposes exactly the lifecycle it needs: buffer allocation with access
//! hints, source compilation with a retrievable build log, kernel creation
//! by name with positional argument binding, blocking 1-D dispatch, and
//! blocking readback. Two implementations exist:
//!
//! - [`HostBackend`]: a CPU reference implementation, always available.
//! - `OpenClBackend` (cargo feature `opencl`): the real thing via `opencl3`.

mod host;
#[cfg(feature = "opencl")]
mod opencl;

pub use host::HostBackend;
#[cfg(feature = "opencl")]
pub use opencl::OpenClBackend;

use crate::error::{Error, Result};

/// Handle to a device buffer owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub(crate) usize);

/// Handle to a kernel object owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelId(pub(crate) usize);

/// The compute-runtime surface the pipeline depends on.
///
/// All methods are synchronous: `dispatch` blocks on the operation's
/// completion event and `read_buffer` is a blocking readback, so there is
/// never more than one operation in flight.
pub trait ComputeBackend {
    /// Name of the device this backend is bound to.
    fn device_name(&self) -> &str;

    /// Allocate a read-only device buffer initialized from host data.
    fn create_buffer_with_data(&mut self, data: &[f32]) -> Result<BufferId>;

    /// Allocate an uninitialized write-only device buffer of `len` floats.
    fn create_buffer(&mut self, len: usize) -> Result<BufferId>;

    /// Compile the program from source.
    ///
    /// On failure the build log travels inside [`Error::ProgramBuild`]; on
    /// success a non-empty log (vectorization notes and the like) stays
    /// retrievable through [`build_log`](Self::build_log).
    fn build_program(&mut self, source: &str) -> Result<()>;

    /// Build log of the last successful compilation, if the runtime
    /// produced one.
    fn build_log(&self) -> Option<&str>;

    /// Create a kernel object by name from the built program.
    fn create_kernel(&mut self, name: &str) -> Result<KernelId>;

    /// Bind a buffer to a positional kernel argument.
    fn set_arg_buffer(&mut self, kernel: KernelId, index: u32, buffer: BufferId) -> Result<()>;

    /// Bind a 64-bit scalar to a positional kernel argument.
    fn set_arg_u64(&mut self, kernel: KernelId, index: u32, value: u64) -> Result<()>;

    /// Enqueue the kernel over a 1-D work shape and block until its
    /// completion event resolves.
    fn dispatch(&mut self, kernel: KernelId, global: usize, local: usize) -> Result<()>;

    /// Blocking readback of a device buffer into host memory.
    ///
    /// `dst.len()` elements are read; the buffer must hold at least that
    /// many.
    fn read_buffer(&mut self, buffer: BufferId, dst: &mut [f32]) -> Result<()>;
}

/// A heap-allocated backend behind the trait.
pub type BoxedBackend = Box<dyn ComputeBackend>;

/// Which backend to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendSpec {
    /// OpenCL when compiled in, otherwise the host reference backend.
    #[default]
    Auto,
    /// The CPU reference backend.
    Host,
    /// The real OpenCL backend. A configuration error unless the crate was
    /// built with the `opencl` feature.
    OpenCl,
}

impl BackendSpec {
    /// Instantiate the selected backend.
    pub fn resolve(self) -> Result<BoxedBackend> {
        match self {
            Self::Host => Ok(Box::new(HostBackend::new())),
            #[cfg(feature = "opencl")]
            Self::Auto | Self::OpenCl => Ok(Box::new(OpenClBackend::new()?)),
            #[cfg(not(feature = "opencl"))]
            Self::Auto => Ok(Box::new(HostBackend::new())),
            #[cfg(not(feature = "opencl"))]
            Self::OpenCl => Err(Error::InvalidConfig(
                "this build has no OpenCL backend; rebuild with --features opencl".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_spec_resolves() {
        let backend = BackendSpec::Host.resolve().unwrap();
        assert!(!backend.device_name().is_empty());
    }

    #[cfg(not(feature = "opencl"))]
    #[test]
    fn test_opencl_spec_requires_feature() {
        assert!(matches!(
            BackendSpec::OpenCl.resolve(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[cfg(not(feature = "opencl"))]
    #[test]
    fn test_auto_falls_back_to_host() {
        let backend = BackendSpec::Auto.resolve().unwrap();
        assert_eq!(backend.device_name(), HostBackend::new().device_name());
    }
}
