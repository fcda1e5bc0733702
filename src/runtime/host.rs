//! CPU reference backend.
//!
//! Simulates the compute runtime on the host so that the full pipeline runs
//! and is testable without any GPU runtime installed. Buffers are plain
//! `Vec<f32>`, "compilation" extracts `__kernel` entry points from the
//! source text, and dispatching the `aplusb` kernel executes the addition
//! over the declared work shape with the same bounds guard the kernel
//! source carries.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::runtime::{BufferId, ComputeBackend, KernelId};

const DEVICE_NAME: &str = "Host reference device";

#[derive(Debug, Clone)]
enum Arg {
    Buffer(BufferId),
    Scalar(u64),
}

#[derive(Debug)]
struct HostKernel {
    name: String,
    args: BTreeMap<u32, Arg>,
}

impl HostKernel {
    fn arg_buffer(&self, index: u32) -> Result<BufferId> {
        match self.args.get(&index) {
            Some(Arg::Buffer(id)) => Ok(*id),
            _ => Err(Error::MissingArg { index }),
        }
    }

    fn arg_scalar(&self, index: u32) -> Result<u64> {
        match self.args.get(&index) {
            Some(Arg::Scalar(v)) => Ok(*v),
            _ => Err(Error::MissingArg { index }),
        }
    }
}

/// CPU implementation of [`ComputeBackend`].
#[derive(Debug, Default)]
pub struct HostBackend {
    buffers: Vec<Vec<f32>>,
    kernel_names: Vec<String>,
    kernels: Vec<HostKernel>,
    built: bool,
}

impl HostBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self, id: BufferId) -> Result<&Vec<f32>> {
        self.buffers
            .get(id.0)
            .ok_or(Error::InvalidHandle { kind: "buffer", id: id.0 })
    }

    fn kernel(&self, id: KernelId) -> Result<&HostKernel> {
        self.kernels
            .get(id.0)
            .ok_or(Error::InvalidHandle { kind: "kernel", id: id.0 })
    }

    fn kernel_mut(&mut self, id: KernelId) -> Result<&mut HostKernel> {
        self.kernels
            .get_mut(id.0)
            .ok_or(Error::InvalidHandle { kind: "kernel", id: id.0 })
    }

    /// Extract `__kernel void <name>(` entry points from the source.
    fn extract_kernel_names(source: &str) -> Vec<String> {
        source
            .split("__kernel")
            .skip(1)
            .filter_map(|fragment| {
                let after_void = fragment.trim_start().strip_prefix("void ")?;
                let name = after_void.split('(').next()?.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                }
            })
            .collect()
    }

    /// Execute `c[i] = a[i] + b[i]` over the declared work shape.
    fn run_aplusb(&mut self, kernel: KernelId, global: usize) -> Result<()> {
        let k = self.kernel(kernel)?;
        let a_id = k.arg_buffer(0)?;
        let b_id = k.arg_buffer(1)?;
        let c_id = k.arg_buffer(2)?;
        let n = k.arg_scalar(3)? as usize;

        let a = self.buffer(a_id)?.clone();
        let b = self.buffer(b_id)?.clone();
        if a.len() < n || b.len() < n {
            return Err(Error::InvalidWorkShape(format!(
                "input buffers hold {}/{} elements but n is {n}",
                a.len(),
                b.len()
            )));
        }
        let c = self
            .buffers
            .get_mut(c_id.0)
            .ok_or(Error::InvalidHandle { kind: "buffer", id: c_id.0 })?;
        if c.len() < n {
            return Err(Error::InvalidWorkShape(format!(
                "output buffer holds {} elements but n is {n}",
                c.len()
            )));
        }

        // Same bounds guard as the kernel source: work items past n are
        // no-ops introduced by rounding the global size up.
        for gid in 0..global {
            if gid < n {
                c[gid] = a[gid] + b[gid];
            }
        }
        Ok(())
    }
}

impl ComputeBackend for HostBackend {
    fn device_name(&self) -> &str {
        DEVICE_NAME
    }

    fn create_buffer_with_data(&mut self, data: &[f32]) -> Result<BufferId> {
        self.buffers.push(data.to_vec());
        Ok(BufferId(self.buffers.len() - 1))
    }

    fn create_buffer(&mut self, len: usize) -> Result<BufferId> {
        self.buffers.push(vec![0.0; len]);
        Ok(BufferId(self.buffers.len() - 1))
    }

    fn build_program(&mut self, source: &str) -> Result<()> {
        let names = Self::extract_kernel_names(source);
        if names.is_empty() {
            return Err(Error::ProgramBuild {
                log: "no __kernel entry points found in source".to_string(),
            });
        }
        self.kernel_names = names;
        self.built = true;
        Ok(())
    }

    fn build_log(&self) -> Option<&str> {
        // The host "compiler" produces no log.
        None
    }

    fn create_kernel(&mut self, name: &str) -> Result<KernelId> {
        if !self.built || !self.kernel_names.iter().any(|k| k == name) {
            return Err(Error::UnknownKernel(name.to_string()));
        }
        self.kernels.push(HostKernel {
            name: name.to_string(),
            args: BTreeMap::new(),
        });
        Ok(KernelId(self.kernels.len() - 1))
    }

    fn set_arg_buffer(&mut self, kernel: KernelId, index: u32, buffer: BufferId) -> Result<()> {
        self.buffer(buffer)?;
        self.kernel_mut(kernel)?.args.insert(index, Arg::Buffer(buffer));
        Ok(())
    }

    fn set_arg_u64(&mut self, kernel: KernelId, index: u32, value: u64) -> Result<()> {
        self.kernel_mut(kernel)?.args.insert(index, Arg::Scalar(value));
        Ok(())
    }

    fn dispatch(&mut self, kernel: KernelId, global: usize, local: usize) -> Result<()> {
        if local == 0 || global == 0 {
            return Err(Error::InvalidWorkShape(
                "global and local work sizes must be positive".to_string(),
            ));
        }
        if global % local != 0 {
            return Err(Error::InvalidWorkShape(format!(
                "global size {global} is not a multiple of local size {local}"
            )));
        }
        match self.kernel(kernel)?.name.as_str() {
            "aplusb" => self.run_aplusb(kernel, global),
            other => Err(Error::UnknownKernel(other.to_string())),
        }
    }

    fn read_buffer(&mut self, buffer: BufferId, dst: &mut [f32]) -> Result<()> {
        let src = self.buffer(buffer)?;
        if src.len() < dst.len() {
            return Err(Error::InvalidWorkShape(format!(
                "buffer holds {} elements, readback wants {}",
                src.len(),
                dst.len()
            )));
        }
        dst.copy_from_slice(&src[..dst.len()]);
        Ok(())
    }
}
