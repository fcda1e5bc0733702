//! OpenCL backend via the `opencl3` crate.
//!
//! Binds the [`ComputeBackend`] surface to a real OpenCL runtime: device
//! selection over the platform enumeration, one context and one in-order
//! command queue, `Buffer<cl_float>` device memory, source-built programs,
//! and blocking 1-D dispatch that waits on the kernel's completion event.

use std::ptr;

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::{
    Device, CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_CPU,
    CL_DEVICE_TYPE_GPU,
};
use opencl3::kernel::Kernel;
use opencl3::memory::{Buffer, CL_MEM_READ_ONLY, CL_MEM_WRITE_ONLY};
use opencl3::platform::get_platforms;
use opencl3::program::Program;
use opencl3::types::{cl_device_id, cl_float, cl_ulong, CL_BLOCKING};

use crate::device::{select_device, DeviceEnumerator, DeviceKind};
use crate::error::{Error, Result};
use crate::runtime::{BufferId, ComputeBackend, KernelId};

/// `clGetDeviceIDs` status for a platform with no matching devices.
const CL_DEVICE_NOT_FOUND: i32 = -1;

/// Platform/device topology as the OpenCL runtime reports it.
struct ClTopology;

impl DeviceEnumerator for ClTopology {
    type Device = cl_device_id;

    fn platforms(&self) -> Result<Vec<Vec<cl_device_id>>> {
        let platforms =
            get_platforms().map_err(|e| Error::runtime("clGetPlatformIDs", e.0))?;
        let mut out = Vec::with_capacity(platforms.len());
        for platform in platforms {
            match platform.get_devices(CL_DEVICE_TYPE_ALL) {
                Ok(devices) => out.push(devices),
                // A platform without devices is skipped, not fatal.
                Err(e) if e.0 == CL_DEVICE_NOT_FOUND => out.push(Vec::new()),
                Err(e) => return Err(Error::runtime("clGetDeviceIDs", e.0)),
            }
        }
        Ok(out)
    }

    fn device_kind(&self, device: &cl_device_id) -> Result<DeviceKind> {
        let bits = Device::new(*device)
            .dev_type()
            .map_err(|e| Error::runtime("clGetDeviceInfo", e.0))?;
        Ok(if bits & CL_DEVICE_TYPE_GPU != 0 {
            DeviceKind::Gpu
        } else if bits & CL_DEVICE_TYPE_ACCELERATOR != 0 {
            DeviceKind::Accelerator
        } else if bits & CL_DEVICE_TYPE_CPU != 0 {
            DeviceKind::Cpu
        } else {
            DeviceKind::Other
        })
    }

    fn device_name(&self, device: &cl_device_id) -> Result<String> {
        Device::new(*device)
            .name()
            .map_err(|e| Error::runtime("clGetDeviceInfo", e.0))
    }
}

/// OpenCL implementation of [`ComputeBackend`].
///
/// Field order is the release order: kernels before the program before the
/// buffers before the queue before the context, reproduced structurally by
/// Rust's top-to-bottom struct drop order instead of a manual release list.
pub struct OpenClBackend {
    kernels: Vec<Kernel>,
    program: Option<Program>,
    buffers: Vec<Buffer<cl_float>>,
    queue: CommandQueue,
    context: Context,
    device: Device,
    device_name: String,
    build_log: Option<String>,
}

impl OpenClBackend {
    /// Enumerate devices, select one, and bind a context and an in-order
    /// command queue to it.
    pub fn new() -> Result<Self> {
        let device_id = select_device(&ClTopology)?;
        let device = Device::new(device_id);
        let device_name = ClTopology.device_name(&device_id)?;
        let context = Context::from_device(&device)
            .map_err(|e| Error::runtime("clCreateContext", e.0))?;
        let queue = CommandQueue::create_default(&context, 0)
            .map_err(|e| Error::runtime("clCreateCommandQueue", e.0))?;
        Ok(Self {
            kernels: Vec::new(),
            program: None,
            buffers: Vec::new(),
            queue,
            context,
            device,
            device_name,
            build_log: None,
        })
    }

    fn buffer(&self, id: BufferId) -> Result<&Buffer<cl_float>> {
        self.buffers
            .get(id.0)
            .ok_or(Error::InvalidHandle { kind: "buffer", id: id.0 })
    }

    fn kernel(&self, id: KernelId) -> Result<&Kernel> {
        self.kernels
            .get(id.0)
            .ok_or(Error::InvalidHandle { kind: "kernel", id: id.0 })
    }
}

impl ComputeBackend for OpenClBackend {
    fn device_name(&self) -> &str {
        &self.device_name
    }

    fn create_buffer_with_data(&mut self, data: &[f32]) -> Result<BufferId> {
        let mut buffer = unsafe {
            Buffer::<cl_float>::create(&self.context, CL_MEM_READ_ONLY, data.len(), ptr::null_mut())
        }
        .map_err(|e| Error::runtime("clCreateBuffer", e.0))?;
        let _write_event = unsafe {
            self.queue
                .enqueue_write_buffer(&mut buffer, CL_BLOCKING, 0, data, &[])
        }
        .map_err(|e| Error::runtime("clEnqueueWriteBuffer", e.0))?;
        self.buffers.push(buffer);
        Ok(BufferId(self.buffers.len() - 1))
    }

    fn create_buffer(&mut self, len: usize) -> Result<BufferId> {
        let buffer = unsafe {
            Buffer::<cl_float>::create(&self.context, CL_MEM_WRITE_ONLY, len, ptr::null_mut())
        }
        .map_err(|e| Error::runtime("clCreateBuffer", e.0))?;
        self.buffers.push(buffer);
        Ok(BufferId(self.buffers.len() - 1))
    }

    fn build_program(&mut self, source: &str) -> Result<()> {
        let program = Program::create_and_build_from_source(&self.context, source, "")
            .map_err(|log| Error::ProgramBuild { log })?;
        // An Intel CPU driver reports vectorization width here even on
        // success; keep anything non-empty for the report.
        let log = program.get_build_log(self.device.id()).unwrap_or_default();
        self.build_log = if log.trim().is_empty() { None } else { Some(log) };
        self.program = Some(program);
        Ok(())
    }

    fn build_log(&self) -> Option<&str> {
        self.build_log.as_deref()
    }

    fn create_kernel(&mut self, name: &str) -> Result<KernelId> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| Error::UnknownKernel(name.to_string()))?;
        let kernel =
            Kernel::create(program, name).map_err(|e| Error::runtime("clCreateKernel", e.0))?;
        self.kernels.push(kernel);
        Ok(KernelId(self.kernels.len() - 1))
    }

    fn set_arg_buffer(&mut self, kernel: KernelId, index: u32, buffer: BufferId) -> Result<()> {
        let buffer = self.buffer(buffer)?;
        let kernel = self.kernel(kernel)?;
        unsafe { kernel.set_arg(index, buffer) }
            .map_err(|e| Error::runtime("clSetKernelArg", e.0))?;
        Ok(())
    }

    fn set_arg_u64(&mut self, kernel: KernelId, index: u32, value: u64) -> Result<()> {
        let kernel = self.kernel(kernel)?;
        let value: cl_ulong = value;
        unsafe { kernel.set_arg(index, &value) }
            .map_err(|e| Error::runtime("clSetKernelArg", e.0))?;
        Ok(())
    }

    fn dispatch(&mut self, kernel: KernelId, global: usize, local: usize) -> Result<()> {
        let kernel = self.kernel(kernel)?;
        let global_sizes = [global];
        let local_sizes = [local];
        let event = unsafe {
            self.queue.enqueue_nd_range_kernel(
                kernel.get(),
                1,
                ptr::null(),
                global_sizes.as_ptr(),
                local_sizes.as_ptr(),
                &[],
            )
        }
        .map_err(|e| Error::runtime("clEnqueueNDRangeKernel", e.0))?;
        event
            .wait()
            .map_err(|e| Error::runtime("clWaitForEvents", e.0))
    }

    fn read_buffer(&mut self, buffer: BufferId, dst: &mut [f32]) -> Result<()> {
        let buffer = self.buffer(buffer)?;
        let _read_event = unsafe {
            self.queue
                .enqueue_read_buffer(buffer, CL_BLOCKING, 0, dst, &[])
        }
        .map_err(|e| Error::runtime("clEnqueueReadBuffer", e.0))?;
        Ok(())
    }
}
