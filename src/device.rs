//! Device discovery and selection.
//!
//! The selector is a first-match-wins linear scan over the runtime's
//! platform-then-device enumeration order: the first accelerator-class
//! device wins, otherwise the first device overall. No scoring, no
//! multi-criteria ranking; determinism comes entirely from the stability of
//! the underlying enumeration order.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Device class, as reported by the runtime's type flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// A GPU.
    Gpu,
    /// A dedicated accelerator (FPGA, DSP, ...).
    Accelerator,
    /// A CPU device.
    Cpu,
    /// Anything else the runtime reports.
    Other,
}

impl DeviceKind {
    /// Whether this device belongs to the preferred accelerator/GPU class.
    pub fn is_accelerator_class(self) -> bool {
        matches!(self, Self::Gpu | Self::Accelerator)
    }
}

/// Read-only view of a runtime's platform/device topology.
///
/// Implementations own the underlying handles; the selector only reads and
/// returns one of them. Queries are fallible because they go through the
/// runtime (`clGetDeviceInfo` and friends).
pub trait DeviceEnumerator {
    /// Opaque device handle.
    type Device: Clone;

    /// All platforms, each with its devices in enumeration order.
    ///
    /// A platform with zero devices is represented by an empty inner vector,
    /// not an error.
    fn platforms(&self) -> Result<Vec<Vec<Self::Device>>>;

    /// The device's class flag.
    fn device_kind(&self, device: &Self::Device) -> Result<DeviceKind>;

    /// Human-readable device name.
    fn device_name(&self, device: &Self::Device) -> Result<String>;
}

/// Pick the most suitable device from the enumeration.
///
/// Scans all devices in platform-then-device order and returns the first
/// accelerator-class device, falling back to the first device overall when
/// none match. Fails with [`Error::NoDevicesAvailable`] when the enumeration
/// yields zero devices, whether because there are no platforms or because
/// every platform is empty.
pub fn select_device<E: DeviceEnumerator>(enumerator: &E) -> Result<E::Device> {
    let platforms = enumerator.platforms()?;
    if platforms.is_empty() {
        return Err(Error::NoDevicesAvailable);
    }

    let mut all = Vec::new();
    for devices in platforms {
        // Empty platforms are skipped, not an error.
        all.extend(devices);
    }

    let first = all.first().cloned().ok_or(Error::NoDevicesAvailable)?;
    for device in &all {
        if enumerator.device_kind(device)?.is_accelerator_class() {
            return Ok(device.clone());
        }
    }
    Ok(first)
}
