//! CPU launch target

use super::client::{CpuAllocator, CpuClient};
use super::device::CpuDevice;
use crate::runtime::Runtime;

/// SIMT emulation on host threads
///
/// Works on any platform. Each block of a launch runs on one worker, which
/// steps the lanes of its groups in rank order.
#[derive(Clone, Debug, Default)]
pub struct CpuRuntime;

impl Runtime for CpuRuntime {
    type Device = CpuDevice;
    type Client = CpuClient;
    type Allocator = CpuAllocator;

    fn name() -> &'static str {
        "cpu"
    }

    fn default_device() -> CpuDevice {
        CpuDevice::new()
    }

    fn default_client(device: &CpuDevice) -> CpuClient {
        CpuClient::new(device.clone())
    }
}
