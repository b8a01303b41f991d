//! CPU runtime implementation
//!
//! The CPU runtime emulates SIMT hardware on host threads. Lane groups are
//! batched into blocks; blocks of one launch run concurrently on the
//! client's worker pool, and the lanes of a group are stepped by a single
//! thread, which gives them lock-step semantics by construction.
//!
//! # Memory
//!
//! "Device" memory is host memory. The carry buffer is still reserved
//! through the client's allocator, so a device memory limit behaves as it
//! would on an accelerator.

mod client;
mod device;
mod ops;
mod runtime;

use std::sync::OnceLock;

pub use client::{CpuAllocator, CpuClient};
pub use device::{CpuDevice, DEFAULT_LANES_PER_WORKER};
pub use runtime::CpuRuntime;

use crate::runtime::Runtime;

/// Process-wide client on the default CPU device
///
/// Built on first use; backs the crate-level convenience functions.
pub fn shared_client() -> &'static CpuClient {
    static CLIENT: OnceLock<CpuClient> = OnceLock::new();
    CLIENT.get_or_init(|| CpuRuntime::default_client(&CpuRuntime::default_device()))
}
