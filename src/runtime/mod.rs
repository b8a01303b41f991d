//! Runtime backends for scan kernels
//!
//! This module defines the `Runtime` trait and the CPU implementation that
//! emulates SIMT hardware.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies the hardware, answers the concurrency query)
//! ├── Client (launches kernels, one launch = one global barrier)
//! └── Allocator (transient device memory, i.e. the carry buffer)
//! ```

mod allocator;
mod launch;
pub mod traits;

pub mod cpu;

// Host-side carry scan for the second level
pub mod fallback;

pub use allocator::{Allocator, DefaultAllocator, DeviceBuffer};
pub use launch::{BLOCK_SIZE, LaunchGrid, Stage, WARPS_PER_BLOCK};
pub(crate) use launch::guard_stage;
pub use traits::{Device, Runtime, RuntimeClient};
