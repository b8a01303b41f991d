//! # warpscan
//!
//! **Parallel prefix scan for SIMT-style lane groups.**
//!
//! warpscan computes inclusive and exclusive scans of a linear sequence under
//! any associative operator. The work is split across lane groups the way a
//! GPU would split it: every group scans its own interval, one group scans
//! the per-interval carries, and every group folds its predecessor's carry
//! back in.
//!
//! ## Quick Start
//!
//! ```
//! let input = [1u32, 2, 3, 4, 5, 6, 7, 8];
//! let mut output = [0u32; 8];
//!
//! warpscan::inclusive_scan(&input, &mut output, |a, b| a + b)?;
//! assert_eq!(output, [1, 3, 6, 10, 15, 21, 28, 36]);
//!
//! warpscan::exclusive_scan(&input, &mut output, 0, |a, b| a + b)?;
//! assert_eq!(output, [0, 1, 3, 6, 10, 15, 21, 28]);
//! # Ok::<(), warpscan::error::Error>(())
//! ```
//!
//! For control over the device, worker pool or carry strategy, build a
//! client and use [`ScanOps`](scan::ScanOps):
//!
//! ```
//! use warpscan::prelude::*;
//!
//! let device = CpuDevice::new().with_workers(4);
//! let client = CpuRuntime::default_client(&device)
//!     .with_scan_options(ScanOptions::default().with_carry_strategy(CarryStrategy::Device));
//!
//! let mut data: Vec<i64> = (1..=1000).collect();
//! client.inclusive_scan_in_place(&mut data, |a, b| a.max(b))?;
//! assert_eq!(data[999], 1000);
//! # Ok::<(), warpscan::error::Error>(())
//! ```
//!
//! ## Operators
//!
//! The operator must be associative. It need not be commutative: the left
//! operand of every combination always comes earlier in the sequence.
//!
//! ## Feature Flags
//!
//! - `rayon` (default): run the blocks of a launch on a worker pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dispatch;
pub mod error;
pub mod memory;
pub mod runtime;
pub mod scan;

use error::Result;
use scan::{ScanElement, ScanOps};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dispatch::MemorySpace;
    pub use crate::error::{Error, Result};
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
    pub use crate::runtime::{Allocator, Device, Runtime, RuntimeClient};
    pub use crate::scan::{CarryStrategy, ScanOps, ScanOptions, SyncMode, WARP_SIZE};
}

/// Default runtime for the crate-level functions
pub type DefaultRuntime = runtime::cpu::CpuRuntime;

/// Inclusive scan on the default runtime
///
/// Writes `output[i] = input[0] op ... op input[i]` and returns
/// `input.len()`. `output` may be longer than `input`; the extra positions
/// are left untouched.
pub fn inclusive_scan<T, F>(input: &[T], output: &mut [T], op: F) -> Result<usize>
where
    T: ScanElement,
    F: Fn(T, T) -> T + Sync,
{
    runtime::cpu::shared_client().inclusive_scan(input, output, op)
}

/// Exclusive scan on the default runtime, seeded with `init`
///
/// Writes `output[0] = init` and `output[i] = output[i - 1] op input[i - 1]`,
/// and returns `input.len()`.
pub fn exclusive_scan<T, F>(input: &[T], output: &mut [T], init: T, op: F) -> Result<usize>
where
    T: ScanElement,
    F: Fn(T, T) -> T + Sync,
{
    runtime::cpu::shared_client().exclusive_scan(input, output, init, op)
}
