//! Memory-space dispatch
//!
//! Callers that do not know ahead of time where a scan should run pass a
//! [`MemorySpace`]. `Host` runs the sequential fold on the calling thread;
//! `Device` hands the sequence to a runtime client's scan engine. Both paths
//! produce the same results for an associative operator and validate
//! arguments the same way.
//!
//! Failures match too. The host fold is one interval scanned on one lane,
//! so an operator fault there is a [`Stage::IntervalScan`] launch failure.

use crate::error::Result;
use crate::runtime::{Runtime, Stage, guard_stage};
use crate::scan::{ScanElement, ScanOps, host, validate_output_len};

/// Where a scan executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemorySpace {
    /// Sequential scan on the calling thread
    Host,
    /// Parallel scan through a runtime client
    #[default]
    Device,
}

/// Inclusive scan in the given memory space
///
/// Returns the position one past the last written output element.
pub fn inclusive_scan<R, C, T, F>(
    space: MemorySpace,
    client: &C,
    input: &[T],
    output: &mut [T],
    op: F,
) -> Result<usize>
where
    R: Runtime,
    C: ScanOps<R>,
    T: ScanElement,
    F: Fn(T, T) -> T + Sync,
{
    match space {
        MemorySpace::Host => {
            validate_output_len(input.len(), output.len())?;
            guard_stage(Stage::IntervalScan, || {
                host::inclusive_scan(input, output, &op)
            })
        }
        MemorySpace::Device => client.inclusive_scan(input, output, op),
    }
}

/// Exclusive scan in the given memory space, seeded with `init`
///
/// Returns the position one past the last written output element.
pub fn exclusive_scan<R, C, T, F>(
    space: MemorySpace,
    client: &C,
    input: &[T],
    output: &mut [T],
    init: T,
    op: F,
) -> Result<usize>
where
    R: Runtime,
    C: ScanOps<R>,
    T: ScanElement,
    F: Fn(T, T) -> T + Sync,
{
    match space {
        MemorySpace::Host => {
            validate_output_len(input.len(), output.len())?;
            guard_stage(Stage::IntervalScan, || {
                host::exclusive_scan(input, output, init, &op)
            })
        }
        MemorySpace::Device => client.exclusive_scan(input, output, init, op),
    }
}
