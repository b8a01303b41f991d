//! Host-side fallback for the carry scan
//!
//! The carry array holds at most one value per resident lane group, so it
//! is tiny next to the sequence. When launching a one-group kernel over it
//! costs more than the work itself, the orchestrator can scan it on the host
//! instead:
//!
//! 1. Copy the written carries from device to host
//! 2. Scan them sequentially
//! 3. Copy the result back to the device buffer
//!
//! Both paths produce the inclusive scan of interval totals in the same
//! slots. For exactly-associative operators the results are identical; for
//! floating-point operators the host path folds strictly left to right.
//!
//! An operator fault during the host scan is reported like a fault inside
//! the carry-scan launch it replaces.

use crate::error::Result;
use crate::runtime::{Allocator, DeviceBuffer, Stage, guard_stage};
use crate::scan::host;

/// Inclusive scan of the first `count` carries, on the host
///
/// # Safety
/// The first `count` slots of `carry` must have been written.
pub unsafe fn scan_carries_on_host<T, A, F>(
    carry: &mut DeviceBuffer<'_, T, A>,
    count: usize,
    op: &F,
) -> Result<()>
where
    T: Copy,
    A: Allocator,
    F: Fn(T, T) -> T,
{
    let mut host_carry = unsafe { carry.copy_to_host(count) };
    guard_stage(Stage::CarryScan, || {
        host::inclusive_scan_in_place(&mut host_carry, op)
    })?;
    carry.copy_from_host(&host_carry);
    Ok(())
}
