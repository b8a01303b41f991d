//! Interval-scan kernel
//!
//! Each lane group scans its interval on its own, left to right, one
//! `WARP_SIZE`-wide chunk at a time:
//!
//! ```text
//! interval_size = 4 (two-lane groups for illustration)
//! [ a, b, c, d | e, f, g, h ] -> [ a, a+b, a+b+c, a+b+c+d | e, e+f, ... ]
//! carry_out    = [ a+b+c+d, e+f+g+h ]
//! ```
//!
//! Lane 0 of every chunk after the first folds in the previous chunk's
//! last-lane total before the warp scan, threading a running carry through
//! the interval. The total of the whole interval is the group's carry.

use super::plan::interval_bounds;
use super::warp::{GroupScratch, SyncMode, WARP_SIZE, scan_warp};
use crate::memory::GlobalView;

/// Scan the interval owned by `group` and emit its carry
///
/// Reads `input[begin..end]`, writes the local inclusive scan to
/// `output[begin..end]` and the interval total to `carry_out[group]`. A group
/// whose interval is empty writes nothing.
///
/// # Safety
/// - `input` and `output` address at least `n` positions, `output` writable;
///   they may be the same storage.
/// - `carry_out` is writable at `group` whenever the interval is non-empty.
/// - No other group of the same launch owns this interval or carry slot.
#[allow(clippy::too_many_arguments)]
pub unsafe fn interval_scan_kernel<T, F>(
    group: usize,
    input: GlobalView<'_, T>,
    n: usize,
    output: GlobalView<'_, T>,
    op: &F,
    interval_size: usize,
    carry_out: GlobalView<'_, T>,
    mode: SyncMode,
) where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let interval = interval_bounds(group, interval_size, n);
    if interval.is_empty() {
        return;
    }

    let mut lanes: [T; WARP_SIZE] = [unsafe { input.read(interval.start) }; WARP_SIZE];
    let mut scratch = GroupScratch::new(lanes[0]);
    let mut total = lanes[0];

    for base in interval.clone().step_by(WARP_SIZE) {
        let active = (interval.end - base).min(WARP_SIZE);
        let registers = &mut lanes[..active];

        for (lane, value) in registers.iter_mut().enumerate() {
            *value = unsafe { input.read(base + lane) };
        }

        // Carry in from the previous chunk, which was always full.
        if base != interval.start {
            registers[0] = op(scratch.last(), registers[0]);
        }

        scan_warp(registers, &mut scratch, op, mode);

        for (lane, &value) in registers.iter().enumerate() {
            unsafe { output.write(base + lane, value) };
        }
        total = registers[active - 1];
    }

    unsafe { carry_out.write(group, total) };
}
