//! Update kernels: broadcast scanned carries across intervals
//!
//! After the carry scan, `carry_in[g]` holds the fold of intervals `0..=g`.
//! Every position of interval `g > 0` still only holds its local scan, so it
//! is missing the fold of all earlier intervals, `carry_in[g - 1]`.

use super::plan::interval_bounds;
use super::warp::{GroupScratch, WARP_SIZE};
use crate::memory::GlobalView;

/// Finish an inclusive scan for the interval owned by `group`
///
/// `output[i] = op(carry_in[group - 1], output[i])` for every position of the
/// interval. Group 0 has no predecessor and returns immediately, as does any
/// group whose interval is empty. Lanes stride by `WARP_SIZE` across the
/// interval.
///
/// # Safety
/// - `output` addresses at least `n` positions and is writable.
/// - `carry_in[group - 1]` was written by the carry scan.
/// - No other group of the same launch owns this interval.
pub unsafe fn inclusive_update_kernel<T, F>(
    group: usize,
    output: GlobalView<'_, T>,
    op: &F,
    n: usize,
    interval_size: usize,
    carry_in: GlobalView<'_, T>,
) where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let interval = interval_bounds(group, interval_size, n);
    if group == 0 || interval.is_empty() {
        return;
    }

    let carry = unsafe { carry_in.read(group - 1) };
    for base in interval.clone().step_by(WARP_SIZE) {
        let active = (interval.end - base).min(WARP_SIZE);
        for lane in 0..active {
            let i = base + lane;
            unsafe { output.write(i, op(carry, output.read(i))) };
        }
    }
}

/// Finish an exclusive scan for the interval owned by `group`
///
/// The incoming carry is `init` for group 0 and `op(init, carry_in[group - 1])`
/// otherwise. The first position of the interval receives the incoming carry;
/// every later position receives `op(carry, local scan of the previous
/// position)`.
///
/// Each chunk is processed in two phases. First every lane buffers
/// `op(carry, output[i])` in its scratch slot; then every lane writes
/// `output[i]` from its left neighbour's slot (lane 0 takes the last slot of
/// the previous chunk). All reads of a chunk happen before any of its
/// writes, so no lane clobbers a value another lane still needs.
///
/// # Safety
/// - `output` addresses at least `n` positions and is writable.
/// - For `group > 0`, `carry_in[group - 1]` was written by the carry scan.
/// - No other group of the same launch owns this interval.
pub unsafe fn exclusive_update_kernel<T, F>(
    group: usize,
    output: GlobalView<'_, T>,
    init: T,
    op: &F,
    n: usize,
    interval_size: usize,
    carry_in: GlobalView<'_, T>,
) where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let interval = interval_bounds(group, interval_size, n);
    if interval.is_empty() {
        return;
    }

    let carry = if group == 0 {
        init
    } else {
        op(init, unsafe { carry_in.read(group - 1) })
    };
    let mut shifted_in = carry;
    let mut scratch = GroupScratch::new(carry);

    for base in interval.clone().step_by(WARP_SIZE) {
        let active = (interval.end - base).min(WARP_SIZE);

        for lane in 0..active {
            scratch.write(lane, op(carry, unsafe { output.read(base + lane) }));
        }

        for lane in 0..active {
            let value = if lane == 0 {
                shifted_in
            } else {
                scratch.read(lane - 1)
            };
            unsafe { output.write(base + lane, value) };
        }

        // Only a full chunk is followed by another one.
        if active == WARP_SIZE {
            shifted_in = scratch.last();
        }
    }
}
