//! Launch sizing for a scan

use std::ops::Range;

use super::warp::WARP_SIZE;
use crate::runtime::LaunchGrid;

/// How a scan of `n` elements is split across lane groups
///
/// ```text
/// num_units     = ceil(n / WARP_SIZE)
/// num_groups    = min(num_units, max_groups)
/// num_iters     = ceil(num_units / num_groups)
/// interval_size = WARP_SIZE * num_iters
/// ```
///
/// Group `g` owns `[g * interval_size, min((g + 1) * interval_size, n))`.
/// Trailing groups can own nothing at all: with 5 units and 4 groups the
/// interval is two chunks long and the fourth group starts past `n`. Those
/// groups are skipped by every kernel and never produce a carry, which is
/// why the carry scan only covers `active_groups`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPlan {
    /// Sequence length
    pub n: usize,
    /// Number of `WARP_SIZE`-wide chunks covering the sequence
    pub num_units: usize,
    /// Lane groups launched per stage (size of the carry buffer)
    pub num_groups: usize,
    /// Chunks each group iterates over
    pub num_iters: usize,
    /// Positions per interval
    pub interval_size: usize,
    /// Groups whose interval is non-empty (carries actually written)
    pub active_groups: usize,
}

impl ScanPlan {
    /// Plan a scan of `n` elements with at most `max_groups` groups
    ///
    /// Returns `None` for `n == 0`, which is a no-op rather than a launch.
    pub fn new(n: usize, max_groups: usize) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let num_units = n.div_ceil(WARP_SIZE);
        let num_groups = num_units.min(max_groups.max(1));
        let num_iters = num_units.div_ceil(num_groups);
        let interval_size = WARP_SIZE * num_iters;
        let active_groups = n.div_ceil(interval_size);

        Some(Self {
            n,
            num_units,
            num_groups,
            num_iters,
            interval_size,
            active_groups,
        })
    }

    /// Positions owned by `group`, clipped to `n` (possibly empty)
    pub fn interval(&self, group: usize) -> Range<usize> {
        interval_bounds(group, self.interval_size, self.n)
    }

    /// Launch grid covering every planned group
    pub fn grid(&self) -> LaunchGrid {
        LaunchGrid::for_groups(self.num_groups)
    }
}

/// `[group * interval_size, min(begin + interval_size, n))`, empty past `n`
#[inline]
pub(crate) fn interval_bounds(group: usize, interval_size: usize, n: usize) -> Range<usize> {
    let begin = group.saturating_mul(interval_size).min(n);
    let end = begin.saturating_add(interval_size).min(n);
    begin..end
}
