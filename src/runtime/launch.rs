//! Launch geometry and stage identifiers

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{Error, Result};
use crate::scan::WARP_SIZE;

/// Lanes per block
pub const BLOCK_SIZE: usize = 256;

/// Lane groups per block
pub const WARPS_PER_BLOCK: usize = BLOCK_SIZE / WARP_SIZE;

/// The kernel launches a scan is made of, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Stage 1: per-interval local scan and carry emission
    IntervalScan,
    /// Stage 2: scan of the carry array
    CarryScan,
    /// Stage 3, inclusive variant: carry broadcast
    InclusiveUpdate,
    /// Stage 3, exclusive variant: carry broadcast with a one-position shift
    ExclusiveUpdate,
}

impl Stage {
    /// Short name used in logs and error messages
    pub fn name(self) -> &'static str {
        match self {
            Stage::IntervalScan => "interval_scan",
            Stage::CarryScan => "carry_scan",
            Stage::InclusiveUpdate => "inclusive_update",
            Stage::ExclusiveUpdate => "exclusive_update",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text of a caught panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "kernel panicked".to_string()
    }
}

/// Run `f`, reporting an operator fault inside it as a failure of `stage`
pub(crate) fn guard_stage<T>(stage: Stage, f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = panic_message(payload.as_ref());
        log::warn!("{} failed: {}", stage, reason);
        Error::launch(stage, reason)
    })
}

/// Number of lane groups a launch runs, batched into blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchGrid {
    groups: usize,
}

impl LaunchGrid {
    /// Grid covering `groups` lane groups
    pub fn for_groups(groups: usize) -> Self {
        Self { groups }
    }

    /// Grid holding exactly one lane group
    pub fn single_group() -> Self {
        Self { groups: 1 }
    }

    /// Number of lane groups
    #[inline]
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// Number of blocks (`ceil(groups / WARPS_PER_BLOCK)`)
    #[inline]
    pub fn blocks(&self) -> usize {
        self.groups.div_ceil(WARPS_PER_BLOCK)
    }

    /// Global group indices owned by `block`
    pub fn groups_in_block(&self, block: usize) -> std::ops::Range<usize> {
        let first = (block * WARPS_PER_BLOCK).min(self.groups);
        let last = (first + WARPS_PER_BLOCK).min(self.groups);
        first..last
    }
}
