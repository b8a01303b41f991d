//! Trait for device identification and capability queries

use crate::runtime::{BLOCK_SIZE, WARPS_PER_BLOCK};

/// Trait for device identification and capability queries
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }

    /// Maximum number of lanes that can be resident at once
    fn max_active_lanes(&self) -> usize;

    /// Whether every lane of a group is guaranteed to execute in lock-step
    ///
    /// When false, warp-level primitives must synchronize explicitly after
    /// every step.
    fn guarantees_lock_step(&self) -> bool {
        true
    }

    /// Maximum number of lane groups that can be resident at once
    ///
    /// Derived from [`Device::max_active_lanes`]: the device holds
    /// `max_active_lanes / BLOCK_SIZE` blocks of `WARPS_PER_BLOCK` groups.
    /// Never less than one block.
    fn max_resident_groups(&self) -> usize {
        (self.max_active_lanes() / BLOCK_SIZE)
            .max(1)
            .saturating_mul(WARPS_PER_BLOCK)
    }
}
