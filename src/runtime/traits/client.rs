//! Trait for runtime clients that launch kernels

use super::Runtime;
use crate::error::Result;
use crate::runtime::{LaunchGrid, Stage};

/// Trait for runtime clients that launch kernels
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Synchronize: wait for all pending operations to complete
    fn synchronize(&self);

    /// Get the allocator for this client
    fn allocator(&self) -> &R::Allocator;

    /// Launch `kernel` once per lane group of `grid` and wait for completion
    ///
    /// The kernel receives the global group index. Groups of the same launch
    /// run with no ordering or visibility guarantee between them; every group
    /// has finished when this returns, which is the only barrier between
    /// stages.
    ///
    /// A fault in any group (a panicking operator included) aborts the launch
    /// and is reported afterwards as [`crate::error::Error::LaunchFailure`].
    fn launch<K>(&self, stage: Stage, grid: LaunchGrid, kernel: K) -> Result<()>
    where
        K: Fn(usize) + Sync;
}
