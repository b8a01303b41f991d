//! CPU client and allocator implementation

#[cfg(feature = "rayon")]
use std::sync::Arc;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::device::CpuDevice;
use super::runtime::CpuRuntime;
use crate::error::Result;
use crate::runtime::{DefaultAllocator, LaunchGrid, RuntimeClient, Stage, guard_stage};
use crate::scan::ScanOptions;

/// CPU client for kernel launches
///
/// Owns the worker pool that blocks run on. Clones share the pool and the
/// allocator accounting.
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    allocator: CpuAllocator,
    scan_options: ScanOptions,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a new CPU client
    pub fn new(device: CpuDevice) -> Self {
        let allocator = create_cpu_allocator(&device);
        #[cfg(feature = "rayon")]
        let pool = build_pool(&device);
        Self {
            device,
            allocator,
            scan_options: ScanOptions::default(),
            #[cfg(feature = "rayon")]
            pool,
        }
    }

    /// Replace the options used by this client's scans
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    /// Options used by this client's scans
    pub fn scan_options(&self) -> &ScanOptions {
        &self.scan_options
    }

    /// Run `f` inside this client's worker pool
    #[cfg(feature = "rayon")]
    pub(crate) fn install_parallelism<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Run `f` on the calling thread
    #[cfg(not(feature = "rayon"))]
    pub(crate) fn install_parallelism<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        f()
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // CPU launches join every block before returning, nothing to do
    }

    fn allocator(&self) -> &CpuAllocator {
        &self.allocator
    }

    fn launch<K>(&self, stage: Stage, grid: LaunchGrid, kernel: K) -> Result<()>
    where
        K: Fn(usize) + Sync,
    {
        if grid.groups() == 0 {
            return Ok(());
        }
        log::trace!(
            "launch {}: {} blocks, {} groups",
            stage,
            grid.blocks(),
            grid.groups()
        );

        let run_block = |block: usize| {
            for group in grid.groups_in_block(block) {
                kernel(group);
            }
        };

        let status = guard_stage(stage, || {
            self.install_parallelism(|| {
                #[cfg(feature = "rayon")]
                (0..grid.blocks()).into_par_iter().for_each(run_block);
                #[cfg(not(feature = "rayon"))]
                (0..grid.blocks()).for_each(run_block);
            })
        });
        self.synchronize();
        status
    }
}

/// CPU-specific allocator type alias
pub type CpuAllocator = DefaultAllocator;

/// Create a CPU allocator for the given device
fn create_cpu_allocator(device: &CpuDevice) -> CpuAllocator {
    DefaultAllocator::new(device.memory_limit())
}

#[cfg(feature = "rayon")]
fn build_pool(device: &CpuDevice) -> Option<Arc<rayon::ThreadPool>> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(device.workers())
        .thread_name(|i| format!("warpscan-worker-{i}"))
        .build()
    {
        Ok(pool) => Some(Arc::new(pool)),
        Err(err) => {
            // Blocks still run, on the global pool.
            log::warn!("failed to build worker pool, using the global pool: {err}");
            None
        }
    }
}
