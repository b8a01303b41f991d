//! CPU device implementation

use crate::runtime::Device;

/// Resident lanes each worker thread is credited with
///
/// Matches the resident-thread capacity of one streaming multiprocessor, so
/// the interval sizing of a CPU scan has the same shape as on an
/// accelerator with one multiprocessor per worker.
pub const DEFAULT_LANES_PER_WORKER: usize = 2048;

/// CPU device emulating a SIMT accelerator
///
/// Each worker thread plays the role of one multiprocessor: it runs whole
/// blocks, stepping the lanes of each lane group in lock-step.
#[derive(Clone, Debug)]
pub struct CpuDevice {
    id: usize,
    workers: usize,
    lanes_per_worker: usize,
    lock_step: bool,
    memory_limit: Option<usize>,
}

impl CpuDevice {
    /// Create a new CPU device using every available hardware thread
    pub fn new() -> Self {
        Self {
            id: 0,
            workers: default_workers(),
            lanes_per_worker: DEFAULT_LANES_PER_WORKER,
            lock_step: true,
            memory_limit: None,
        }
    }

    /// Set the number of worker threads (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the resident lanes credited to each worker (at least one)
    pub fn with_lanes_per_worker(mut self, lanes: usize) -> Self {
        self.lanes_per_worker = lanes.max(1);
        self
    }

    /// Declare whether lane groups execute in lock-step
    ///
    /// The emulation always steps lanes in order; clearing this makes the
    /// engine take the explicit-barrier path, as it must on hardware without
    /// the guarantee.
    pub fn with_lock_step(mut self, lock_step: bool) -> Self {
        self.lock_step = lock_step;
        self
    }

    /// Cap the device memory available to transient buffers
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Device memory cap, if any
    pub fn memory_limit(&self) -> Option<usize> {
        self.memory_limit
    }
}

impl Default for CpuDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        format!("cpu:{}", self.id)
    }

    fn max_active_lanes(&self) -> usize {
        self.workers.saturating_mul(self.lanes_per_worker)
    }

    fn guarantees_lock_step(&self) -> bool {
        self.lock_step
    }
}

#[cfg(feature = "rayon")]
fn default_workers() -> usize {
    rayon::current_num_threads().max(1)
}

#[cfg(not(feature = "rayon"))]
fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}
