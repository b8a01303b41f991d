//! Parallel prefix scan over lane groups
//!
//! A scan of `n` elements runs as three launches separated by global
//! barriers:
//!
//! ```text
//! stage 1  interval_scan     every group scans its interval, emits one carry
//! stage 2  carry_scan        inclusive scan of the carries (one group, or host)
//! stage 3  *_update          every group folds its predecessor's carry in
//! ```
//!
//! The carry buffer holds one slot per group. It is allocated right before
//! stage 1 and released when the scan returns, successfully or not.
//!
//! The hierarchy has exactly two levels. The carry count is bounded by the
//! number of resident groups, and a single group iterates over any number of
//! carries, so the second level never needs a third.
//!
//! The only way in is [`ScanOps`], whose borrows guarantee that the output
//! is writable and either disjoint from the input or the same storage. The
//! view-level orchestrator behind it stays internal:
//!
//! ```compile_fail
//! use warpscan::memory::GlobalView;
//! use warpscan::prelude::*;
//!
//! let client = CpuRuntime::default_client(&CpuDevice::new());
//! let shared = vec![1u32; 4];
//! let view = GlobalView::from_slice(&shared);
//! warpscan::scan::inclusive_scan_impl::<CpuRuntime, _, _>(
//!     &client,
//!     client.scan_options(),
//!     view,
//!     view,
//!     |a, b| a + b,
//! );
//! ```

pub mod host;
pub mod interval;
pub mod plan;
pub mod update;
pub mod warp;

pub use plan::ScanPlan;
pub use warp::{GroupScratch, LOG2_WARP_SIZE, SyncMode, WARP_SIZE};

use crate::error::{Error, Result};
use crate::memory::GlobalView;
use crate::runtime::{Device, DeviceBuffer, LaunchGrid, Runtime, RuntimeClient, Stage, fallback};

/// Element types a scan can run over
///
/// Elements are plain values: copied into lanes and scratch, shared between
/// worker threads.
pub trait ScanElement: Copy + Send + Sync + 'static {}

impl<T: Copy + Send + Sync + 'static> ScanElement for T {}

// ============================================================================
// Options
// ============================================================================

/// Where the second-level (carry) scan runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryStrategy {
    /// Launch one lane group over the carry array
    Device,
    /// Copy the carries to the host, scan sequentially, copy back
    Host,
    /// Host path when there are at most `host_threshold` carries, device otherwise
    Auto {
        /// Largest carry count scanned on the host
        host_threshold: usize,
    },
}

impl CarryStrategy {
    /// Whether `carries` carries are scanned on the host under this strategy
    pub fn runs_on_host(&self, carries: usize) -> bool {
        match *self {
            CarryStrategy::Device => false,
            CarryStrategy::Host => true,
            CarryStrategy::Auto { host_threshold } => carries <= host_threshold,
        }
    }
}

impl Default for CarryStrategy {
    fn default() -> Self {
        CarryStrategy::Auto {
            host_threshold: WARP_SIZE,
        }
    }
}

/// Configuration options for scans
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Where the carry scan runs (default: `Auto` with threshold `WARP_SIZE`)
    pub carry_strategy: CarryStrategy,

    /// Warp synchronization discipline (default: derived from the device)
    ///
    /// A device that does not guarantee lock-step execution always gets
    /// [`SyncMode::Barrier`], whatever is requested here.
    pub sync_mode: Option<SyncMode>,

    /// Upper bound on lane groups per launch (default: none)
    ///
    /// The device's resident group count always applies as well.
    pub max_groups: Option<usize>,
}

impl ScanOptions {
    /// Set the carry strategy
    pub fn with_carry_strategy(mut self, strategy: CarryStrategy) -> Self {
        self.carry_strategy = strategy;
        self
    }

    /// Request a synchronization discipline
    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = Some(mode);
        self
    }

    /// Cap the number of lane groups per launch
    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = Some(max_groups);
        self
    }

    /// Group bound for `device`: resident groups, capped by `max_groups`
    pub fn resolve_max_groups<D: Device>(&self, device: &D) -> usize {
        let resident = device.max_resident_groups();
        self.max_groups.map_or(resident, |cap| cap.min(resident)).max(1)
    }

    /// Synchronization discipline for `device`
    pub fn resolve_sync_mode<D: Device>(&self, device: &D) -> SyncMode {
        if !device.guarantees_lock_step() {
            return SyncMode::Barrier;
        }
        self.sync_mode.unwrap_or(SyncMode::LockStep)
    }
}

// ============================================================================
// Scan Operations Trait
// ============================================================================

/// Prefix scan operations
///
/// `op` must be associative. It is never assumed commutative: every
/// combination keeps the left operand earlier in the sequence than the
/// right one.
///
/// Every method returns the position one past the last written output
/// element (`input.len()`). An empty input is a no-op returning 0.
pub trait ScanOps<R: Runtime> {
    /// Inclusive scan: `output[i] = input[0] op ... op input[i]`
    ///
    /// # Example
    ///
    /// ```
    /// # use warpscan::prelude::*;
    /// # let client = CpuRuntime::default_client(&CpuDevice::new());
    /// let input = [1, 2, 3, 4, 5, 6, 7, 8];
    /// let mut output = [0; 8];
    /// let end = client.inclusive_scan(&input, &mut output, |a, b| a + b)?;
    /// assert_eq!(end, 8);
    /// assert_eq!(output, [1, 3, 6, 10, 15, 21, 28, 36]);
    /// # Ok::<(), warpscan::error::Error>(())
    /// ```
    fn inclusive_scan<T, F>(&self, input: &[T], output: &mut [T], op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync;

    /// Inclusive scan with input and output in the same storage
    fn inclusive_scan_in_place<T, F>(&self, data: &mut [T], op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync;

    /// Exclusive scan: `output[0] = init`, `output[i] = output[i - 1] op input[i - 1]`
    ///
    /// # Example
    ///
    /// ```
    /// # use warpscan::prelude::*;
    /// # let client = CpuRuntime::default_client(&CpuDevice::new());
    /// let input = [1, 2, 3, 4, 5, 6, 7, 8];
    /// let mut output = [0; 8];
    /// client.exclusive_scan(&input, &mut output, 0, |a, b| a + b)?;
    /// assert_eq!(output, [0, 1, 3, 6, 10, 15, 21, 28]);
    /// # Ok::<(), warpscan::error::Error>(())
    /// ```
    fn exclusive_scan<T, F>(&self, input: &[T], output: &mut [T], init: T, op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync;

    /// Exclusive scan with input and output in the same storage
    fn exclusive_scan_in_place<T, F>(&self, data: &mut [T], init: T, op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync;
}

/// Check that `output` can hold a scan of `input`
pub(crate) fn validate_output_len(input_len: usize, output_len: usize) -> Result<()> {
    if output_len < input_len {
        return Err(Error::invalid_argument(
            "output",
            format!("holds {output_len} elements, input has {input_len}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Which update kernel finishes the scan
#[derive(Debug, Clone, Copy)]
enum Finish<T> {
    Inclusive,
    Exclusive { init: T },
}

/// Inclusive scan of `input` into `output` (which may alias `input`)
///
/// `output` must address at least `input.len()` positions, come from
/// writable storage, and be either the same view as `input` or disjoint
/// from it.
pub(crate) fn inclusive_scan_impl<R, T, F>(
    client: &R::Client,
    options: &ScanOptions,
    input: GlobalView<'_, T>,
    output: GlobalView<'_, T>,
    op: F,
) -> Result<usize>
where
    R: Runtime,
    T: ScanElement,
    F: Fn(T, T) -> T + Sync,
{
    run_scan::<R, T, F>(client, options, input, output, Finish::Inclusive, op)
}

/// Exclusive scan of `input` into `output` (which may alias `input`)
///
/// Same requirements on the views as [`inclusive_scan_impl`].
pub(crate) fn exclusive_scan_impl<R, T, F>(
    client: &R::Client,
    options: &ScanOptions,
    input: GlobalView<'_, T>,
    output: GlobalView<'_, T>,
    init: T,
    op: F,
) -> Result<usize>
where
    R: Runtime,
    T: ScanElement,
    F: Fn(T, T) -> T + Sync,
{
    run_scan::<R, T, F>(client, options, input, output, Finish::Exclusive { init }, op)
}

fn run_scan<R, T, F>(
    client: &R::Client,
    options: &ScanOptions,
    input: GlobalView<'_, T>,
    output: GlobalView<'_, T>,
    finish: Finish<T>,
    op: F,
) -> Result<usize>
where
    R: Runtime,
    T: ScanElement,
    F: Fn(T, T) -> T + Sync,
{
    let n = input.len();
    if output.len() < n {
        return Err(Error::Internal(format!(
            "output view holds {} positions, scan needs {n}",
            output.len()
        )));
    }

    let device = client.device();
    let Some(plan) = ScanPlan::new(n, options.resolve_max_groups(device)) else {
        return Ok(0);
    };
    let mode = options.resolve_sync_mode(device);
    let carry_on_host = options.carry_strategy.runs_on_host(plan.active_groups);
    log::debug!(
        "scan on {} ({}): n={} groups={} (active {}) iters={} interval={} sync={:?} carry_on_host={}",
        R::name(),
        device.name(),
        n,
        plan.num_groups,
        plan.active_groups,
        plan.num_iters,
        plan.interval_size,
        mode,
        carry_on_host
    );

    let mut carry = DeviceBuffer::<T, R::Allocator>::new(client.allocator(), plan.num_groups)?;

    // Stage 1: local scans, one carry per non-empty interval.
    {
        let carry_out = carry.view();
        client.launch(Stage::IntervalScan, plan.grid(), |group| unsafe {
            interval::interval_scan_kernel(
                group,
                input,
                n,
                output,
                &op,
                plan.interval_size,
                carry_out,
                mode,
            )
        })?;
    }

    // Stage 2: scan the carries of active groups; empty groups never wrote one.
    let active = plan.active_groups;
    if carry_on_host {
        // SAFETY: stage 1 wrote carries 0..active.
        unsafe { fallback::scan_carries_on_host(&mut carry, active, &op) }?;
    } else {
        // Carries 0..active are initialized. The last slot doubles as the
        // kernel's carry output and receives the total it already holds.
        let scanned = carry.view().take(active);
        client.launch(Stage::CarryScan, LaunchGrid::single_group(), |group| unsafe {
            interval::interval_scan_kernel(
                group,
                scanned,
                active,
                scanned,
                &op,
                active,
                scanned.offset(active - 1),
                mode,
            )
        })?;
    }

    // Stage 3: fold each predecessor's carry into its successor's interval.
    let carry_in = carry.view();
    match finish {
        Finish::Inclusive => {
            client.launch(Stage::InclusiveUpdate, plan.grid(), |group| unsafe {
                update::inclusive_update_kernel(
                    group,
                    output,
                    &op,
                    n,
                    plan.interval_size,
                    carry_in,
                )
            })?;
        }
        Finish::Exclusive { init } => {
            client.launch(Stage::ExclusiveUpdate, plan.grid(), |group| unsafe {
                update::exclusive_update_kernel(
                    group,
                    output,
                    init,
                    &op,
                    n,
                    plan.interval_size,
                    carry_in,
                )
            })?;
        }
    }

    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::CpuDevice;

    #[test]
    fn test_carry_strategy_threshold() {
        let auto = CarryStrategy::Auto { host_threshold: 4 };
        assert!(auto.runs_on_host(4));
        assert!(!auto.runs_on_host(5));
        assert!(CarryStrategy::Host.runs_on_host(usize::MAX));
        assert!(!CarryStrategy::Device.runs_on_host(1));
    }

    #[test]
    fn test_max_groups_is_a_cap() {
        let device = CpuDevice::new().with_workers(1);
        let resident = device.max_resident_groups();
        let options = ScanOptions::default();
        assert_eq!(options.resolve_max_groups(&device), resident);
        assert_eq!(options.clone().with_max_groups(3).resolve_max_groups(&device), 3);
        assert_eq!(
            options.clone().with_max_groups(resident * 10).resolve_max_groups(&device),
            resident
        );
        assert_eq!(options.with_max_groups(0).resolve_max_groups(&device), 1);
    }

    #[test]
    fn test_sync_mode_follows_device() {
        let lock_step = CpuDevice::new();
        let no_lock_step = CpuDevice::new().with_lock_step(false);
        let options = ScanOptions::default();
        assert_eq!(options.resolve_sync_mode(&lock_step), SyncMode::LockStep);
        assert_eq!(options.resolve_sync_mode(&no_lock_step), SyncMode::Barrier);
        let forced = ScanOptions::default().with_sync_mode(SyncMode::LockStep);
        assert_eq!(forced.resolve_sync_mode(&no_lock_step), SyncMode::Barrier);
    }

    #[test]
    fn test_output_len_validation() {
        assert!(validate_output_len(3, 3).is_ok());
        assert!(validate_output_len(3, 4).is_ok());
        assert!(matches!(
            validate_output_len(4, 3),
            Err(Error::InvalidArgument { arg: "output", .. })
        ));
    }
}
