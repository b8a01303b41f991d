//! Launch-target identity

/// A launch target for scan kernels
///
/// Ties together the three things the scan engine needs from hardware,
/// resolved statically so kernels are monomorphized per backend:
///
/// - `Device`: how many lanes can be resident, and whether groups run in
///   lock-step
/// - `Client`: launches a kernel over a grid of lane groups and waits for it
/// - `Allocator`: budget for the transient carry buffer
///
/// # Example
///
/// ```
/// use warpscan::runtime::{Device, Runtime};
/// use warpscan::runtime::cpu::CpuRuntime;
///
/// let device = CpuRuntime::default_device();
/// assert!(device.max_resident_groups() >= 1);
/// let _client = CpuRuntime::default_client(&device);
/// ```
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Hardware description and concurrency query
    type Device: super::Device;

    /// Kernel launcher bound to one device
    type Client: super::RuntimeClient<Self>;

    /// Carry buffer accounting
    type Allocator: crate::runtime::Allocator;

    /// Short backend name, used in logs
    fn name() -> &'static str;

    /// Device used when the caller does not pick one
    fn default_device() -> Self::Device;

    /// Client launching onto `device`
    fn default_client(device: &Self::Device) -> Self::Client;
}
