//! Scan operations for the CPU runtime

use super::{CpuClient, CpuRuntime};
use crate::error::Result;
use crate::memory::GlobalView;
use crate::scan::{
    ScanElement, ScanOps, exclusive_scan_impl, inclusive_scan_impl, validate_output_len,
};

impl ScanOps<CpuRuntime> for CpuClient {
    fn inclusive_scan<T, F>(&self, input: &[T], output: &mut [T], op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync,
    {
        validate_output_len(input.len(), output.len())?;
        let output = GlobalView::from_mut_slice(&mut output[..input.len()]);
        inclusive_scan_impl::<CpuRuntime, T, F>(
            self,
            self.scan_options(),
            GlobalView::from_slice(input),
            output,
            op,
        )
    }

    fn inclusive_scan_in_place<T, F>(&self, data: &mut [T], op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync,
    {
        let view = GlobalView::from_mut_slice(data);
        inclusive_scan_impl::<CpuRuntime, T, F>(self, self.scan_options(), view, view, op)
    }

    fn exclusive_scan<T, F>(&self, input: &[T], output: &mut [T], init: T, op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync,
    {
        validate_output_len(input.len(), output.len())?;
        let output = GlobalView::from_mut_slice(&mut output[..input.len()]);
        exclusive_scan_impl::<CpuRuntime, T, F>(
            self,
            self.scan_options(),
            GlobalView::from_slice(input),
            output,
            init,
            op,
        )
    }

    fn exclusive_scan_in_place<T, F>(&self, data: &mut [T], init: T, op: F) -> Result<usize>
    where
        T: ScanElement,
        F: Fn(T, T) -> T + Sync,
    {
        let view = GlobalView::from_mut_slice(data);
        exclusive_scan_impl::<CpuRuntime, T, F>(self, self.scan_options(), view, view, init, op)
    }
}
