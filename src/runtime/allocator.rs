//! Memory allocator traits and default implementation
//!
//! The scan engine needs exactly one kind of device memory: the transient
//! carry buffer. It is reserved against the allocator right before stage 1
//! and released when the owning [`DeviceBuffer`] drops, at the end of the
//! scan invocation or on the first error.

use std::mem::{MaybeUninit, size_of};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::memory::GlobalView;

/// Memory allocator trait for runtime backends
///
/// Allocators account for device memory. The storage itself is owned by
/// [`DeviceBuffer`]; the allocator decides whether a request fits.
pub trait Allocator: Clone + Send + Sync {
    /// Reserve `size_bytes`, or fail with `AllocationFailure`
    fn reserve(&self, size_bytes: usize) -> Result<()>;

    /// Return `size_bytes` previously reserved
    fn release(&self, size_bytes: usize);

    /// Get the total reserved bytes
    fn allocated_bytes(&self) -> usize {
        0 // Default: tracking not supported
    }

    /// Bytes that can still be reserved
    fn available_bytes(&self) -> usize {
        usize::MAX
    }
}

/// Default allocator with an optional byte budget
///
/// Clones share the same accounting, so every client of a device sees the
/// same budget.
#[derive(Clone, Debug, Default)]
pub struct DefaultAllocator {
    limit: Option<usize>,
    allocated: Arc<Mutex<usize>>,
}

impl DefaultAllocator {
    /// Create an allocator; `limit` caps the bytes live at once
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            allocated: Arc::new(Mutex::new(0)),
        }
    }
}

impl Allocator for DefaultAllocator {
    fn reserve(&self, size_bytes: usize) -> Result<()> {
        let mut allocated = self.allocated.lock();
        let available = self.limit.map_or(usize::MAX, |l| l.saturating_sub(*allocated));
        if size_bytes > available {
            return Err(Error::allocation(size_bytes, available));
        }
        *allocated += size_bytes;
        Ok(())
    }

    fn release(&self, size_bytes: usize) {
        let mut allocated = self.allocated.lock();
        debug_assert!(*allocated >= size_bytes, "released more than reserved");
        *allocated = allocated.saturating_sub(size_bytes);
    }

    fn allocated_bytes(&self) -> usize {
        *self.allocated.lock()
    }

    fn available_bytes(&self) -> usize {
        let allocated = *self.allocated.lock();
        self.limit.map_or(usize::MAX, |l| l.saturating_sub(allocated))
    }
}

/// Transient device buffer of `len` elements
///
/// Slots start uninitialized; kernels fill them through [`DeviceBuffer::view`].
/// The reservation is returned to the allocator on drop.
pub struct DeviceBuffer<'a, T, A: Allocator> {
    cells: Vec<MaybeUninit<T>>,
    size_bytes: usize,
    allocator: &'a A,
}

impl<'a, T: Copy, A: Allocator> DeviceBuffer<'a, T, A> {
    /// Allocate `len` uninitialized slots
    pub fn new(allocator: &'a A, len: usize) -> Result<Self> {
        let size_bytes = len
            .checked_mul(size_of::<T>())
            .ok_or_else(|| Error::allocation(usize::MAX, allocator.available_bytes()))?;
        allocator.reserve(size_bytes)?;

        let mut cells = Vec::new();
        if cells.try_reserve_exact(len).is_err() {
            allocator.release(size_bytes);
            return Err(Error::allocation(size_bytes, allocator.available_bytes()));
        }
        cells.resize_with(len, MaybeUninit::uninit);

        Ok(Self {
            cells,
            size_bytes,
            allocator,
        })
    }

    /// Number of slots
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the buffer has no slot
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Size of the reservation in bytes
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Position-indexed view for kernels
    pub fn view(&mut self) -> GlobalView<'_, T> {
        // SAFETY: MaybeUninit<T> has the layout of T; the pointer is valid for
        // len elements while the view borrows self. Reads of unwritten slots
        // are excluded by GlobalView::read's contract.
        unsafe { GlobalView::from_raw(self.cells.as_mut_ptr().cast::<T>(), self.cells.len()) }
    }

    /// Copy the first `count` slots to host memory
    ///
    /// # Safety
    /// The first `count` slots must have been written.
    pub unsafe fn copy_to_host(&self, count: usize) -> Vec<T> {
        self.cells[..count]
            .iter()
            .map(|cell| unsafe { cell.assume_init_read() })
            .collect()
    }

    /// Copy `src` from host memory into the leading slots
    pub fn copy_from_host(&mut self, src: &[T]) {
        for (cell, &value) in self.cells.iter_mut().zip(src) {
            cell.write(value);
        }
    }
}

impl<T, A: Allocator> Drop for DeviceBuffer<'_, T, A> {
    fn drop(&mut self) {
        self.allocator.release(self.size_bytes);
    }
}
