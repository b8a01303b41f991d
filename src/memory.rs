//! Position-indexed views over sequence memory
//!
//! Kernels never see slices. They see a `GlobalView<T>`: a raw base pointer
//! plus a length, read and written one position at a time. This is the
//! "global memory" of the emulated device. It lets many groups write
//! disjoint positions of the same output concurrently, and it lets the input
//! and output of a scan be the same storage.
//!
//! # Safety model
//!
//! A view does not track borrows. Every kernel upholds two rules:
//! - a position is only touched by the single group that owns it during a
//!   stage (intervals partition `[0, n)`, carry slots are one per group);
//! - within a group, a position is read before it is written.
//!
//! Stages are separated by launches that join every block, so a write in
//! one stage happens-before every read in the next.

use std::marker::PhantomData;

/// Raw, position-indexed view over `len` elements of `T`
pub struct GlobalView<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

impl<T> Clone for GlobalView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GlobalView<'_, T> {}

// Groups access disjoint positions; see the module-level safety model.
unsafe impl<T: Send> Send for GlobalView<'_, T> {}
unsafe impl<T: Send + Sync> Sync for GlobalView<'_, T> {}

impl<'a, T: Copy> GlobalView<'a, T> {
    /// View over a read-only sequence.
    ///
    /// Writing is `unsafe` on every view and requires writable storage, so
    /// a view built here is only ever read; kernels take input views from
    /// this constructor.
    pub fn from_slice(data: &'a [T]) -> Self {
        Self {
            ptr: data.as_ptr() as *mut T,
            len: data.len(),
            _marker: PhantomData,
        }
    }

    /// View over a writable sequence.
    pub fn from_mut_slice(data: &'a mut [T]) -> Self {
        Self {
            ptr: data.as_mut_ptr(),
            len: data.len(),
            _marker: PhantomData,
        }
    }

    /// View over raw storage.
    ///
    /// # Safety
    /// `ptr` must be valid for reads and writes of `len` elements for `'a`.
    pub(crate) unsafe fn from_raw(ptr: *mut T, len: usize) -> Self {
        Self {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    /// Number of addressable positions
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the view addresses no position
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sub-view starting `start` positions in.
    ///
    /// Used to hand a kernel a carry slot that is not its group's own.
    ///
    /// # Panics
    /// If `start > len`.
    pub fn offset(self, start: usize) -> Self {
        assert!(
            start <= self.len,
            "offset {} past view of {}",
            start,
            self.len
        );
        Self {
            // SAFETY: start <= len, so the pointer stays inside (or one past) the allocation.
            ptr: unsafe { self.ptr.add(start) },
            len: self.len - start,
            _marker: PhantomData,
        }
    }

    /// Sub-view of the first `len` positions
    pub fn take(self, len: usize) -> Self {
        Self {
            len: len.min(self.len),
            ..self
        }
    }

    /// Read position `i`.
    ///
    /// # Safety
    /// `i < len`, the position holds an initialized value, and no other
    /// group writes it during the current stage.
    #[inline]
    pub unsafe fn read(&self, i: usize) -> T {
        debug_assert!(i < self.len, "read {} out of {}", i, self.len);
        unsafe { self.ptr.add(i).read() }
    }

    /// Write position `i`.
    ///
    /// # Safety
    /// `i < len`, the view was built from writable storage, and no other
    /// group touches the position during the current stage.
    #[inline]
    pub unsafe fn write(&self, i: usize, value: T) {
        debug_assert!(i < self.len, "write {} out of {}", i, self.len);
        unsafe { self.ptr.add(i).write(value) }
    }
}
