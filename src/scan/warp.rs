//! Warp-level inclusive scan
//!
//! A lane group of `WARP_SIZE` lanes scans the values its lanes hold in
//! `log2(WARP_SIZE)` shifted-combine steps (Hillis-Steele). At the step with
//! offset `d` (1, 2, 4, ..., WARP_SIZE / 2) every lane of rank `>= d`
//! replaces its value with `op(value of lane - d, own value)`.
//!
//! Two synchronization disciplines are provided:
//!
//! - [`SyncMode::LockStep`]: a single scratch bank. On lock-step hardware
//!   every lane's read of its neighbour happens before any lane's write in
//!   the same step, so no barrier is needed. The emulation reproduces this
//!   by stepping lanes from the highest rank down: a lane is only ever
//!   overwritten after every higher lane has read it.
//! - [`SyncMode::Barrier`]: two scratch banks. Each step reads the front
//!   bank, writes the back bank, then a barrier swaps them. Required where
//!   lock-step execution is not guaranteed.
//!
//! Both produce the same values with the same step count.

/// Lanes per group
pub const WARP_SIZE: usize = 32;

/// Number of shifted-combine steps in a warp scan
pub const LOG2_WARP_SIZE: u32 = WARP_SIZE.trailing_zeros();

const _: () = assert!(WARP_SIZE.is_power_of_two());

/// How lanes of a group synchronize between scan steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Rely on lock-step execution; no barrier between steps
    #[default]
    LockStep,
    /// Explicit barrier after every step, double-buffered scratch
    Barrier,
}

/// Per-group scratch memory: two banks of one slot per lane
///
/// Owned by exactly one group for the duration of a kernel, so no
/// synchronization between groups is ever needed on it.
#[derive(Debug, Clone)]
pub struct GroupScratch<T> {
    banks: [[T; WARP_SIZE]; 2],
    front: usize,
}

impl<T: Copy> GroupScratch<T> {
    /// Scratch with every slot holding `seed`
    ///
    /// The seed is never observed by a correct kernel: lanes only read slots
    /// that an active lane wrote.
    pub fn new(seed: T) -> Self {
        Self {
            banks: [[seed; WARP_SIZE]; 2],
            front: 0,
        }
    }

    /// Read `lane`'s slot in the front bank
    #[inline]
    pub fn read(&self, lane: usize) -> T {
        self.banks[self.front][lane]
    }

    /// Write `lane`'s slot in the front bank
    #[inline]
    pub fn write(&mut self, lane: usize, value: T) {
        self.banks[self.front][lane] = value;
    }

    /// Value left in the last lane's slot
    #[inline]
    pub fn last(&self) -> T {
        self.read(WARP_SIZE - 1)
    }

    #[inline]
    fn write_back(&mut self, lane: usize, value: T) {
        self.banks[self.front ^ 1][lane] = value;
    }

    /// Barrier: publish the back bank as the new front bank
    #[inline]
    fn barrier(&mut self) {
        self.front ^= 1;
    }
}

/// Inclusive scan across the active lanes of one group
///
/// `lanes[k]` is the register of lane `k`; `lanes.len()` is the number of
/// active lanes (a partially populated group only runs its low lanes). On
/// return every register holds the inclusive fold of lanes `0..=k`, and the
/// same values are left in the front bank of `scratch`.
pub fn scan_warp<T, F>(lanes: &mut [T], scratch: &mut GroupScratch<T>, op: &F, mode: SyncMode)
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let active = lanes.len();
    debug_assert!(active >= 1 && active <= WARP_SIZE);

    for (lane, &value) in lanes.iter().enumerate() {
        scratch.write(lane, value);
    }

    match mode {
        SyncMode::LockStep => {
            for step in 0..LOG2_WARP_SIZE {
                let offset = 1usize << step;
                for lane in (offset..active).rev() {
                    let value = op(scratch.read(lane - offset), lanes[lane]);
                    lanes[lane] = value;
                    scratch.write(lane, value);
                }
            }
        }
        SyncMode::Barrier => {
            for step in 0..LOG2_WARP_SIZE {
                let offset = 1usize << step;
                for lane in 0..active {
                    let value = if lane >= offset {
                        op(scratch.read(lane - offset), scratch.read(lane))
                    } else {
                        scratch.read(lane)
                    };
                    scratch.write_back(lane, value);
                }
                scratch.barrier();
            }
            for (lane, value) in lanes.iter_mut().enumerate() {
                *value = scratch.read(lane);
            }
        }
    }
}
