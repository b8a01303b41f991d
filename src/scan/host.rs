//! Sequential host-side scans
//!
//! Strict left-to-right folds. Used for the host-side carry scan, for the
//! host memory-space path of [`crate::dispatch`], and as the reference the
//! parallel engine is tested against.

/// Inclusive scan of `data` in place
pub fn inclusive_scan_in_place<T, F>(data: &mut [T], op: &F)
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let mut iter = data.iter_mut();
    let Some(first) = iter.next() else {
        return;
    };
    let mut acc = *first;
    for value in iter {
        acc = op(acc, *value);
        *value = acc;
    }
}

/// Inclusive scan of `input` into the leading positions of `output`
///
/// Returns the number of positions written. `output` must be at least as
/// long as `input`.
pub fn inclusive_scan<T, F>(input: &[T], output: &mut [T], op: &F) -> usize
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let n = input.len();
    output[..n].copy_from_slice(input);
    inclusive_scan_in_place(&mut output[..n], op);
    n
}

/// Exclusive scan of `data` in place, seeded with `init`
pub fn exclusive_scan_in_place<T, F>(data: &mut [T], init: T, op: &F)
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let mut acc = init;
    for value in data.iter_mut() {
        let current = *value;
        *value = acc;
        acc = op(acc, current);
    }
}

/// Exclusive scan of `input` into the leading positions of `output`
///
/// Returns the number of positions written. `output` must be at least as
/// long as `input`.
pub fn exclusive_scan<T, F>(input: &[T], output: &mut [T], init: T, op: &F) -> usize
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let n = input.len();
    output[..n].copy_from_slice(input);
    exclusive_scan_in_place(&mut output[..n], init, op);
    n
}
