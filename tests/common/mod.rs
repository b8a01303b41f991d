//! Common test utilities
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warpscan::runtime::Runtime;
use warpscan::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
use warpscan::scan::ScanOptions;

/// Create a CPU client and device for testing
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    (client, device)
}

/// Create a CPU client with the given worker count and scan options
pub fn create_client_with(workers: usize, options: ScanOptions) -> CpuClient {
    let device = CpuDevice::new().with_workers(workers);
    CpuRuntime::default_client(&device).with_scan_options(options)
}

/// Sequential inclusive scan used as the reference
pub fn reference_inclusive<T: Copy>(input: &[T], op: impl Fn(T, T) -> T) -> Vec<T> {
    let mut out = Vec::with_capacity(input.len());
    let mut acc: Option<T> = None;
    for &x in input {
        let next = match acc {
            Some(a) => op(a, x),
            None => x,
        };
        out.push(next);
        acc = Some(next);
    }
    out
}

/// Sequential exclusive scan used as the reference
pub fn reference_exclusive<T: Copy>(input: &[T], init: T, op: impl Fn(T, T) -> T) -> Vec<T> {
    let mut out = Vec::with_capacity(input.len());
    let mut acc = init;
    for &x in input {
        out.push(acc);
        acc = op(acc, x);
    }
    out
}

/// Seeded pseudo-random integers in `[0, bound)`
pub fn random_u64(len: usize, bound: u64, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..bound)).collect()
}

/// Seeded pseudo-random floats in `[0, 1)`
pub fn random_f64(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.r#gen::<f64>()).collect()
}

/// Affine map `x -> a * x + b` over wrapping u64 arithmetic
///
/// Composition is associative but not commutative, so it catches any scan
/// that combines operands out of sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affine {
    pub a: u64,
    pub b: u64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1, b: 0 };

    /// Apply `self`, then `next`
    pub fn then(self, next: Affine) -> Affine {
        Affine {
            a: next.a.wrapping_mul(self.a),
            b: next.a.wrapping_mul(self.b).wrapping_add(next.b),
        }
    }
}

/// Seeded pseudo-random affine maps
pub fn random_affine(len: usize, seed: u64) -> Vec<Affine> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| Affine {
            a: rng.gen_range(1..16),
            b: rng.gen_range(0..1000),
        })
        .collect()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
