//! Integration tests for scan operations (inclusive, exclusive, in place)
//!
//! Tests verify correctness across:
//! - Lengths around warp and interval boundaries
//! - Integer, float and non-commutative operators
//! - Large inputs spanning many groups
//! - Edge cases (empty, single element, aliasing)

mod common;

use common::{
    Affine, assert_allclose_f64, create_client_with, create_cpu_client, random_affine, random_f64,
    random_u64, reference_exclusive, reference_inclusive,
};
use warpscan::runtime::Runtime;
use warpscan::runtime::cpu::{CpuDevice, CpuRuntime};
use warpscan::scan::{ScanOps, ScanOptions, WARP_SIZE};

// ============================================================================
// Basic Examples
// ============================================================================

#[test]
fn test_inclusive_scan_example() {
    let (client, _device) = create_cpu_client();
    let input = [1i32, 2, 3, 4, 5, 6, 7, 8];
    let mut output = [0i32; 8];

    let end = client.inclusive_scan(&input, &mut output, |a, b| a + b).unwrap();

    assert_eq!(end, 8);
    assert_eq!(output, [1, 3, 6, 10, 15, 21, 28, 36]);
}

#[test]
fn test_exclusive_scan_example() {
    let (client, _device) = create_cpu_client();
    let input = [1i32, 2, 3, 4, 5, 6, 7, 8];
    let mut output = [0i32; 8];

    let end = client
        .exclusive_scan(&input, &mut output, 0, |a, b| a + b)
        .unwrap();

    assert_eq!(end, 8);
    assert_eq!(output, [0, 1, 3, 6, 10, 15, 21, 28]);
}

#[test]
fn test_crate_level_functions() {
    let input = [3u8, 1, 4, 1, 5, 9, 2, 6];
    let mut output = [0u8; 8];

    warpscan::inclusive_scan(&input, &mut output, |a, b| a.max(b)).unwrap();
    assert_eq!(output, [3, 3, 4, 4, 5, 9, 9, 9]);

    warpscan::exclusive_scan(&input, &mut output, 0, |a, b| a.max(b)).unwrap();
    assert_eq!(output, [0, 3, 3, 4, 4, 5, 9, 9]);
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_empty_input_is_noop() {
    let (client, _device) = create_cpu_client();
    let input: [u32; 0] = [];
    let mut output = [7u32; 3];

    let end = client.inclusive_scan(&input, &mut output, |a, b| a + b).unwrap();
    assert_eq!(end, 0);
    assert_eq!(output, [7, 7, 7]);

    let end = client
        .exclusive_scan(&input, &mut output, 1, |a, b| a + b)
        .unwrap();
    assert_eq!(end, 0);
    assert_eq!(output, [7, 7, 7]);

    let mut data: [u32; 0] = [];
    assert_eq!(client.inclusive_scan_in_place(&mut data, |a, b| a + b).unwrap(), 0);
}

#[test]
fn test_single_element() {
    let (client, _device) = create_cpu_client();
    let mut output = [0i64; 1];

    client.inclusive_scan(&[42], &mut output, |a, b| a * b).unwrap();
    assert_eq!(output, [42]);

    client.exclusive_scan(&[42], &mut output, -5, |a, b| a * b).unwrap();
    assert_eq!(output, [-5]);
}

#[test]
fn test_longer_output_tail_untouched() {
    let (client, _device) = create_cpu_client();
    let input: Vec<u32> = (1..=100).collect();
    let mut output = vec![u32::MAX; 130];

    let end = client.inclusive_scan(&input, &mut output, |a, b| a + b).unwrap();

    assert_eq!(end, 100);
    assert_eq!(output[99], 5050);
    assert!(output[100..].iter().all(|&v| v == u32::MAX));
}

// ============================================================================
// Boundary Lengths
// ============================================================================

/// Lengths just around chunk and interval boundaries
fn boundary_lengths() -> Vec<usize> {
    let mut lengths = Vec::new();
    for k in [1, 2, 3, 7, 8, 9, 31, 32, 33, 100, 257] {
        lengths.push(k * WARP_SIZE - 1);
        lengths.push(k * WARP_SIZE);
        lengths.push(k * WARP_SIZE + 1);
    }
    lengths
}

#[test]
fn test_boundary_lengths_all_operators() {
    // 2 workers x 256 lanes = 2 blocks = 16 groups, so long inputs iterate.
    let device = CpuDevice::new().with_workers(2).with_lanes_per_worker(256);
    let client = CpuRuntime::default_client(&device);

    let ops: [(&str, fn(u32, u32) -> u32, u32); 6] = [
        ("add", |a, b| a.wrapping_add(b), 0),
        ("min", |a, b| a.min(b), u32::MAX),
        ("max", |a, b| a.max(b), 0),
        ("and", |a, b| a & b, u32::MAX),
        ("or", |a, b| a | b, 0),
        ("xor", |a, b| a ^ b, 0),
    ];

    for n in boundary_lengths() {
        let input: Vec<u32> = random_u64(n, u32::MAX as u64, n as u64)
            .into_iter()
            .map(|v| v as u32)
            .collect();
        let mut output = vec![0u32; n];

        for (name, op, identity) in ops {
            client.inclusive_scan(&input, &mut output, op).unwrap();
            assert_eq!(output, reference_inclusive(&input, op), "inclusive {name} n={n}");

            client
                .exclusive_scan(&input, &mut output, identity, op)
                .unwrap();
            assert_eq!(
                output,
                reference_exclusive(&input, identity, op),
                "exclusive {name} n={n}"
            );
        }
    }
}

#[test]
fn test_exclusive_nonidentity_init() {
    let client = create_client_with(3, ScanOptions::default());
    for n in boundary_lengths() {
        let input = random_u64(n, 1000, 7 + n as u64);
        let mut output = vec![0u64; n];
        client
            .exclusive_scan(&input, &mut output, 1_000_000, |a, b| a + b)
            .unwrap();
        assert_eq!(output, reference_exclusive(&input, 1_000_000, |a, b| a + b), "n={n}");
    }
}

// ============================================================================
// Large Inputs
// ============================================================================

#[test]
fn test_million_elements_integer_exact() {
    let (client, _device) = create_cpu_client();
    let n = 1 << 20;
    let input = random_u64(n, 1000, 42);
    let mut output = vec![0u64; n];

    client.inclusive_scan(&input, &mut output, |a, b| a + b).unwrap();
    assert_eq!(output, reference_inclusive(&input, |a, b| a + b));

    client
        .exclusive_scan(&input, &mut output, 0, |a, b| a + b)
        .unwrap();
    assert_eq!(output, reference_exclusive(&input, 0, |a, b| a + b));
}

#[test]
fn test_odd_length_large_input() {
    let (client, _device) = create_cpu_client();
    let n = 3_000_017;
    let input = random_u64(n, 1 << 20, 9);
    let mut output = vec![0u64; n];

    client.inclusive_scan(&input, &mut output, |a, b| a ^ b).unwrap();
    assert_eq!(output, reference_inclusive(&input, |a, b| a ^ b));
}

#[test]
fn test_float_sum_within_tolerance() {
    let (client, _device) = create_cpu_client();
    let n = 1_000_003;
    let input = random_f64(n, 3);
    let mut output = vec![0.0f64; n];

    client.inclusive_scan(&input, &mut output, |a, b| a + b).unwrap();

    // Reassociation error grows with the number of terms.
    let rtol = 4.0 * n as f64 * f64::EPSILON;
    assert_allclose_f64(
        &output,
        &reference_inclusive(&input, |a, b| a + b),
        rtol,
        1e-12,
        "float inclusive sum",
    );
}

#[test]
fn test_f32_small_sum_exact() {
    // Small integers are exact in f32, so reassociation cannot change them.
    let (client, _device) = create_cpu_client();
    let input: Vec<f32> = (0..5000).map(|i| (i % 3) as f32).collect();
    let mut output = vec![0.0f32; input.len()];
    client.inclusive_scan(&input, &mut output, |a, b| a + b).unwrap();
    assert_eq!(output, reference_inclusive(&input, |a, b| a + b));
}

// ============================================================================
// Ordering and Aliasing
// ============================================================================

#[test]
fn test_non_commutative_operator_keeps_order() {
    let client = create_client_with(4, ScanOptions::default().with_max_groups(5));
    for n in [1, 33, 160, 1000, 12_345] {
        let input = random_affine(n, n as u64);
        let mut output = vec![Affine::IDENTITY; n];

        client.inclusive_scan(&input, &mut output, Affine::then).unwrap();
        assert_eq!(output, reference_inclusive(&input, Affine::then), "inclusive n={n}");

        client
            .exclusive_scan(&input, &mut output, Affine::IDENTITY, Affine::then)
            .unwrap();
        assert_eq!(
            output,
            reference_exclusive(&input, Affine::IDENTITY, Affine::then),
            "exclusive n={n}"
        );
    }
}

#[test]
fn test_in_place_matches_out_of_place() {
    let (client, _device) = create_cpu_client();
    for n in [1, 31, 32, 33, 4096, 100_001] {
        let input = random_u64(n, 1 << 30, 11 * n as u64);

        let mut expected = vec![0u64; n];
        client.inclusive_scan(&input, &mut expected, |a, b| a + b).unwrap();
        let mut data = input.clone();
        let end = client.inclusive_scan_in_place(&mut data, |a, b| a + b).unwrap();
        assert_eq!(end, n);
        assert_eq!(data, expected, "inclusive n={n}");

        client
            .exclusive_scan(&input, &mut expected, 5, |a, b| a + b)
            .unwrap();
        let mut data = input.clone();
        client
            .exclusive_scan_in_place(&mut data, 5, |a, b| a + b)
            .unwrap();
        assert_eq!(data, expected, "exclusive n={n}");
    }
}

#[test]
fn test_repeated_scans_on_one_client() {
    let (client, _device) = create_cpu_client();
    let mut data = vec![1u64; 10_000];
    client.inclusive_scan_in_place(&mut data, |a, b| a + b).unwrap();
    client.inclusive_scan_in_place(&mut data, |a, b| a + b).unwrap();
    // Second scan of 1, 2, 3, ... gives triangular numbers.
    for (i, &v) in data.iter().enumerate() {
        let k = i as u64 + 1;
        assert_eq!(v, k * (k + 1) / 2);
    }
}
