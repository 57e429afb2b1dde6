//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use oems_rs::network::{NetworkRuntime, Topology, Value, NETWORK_NODES};

/// A runtime over the standard network
pub fn runtime() -> NetworkRuntime {
    NetworkRuntime::new(Topology::odd_even_merge_8(), NETWORK_NODES)
        .expect("standard topology should validate")
}

/// Assert `output` is non-decreasing and a permutation of `input`
pub fn assert_sorted_permutation(input: &[Value], output: &[Value]) {
    assert!(
        output.windows(2).all(|w| w[0] <= w[1]),
        "Output {:?} is not sorted (input {:?})",
        output,
        input
    );
    let mut expected = input.to_vec();
    expected.sort_unstable();
    let mut actual = output.to_vec();
    actual.sort_unstable();
    assert_eq!(actual, expected, "Output is not a permutation of the input");
}
