use phylonet_core::model::{Network, NetworkBuilder};
use phylonet_core::options::SrfdOptions;
use phylonet_core::srfd;

fn edge(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

fn tree_a() -> Network {
    NetworkBuilder::from_edges(&[
        edge("r", "x"),
        edge("r", "y"),
        edge("x", "leaf1"),
        edge("x", "leaf2"),
        edge("y", "leaf3"),
        edge("y", "leaf4"),
    ])
    .unwrap()
}

fn tree_b_different_topology() -> Network {
    NetworkBuilder::from_edges(&[
        edge("r", "x"),
        edge("r", "y"),
        edge("x", "leaf1"),
        edge("x", "leaf3"),
        edge("y", "leaf2"),
        edge("y", "leaf4"),
    ])
    .unwrap()
}

#[test]
fn identical_trees_have_zero_distance() {
    let net = tree_a();
    let d = srfd::distance(&net, &net, &SrfdOptions { parallel: false }).unwrap();
    assert_eq!(d, 0.0);
}

#[test]
fn differently_shaped_trees_have_nonzero_distance() {
    let a = tree_a();
    let b = tree_b_different_topology();
    let d = srfd::distance(&a, &b, &SrfdOptions { parallel: false }).unwrap();
    assert!(d > 0.0, "trees with different clusters must have nonzero soft RF distance");
}

#[test]
fn sequential_and_parallel_options_agree() {
    let a = tree_a();
    let b = tree_b_different_topology();
    let sequential = srfd::distance(&a, &b, &SrfdOptions { parallel: false }).unwrap();
    let parallel = srfd::distance(&a, &b, &SrfdOptions { parallel: true }).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn mismatched_leaf_sets_are_rejected() {
    let a = tree_a();
    let b = NetworkBuilder::from_edges(&[edge("r", "leaf1"), edge("r", "leafX")]).unwrap();
    let err = srfd::distance(&a, &b, &SrfdOptions::default()).unwrap_err();
    assert!(matches!(err, phylonet_core::PhyloError::LeafSetMismatch));
}
