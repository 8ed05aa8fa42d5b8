use phylonet_core::ccp;
use phylonet_core::model::{LeafSet, Network, NetworkBuilder};

/// A network with a single reticulation (vertex `6`) feeding `leaf1`,
/// nested under a tree-shaped rest of the network.
///
/// ```text
///          1
///        /   \
///       2     3
///       |    / \
///       6 --'   4
///       |      / \
///     leaf1   5  leaf4
///            / \
///        leaf2 leaf3
/// ```
fn reference_network() -> Network {
    let edge = |a: &str, b: &str| (a.to_string(), b.to_string());
    let edges = vec![
        edge("1", "2"),
        edge("1", "3"),
        edge("3", "4"),
        edge("4", "5"),
        edge("2", "6"),
        edge("3", "6"),
        edge("6", "leaf1"),
        edge("5", "leaf2"),
        edge("5", "leaf3"),
        edge("4", "leaf4"),
    ];
    NetworkBuilder::from_edges(&edges).unwrap()
}

fn leaves(net: &Network, labels: &[&str]) -> LeafSet {
    let indices = labels.iter().map(|l| net.leaf_index(l).unwrap());
    LeafSet::from_indices(net.leaf_count(), indices)
}

/// The network vertex carrying `label` (leaf or internal).
fn vertex(net: &Network, label: &str) -> usize {
    (0..net.vertex_count()).find(|&v| net.label(v) == label).unwrap()
}

#[test]
fn singleton_leaf_sets_are_always_clusters() {
    let net = reference_network();
    let b = leaves(&net, &["leaf1"]);
    let witness = vertex(&net, "leaf1");
    let outcome = ccp::contains(&net, &b).unwrap();
    assert!(outcome.is_cluster());
    assert_eq!(outcome.witness(), Some(witness));
}

#[test]
fn the_full_leaf_set_is_always_a_cluster() {
    let net = reference_network();
    let b = LeafSet::full(net.leaf_count());
    let outcome = ccp::contains(&net, &b).unwrap();
    assert!(outcome.is_cluster());
    assert_eq!(outcome.witness(), Some(net.root()));
}

#[test]
fn a_pure_tree_cluster_is_found_regardless_of_the_reticulation() {
    let net = reference_network();
    // {leaf2, leaf3, leaf4} matches vertex 4's descendants exactly — not
    // vertex 3's, even though 3 is also a superset, since the Vmax/DP scan
    // requires exact equality, not mere containment.
    let b = leaves(&net, &["leaf2", "leaf3", "leaf4"]);
    let witness = vertex(&net, "4");
    let outcome = ccp::contains(&net, &b).unwrap();
    assert!(outcome.is_cluster());
    assert_eq!(outcome.witness(), Some(witness));
}

#[test]
fn a_cluster_realized_by_one_reticulation_choice_is_found() {
    let net = reference_network();
    // {leaf2, leaf3} matches vertex 5's descendants exactly, independent of
    // which of reticulation 6's parent edges survives.
    let b = leaves(&net, &["leaf2", "leaf3"]);
    let witness = vertex(&net, "5");
    let outcome = ccp::contains(&net, &b).unwrap();
    assert!(outcome.is_cluster());
    assert_eq!(outcome.witness(), Some(witness));
}

#[test]
fn a_leaf_set_matching_no_node_under_either_reticulation_choice_fails() {
    let net = reference_network();
    // {leaf1, leaf2} never coincides with any node's full leaf set under
    // either choice of reticulation 6's surviving parent edge.
    let b = leaves(&net, &["leaf1", "leaf2"]);
    let outcome = ccp::contains(&net, &b).unwrap();
    assert!(!outcome.is_cluster());
}

#[test]
fn a_leaf_set_straddling_both_sides_of_the_reticulation_fails() {
    let net = reference_network();
    // {leaf2, leaf4} matches no node's descendant set under either choice
    // of reticulation 6.
    let b = leaves(&net, &["leaf2", "leaf4"]);
    let outcome = ccp::contains(&net, &b).unwrap();
    assert!(!outcome.is_cluster());
}

#[test]
fn contains_with_agrees_with_contains_on_a_shared_component_set() {
    let net = reference_network();
    let components = phylonet_core::components::build_components(&net).unwrap();
    let options = phylonet_core::options::CcpOptions::default();
    let b = leaves(&net, &["leaf2", "leaf3", "leaf4"]);
    let a = ccp::contains_with(&net, &components, &b, &options).unwrap();
    let b_outcome = ccp::contains(&net, &b).unwrap();
    assert_eq!(a.is_cluster(), b_outcome.is_cluster());
    assert_eq!(a.witness(), b_outcome.witness());
}

#[test]
fn a_deadline_in_the_past_cancels_the_search() {
    use phylonet_core::cancellation::Deadline;
    use phylonet_core::options::CcpOptions;
    use std::time::Duration;

    let net = reference_network();
    let components = phylonet_core::components::build_components(&net).unwrap();
    let options = CcpOptions::with_cancellation(Deadline::after(Duration::from_secs(0)));
    let b = leaves(&net, &["leaf1", "leaf2"]);
    std::thread::sleep(Duration::from_millis(5));
    let err = ccp::contains_with(&net, &components, &b, &options).unwrap_err();
    assert!(matches!(err, phylonet_core::PhyloError::Cancelled));
}
