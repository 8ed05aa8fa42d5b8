//! Reticulation classification: INNER vs. CROSS.
//!
//! A reticulation's parent edges are INNER when every parent belongs to the
//! same tree component — cutting any one of them is a purely local decision
//! that cannot affect any other component's connectivity. They are CROSS
//! when the parents are spread across more than one component — which
//! parent edge survives changes which component ends up containing `r`'s
//! subtree, so the CCP driver must branch over the choice.
//!
//! Classification walks up each parent, skipping TREE nodes (a TREE vertex
//! has exactly one parent, so the walk is unambiguous), until reaching a
//! RET or ROOT — that destination vertex, not any `component_of` lookup, is
//! the element of P′(r) the spec defines. A parent that is *already* RET or
//! ROOT is its own destination; in particular a RET directly parenting
//! another RET ("stacked" reticulations, not rejected at validation) counts
//! that RET itself as a distinct element of P′(r), exactly as the original
//! source's `Is_Inner_Revised` does by stopping its `while
//! node_type==TREE` walk the instant it meets a non-TREE parent. Using
//! `component_of` instead would undercount here: RET vertices are never
//! keyed in that map (they own their own component rather than belonging to
//! one), so a RET parent would simply vanish from the set instead of
//! contributing its own identity.

use crate::model::{Network, VertexKind};
use std::collections::HashSet;

/// How a reticulation's parent edges relate to the component partition, as
/// computed once at classification time (before any search branch has
/// committed or cut anything).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetFlag {
    /// Every parent lies in the same component.
    Inner,
    /// The parents are split across more than one component.
    Cross,
}

/// One reticulation's static bookkeeping: its vertex, its parent edges, and
/// its classification/super-degree as computed once from the network's
/// structure. Per-search mutable state (the flag can transition through
/// `Revised` and back, `super_deg` can shrink, parent edges can be cut) is
/// tracked separately in [`crate::ccp::state::SearchState`], keyed by this
/// vertex.
#[derive(Debug, Clone)]
pub struct RetInfo {
    /// Network vertex index of this reticulation.
    pub vertex: usize,
    /// Every parent vertex, in the network's original parent order.
    pub parents: Vec<usize>,
    pub initial_flag: RetFlag,
    /// Number of distinct tree components containing `vertex` as a frontier
    /// leaf, before any edge has been cut.
    pub initial_super_deg: usize,
}

/// Per-reticulation classification table, indexed in the same level order
/// as the component list that owns each reticulation's component.
#[derive(Debug, Clone, Default)]
pub struct RetTable {
    entries: Vec<RetInfo>,
}

impl RetTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetInfo> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> &RetInfo {
        &self.entries[index]
    }

    /// Index of the entry for reticulation vertex `v`, if tracked.
    pub fn position_of(&self, v: usize) -> Option<usize> {
        self.entries.iter().position(|e| e.vertex == v)
    }

    pub fn push(&mut self, info: RetInfo) {
        self.entries.push(info);
    }
}

/// Walk up from `start` through TREE vertices (each has exactly one parent)
/// until reaching a RET or ROOT vertex, and return that vertex. If `start`
/// is itself RET or ROOT, it is its own destination.
fn skip_tree_ancestors(network: &Network, start: usize) -> usize {
    let mut cur = start;
    while matches!(network.kind(cur), VertexKind::Tree) {
        let parents = network.parents(cur);
        debug_assert_eq!(parents.len(), 1, "a TREE vertex has exactly one parent");
        cur = parents[0];
    }
    cur
}

/// Classify every reticulation in `ret_nodes` by walking each parent up to
/// its nearest RET/ROOT ancestor (skipping TREE vertices) and collecting
/// the distinct destinations reached — P′(r) in the spec's notation.
pub fn classify_reticulations(network: &Network, ret_nodes: &[usize]) -> RetTable {
    let mut table = RetTable::default();
    for &r in ret_nodes {
        let parents = network.parents(r).to_vec();
        debug_assert!(parents.len() >= 2, "a RET vertex has indegree > 1");
        let destinations: HashSet<usize> = parents.iter().map(|&p| skip_tree_ancestors(network, p)).collect();
        let initial_super_deg = destinations.len().max(1);
        let initial_flag = if destinations.len() <= 1 { RetFlag::Inner } else { RetFlag::Cross };
        table.push(RetInfo {
            vertex: r,
            parents,
            initial_flag,
            initial_super_deg,
        });
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Network, NetworkBuilder};

    fn edge(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    /// `r1`'s only child is `r2`, itself a reticulation with a second
    /// parent `c`. `r2`'s P′ must count `r1` itself as a distinct
    /// ancestor, even though `r1` never roots or belongs to a tree
    /// component the way a TREE/ROOT vertex does.
    fn stacked_reticulation_network() -> Network {
        NetworkBuilder::from_edges(&[
            edge("root", "a"),
            edge("root", "b"),
            edge("root", "c"),
            edge("a", "r1"),
            edge("b", "r1"),
            edge("r1", "r2"),
            edge("c", "r2"),
            edge("r2", "leafx"),
        ])
        .unwrap()
    }

    #[test]
    fn a_reticulation_directly_parenting_another_is_cross() {
        let net = stacked_reticulation_network();
        let ret_nodes = net.ret_nodes();
        assert_eq!(ret_nodes.len(), 2, "r1 and r2 are both reticulations");

        let table = classify_reticulations(&net, &ret_nodes);

        // r2 is the one whose parents include a RET vertex (r1) directly.
        let r2 = ret_nodes
            .iter()
            .copied()
            .find(|&v| net.parents(v).iter().any(|&p| matches!(net.kind(p), VertexKind::Ret)))
            .expect("one reticulation has a reticulation parent");
        let r2_info = table.iter().find(|info| info.vertex == r2).unwrap();
        assert_eq!(r2_info.initial_flag, RetFlag::Cross, "r1 and c are distinct P'(r2) destinations");
        assert_eq!(r2_info.initial_super_deg, 2);

        // r1 itself is unaffected: both its parents (a, b) walk up through
        // TREE vertices to the same root, so it stays INNER.
        let r1 = ret_nodes.iter().copied().find(|&v| v != r2).unwrap();
        let r1_info = table.iter().find(|info| info.vertex == r1).unwrap();
        assert_eq!(r1_info.initial_flag, RetFlag::Inner);
    }
}
