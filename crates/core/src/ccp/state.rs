//! Per-search mutable state threaded through the CCP recursion.
//!
//! [`crate::components::ComponentSet`] (the arb-tree arena, the component
//! list, and each reticulation's static classification) is built once per
//! network and shared by reference across an entire CCP call, and across
//! every subset evaluated by [`crate::srfd`] — it never changes once built.
//! `SearchState` is the part that actually evolves branch to branch: each
//! reticulation's current `flag`/`super_deg`/`lf_below`, and the working
//! adjacency matrix edges get cut from as the resolver and splitter commit
//! decisions. Every field here is a flat `Vec`/`HashMap`/bitvec, so cloning
//! a `SearchState` at a splitter branch point is a handful of cheap
//! container clones, never a pointer-tree walk.

use crate::components::{RetFlag as StaticRetFlag, RetTable};
use crate::model::{AdjMatrix, Network, VertexKind};
use std::collections::HashMap;

/// A reticulation's classification as it evolves during one CCP search.
/// `Revised` is transient: it only appears between the moment a `Cross`
/// reticulation is substituted out of a stable component's tree and the
/// normalization step performed immediately afterward — no code outside
/// `resolver` ever observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetFlag {
    Inner,
    Cross,
    Revised,
}

impl From<StaticRetFlag> for RetFlag {
    fn from(f: StaticRetFlag) -> Self {
        match f {
            StaticRetFlag::Inner => RetFlag::Inner,
            StaticRetFlag::Cross => RetFlag::Cross,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchState {
    /// Reticulation vertex -> current classification.
    pub flag: HashMap<usize, RetFlag>,
    /// Reticulation vertex -> count of tree components still holding a live
    /// edge into it.
    pub super_deg: HashMap<usize, usize>,
    /// Reticulation vertex -> the leaf index currently representing it, or
    /// `None` if still untreated.
    pub lf_below: HashMap<usize, Option<usize>>,
    /// The network's edges, mutated (edges removed only) as branches commit
    /// to one parent of a reticulation over another.
    pub adjacency: AdjMatrix,
    /// Count of cross-reticulation branch points taken so far along this
    /// search path, reported by the CLI as `no_break`. Incremented once
    /// per actual splitter branch, inherited by both the `+`/`-` clones it
    /// produces.
    pub branch_count: u32,
}

impl SearchState {
    /// The initial state for a fresh CCP search: every reticulation's flag
    /// and super-degree as classified once per network, and `lf_below`
    /// seeded from whichever reticulations have a direct LEAF child.
    pub fn new(network: &Network, ret_table: &RetTable) -> Self {
        let mut flag = HashMap::with_capacity(ret_table.len());
        let mut super_deg = HashMap::with_capacity(ret_table.len());
        let mut lf_below = HashMap::with_capacity(ret_table.len());

        for info in ret_table.iter() {
            flag.insert(info.vertex, info.initial_flag.into());
            super_deg.insert(info.vertex, info.initial_super_deg);
            let child = network.children(info.vertex)[0];
            let initial = match network.kind(child) {
                VertexKind::Leaf => Some(child),
                _ => None,
            };
            lf_below.insert(info.vertex, initial);
        }

        Self {
            flag,
            super_deg,
            lf_below,
            adjacency: network.adjacency_matrix(),
            branch_count: 0,
        }
    }
}
