//! The Cluster Containment Problem: does some reticulation-edge selection
//! of a network realize a given leaf set as a soft cluster?
//!
//! [`contains`] builds the network's [`ComponentSet`] fresh; callers
//! evaluating many leaf sets against the same network (chiefly
//! [`crate::srfd`]) should build it once with
//! [`crate::components::build_components`] and call [`contains_with`]
//! directly, since that construction is the only part of a CCP call whose
//! cost depends on the whole network rather than on `B`.
//!
//! The driver walks the level-ordered component list once, left to right:
//! a stable component goes through [`resolver::resolve`] — a single
//! multi-labelled-tree search that either settles the question on the spot
//! or contracts `B` and moves on — while an unstable component goes
//! through [`splitter::split`], which branches over its still-live CROSS
//! reticulations. Neither ever revisits an earlier component; each only
//! ever narrows `B` for the ones still ahead.

mod resolver;
mod splitter;
pub mod state;

use crate::cancellation::Cancellation;
use crate::components::{build_components, ComponentSet};
use crate::error::Result;
use crate::model::{AdjMatrix, LeafSet, Network};
use crate::options::CcpOptions;
use state::SearchState;

/// The result of a cluster containment query.
///
/// Both variants carry `branch_count`: the number of times the splitter
/// actually branched over a disagreeing cross-reticulation along the path
/// that produced this outcome, reported by the CLI as `no_break`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CcpOutcome {
    /// `B` is realized as a soft cluster under some reticulation-edge
    /// selection; `witness` is the network vertex whose descendant leaf
    /// set equals `B` under that selection. `adjacency` is the winning
    /// branch's final edge set (the reticulation-edge selection that
    /// realizes `B`), for the CLI's residual-tree printing.
    Success {
        witness: usize,
        branch_count: u32,
        adjacency: AdjMatrix,
    },
    /// No reticulation-edge selection realizes `B`.
    Fail { branch_count: u32 },
}

impl CcpOutcome {
    pub fn is_cluster(&self) -> bool {
        matches!(self, CcpOutcome::Success { .. })
    }

    /// The witness vertex, if this is a [`CcpOutcome::Success`].
    pub fn witness(&self) -> Option<usize> {
        match self {
            CcpOutcome::Success { witness, .. } => Some(*witness),
            CcpOutcome::Fail { .. } => None,
        }
    }

    /// The number of cross-reticulation branch points taken along the path
    /// that produced this outcome.
    pub fn branch_count(&self) -> u32 {
        match self {
            CcpOutcome::Success { branch_count, .. } => *branch_count,
            CcpOutcome::Fail { branch_count } => *branch_count,
        }
    }
}

/// Build `network`'s components and test whether `b` is one of its soft
/// clusters.
pub fn contains(network: &Network, b: &LeafSet) -> Result<CcpOutcome> {
    let components = build_components(network)?;
    contains_with(network, &components, b, &CcpOptions::default())
}

/// As [`contains`], reusing an already-built [`ComponentSet`] — the shape
/// SRFD's per-subset loop uses, since the component set depends only on
/// the network, not on `B`.
pub fn contains_with<C: Cancellation>(
    network: &Network,
    components: &ComponentSet,
    b: &LeafSet,
    options: &CcpOptions<C>,
) -> Result<CcpOutcome> {
    // Every singleton and the full leaf set are trivially clusters of any
    // network: the root's own soft cluster is the full leaf set, and every
    // leaf is its own trivial cluster.
    if b.len() == b.universe_size() {
        return Ok(CcpOutcome::Success {
            witness: network.root(),
            branch_count: 0,
            adjacency: network.adjacency_matrix(),
        });
    }
    if b.len() == 1 {
        return Ok(CcpOutcome::Success {
            witness: b.members()[0],
            branch_count: 0,
            adjacency: network.adjacency_matrix(),
        });
    }

    let mut state = SearchState::new(network, &components.ret_table);
    evaluate_from(network, components, 0, b, &mut state, &options.cancellation)
}

fn evaluate_from(
    network: &Network,
    components: &ComponentSet,
    index: usize,
    b: &LeafSet,
    state: &mut SearchState,
    cancellation: &impl Cancellation,
) -> Result<CcpOutcome> {
    cancellation.check()?;

    if index >= components.components.len() {
        return Ok(CcpOutcome::Fail { branch_count: state.branch_count });
    }

    let component = &components.components[index];
    tracing::trace!(index, owner = ?component.owner, size = component.size, "visiting component");

    if resolver::is_stable(network, &components.arena, component, state) {
        resolver::resolve(network, components, index, b, state, |state, next_b| {
            evaluate_from(network, components, index + 1, next_b, state, cancellation)
        })
    } else {
        splitter::split(network, components, index, b, state, |state, next_index, next_b| {
            evaluate_from(network, components, next_index, next_b, state, cancellation)
        })
    }
}
