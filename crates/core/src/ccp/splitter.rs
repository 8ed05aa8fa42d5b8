//! Unstable-component splitting: branching over CROSS reticulations whose
//! representative leaf disagrees about membership in `B`.
//!
//! A component that is not [`super::resolver::is_stable`] has no LEAF and
//! no settled INNER reticulation anywhere in its subtree — every frontier
//! reticulation is still CROSS, so there is no way to collapse it to a
//! single tree yet. Instead the driver picks, for each CROSS reticulation
//! whose representative leaf already disagrees with `B`, which of its
//! parent edges "wins": does this component keep the reticulation (commit
//! it IN, cutting every other component's edge into it) or give it up
//! (commit it OUT, cutting just this component's edge)? Both choices are
//! explored, since there is no way to know in advance which one a
//! satisfying assignment needs. Before either clone is worth descending
//! into, an upward feasibility walk from each reticulation it just gave up
//! checks whether that choice is even locally consistent with `B` — a
//! provably infeasible clone is pruned without recursing, and if both
//! clones are infeasible the whole component fails right here.

use super::state::{RetFlag, SearchState};
use super::CcpOutcome;
use crate::components::{ArenaIdx, Component, ComponentArena, ComponentOwner, ComponentSet};
use crate::error::Result;
use crate::model::{LeafSet, Network, VertexKind};
use std::collections::{HashMap, HashSet};

/// Every CROSS reticulation reachable from `root` through this component's
/// own subtree, paired with the network vertex that is its parent *within
/// this component*.
fn collect_cross_frontier(network: &Network, arena: &ComponentArena, root: ArenaIdx, state: &SearchState) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    walk(network, arena, root, network.root(), state, &mut out);
    out
}

fn walk(network: &Network, arena: &ComponentArena, idx: ArenaIdx, via_parent: usize, state: &SearchState, out: &mut Vec<(usize, usize)>) {
    let v = arena.node(idx).vertex;
    if arena.is_leaf(idx) {
        if matches!(network.kind(v), VertexKind::Ret) && state.flag.get(&v) == Some(&RetFlag::Cross) {
            out.push((v, via_parent));
        }
        return;
    }
    for &child in &arena.node(idx).children {
        walk(network, arena, child, v, state, out);
    }
}

fn component_owner_vertex(network: &Network, component: &Component) -> usize {
    match component.owner {
        ComponentOwner::Ret(r) => r,
        ComponentOwner::Root => network.root(),
    }
}

/// Commit `r` fully into this component: cut every parent edge *except*
/// the one(s) belonging to this component.
fn commit_in(network: &Network, state: &mut SearchState, r: usize, this_parents: &[usize]) {
    state.flag.insert(r, RetFlag::Inner);
    state.super_deg.insert(r, 1);
    for &p in network.parents(r) {
        if !this_parents.contains(&p) {
            state.adjacency.remove(p, r);
        }
    }
}

/// Give `r` up from this component: cut this component's own edge(s) into
/// it, leaving it live for whichever other component still references it.
fn commit_out(network: &Network, state: &mut SearchState, r: usize, this_parents: &[usize]) {
    let _ = network;
    let current = state.super_deg.get(&r).copied().unwrap_or(1);
    let remaining = current.saturating_sub(1).max(1);
    state.super_deg.insert(r, remaining);
    state.flag.insert(r, if remaining <= 1 { RetFlag::Inner } else { RetFlag::Cross });
    for &p in this_parents {
        state.adjacency.remove(p, r);
    }
}

/// Upward feasibility walk from a just-committed reticulation `r`: checks
/// whether `r`'s own live parents (stopping at, but not examining past, a
/// ROOT parent) are still consistent with membership in `b` under
/// `indicator`. Mirrors `To_Run_Network`/`Count_Parent` in the original
/// source: `indicator` is the membership `r`'s surviving side needs every
/// TREE ancestor's subtree to agree with (`true` for the kept/"plus" side,
/// `false` for the given-up/"minus" side).
fn to_run_network(network: &Network, state: &SearchState, b: &LeafSet, r: usize, indicator: bool) -> bool {
    let curr_leaf = match state.lf_below.get(&r).copied().flatten() {
        Some(l) => l,
        None => return true,
    };
    for &p in network.parents(r) {
        if !state.adjacency.get(p, r) {
            continue;
        }
        if matches!(network.kind(p), VertexKind::Root) {
            break;
        }
        if !is_feasible_node(network, state, b, p, curr_leaf, indicator) {
            return false;
        }
    }
    true
}

/// Whether every live child of `parent` other than `curr_leaf` is still
/// consistent with `indicator`. A TREE/ROOT child recurses (the "continuing"
/// variant: a later sibling can still veto after an earlier one passed,
/// rather than the walk stopping at the first successful recursion). A RET
/// child with two or more live parents and no settled representative leaf
/// can still go either way, so it cannot make `parent` infeasible on its
/// own — the walk returns feasible immediately, matching `Is_Feasible_Node`'s
/// early `return true` for an untreated multi-parent reticulation.
fn is_feasible_node(network: &Network, state: &SearchState, b: &LeafSet, parent: usize, curr_leaf: usize, indicator: bool) -> bool {
    for &child in network.children(parent) {
        if !state.adjacency.get(parent, child) || child == curr_leaf {
            continue;
        }
        match network.kind(child) {
            VertexKind::Ret => {
                let l_below = state.lf_below.get(&child).copied().flatten();
                if l_below == Some(curr_leaf) {
                    continue;
                }
                let num_parent = network.parents(child).iter().filter(|&&pp| state.adjacency.get(pp, child)).count();
                if num_parent >= 2 && l_below.is_none() {
                    return true;
                }
                if num_parent <= 1 {
                    let member = l_below.map(|l| b.contains(l)).unwrap_or(false);
                    if member == indicator {
                        return false;
                    }
                }
            }
            VertexKind::Leaf => {
                if b.contains(child) == indicator {
                    return false;
                }
            }
            VertexKind::Tree | VertexKind::Root => {
                if !is_feasible_node(network, state, b, child, curr_leaf, indicator) {
                    return false;
                }
            }
        }
    }
    true
}

/// Null out every reticulation's `lf_below` that currently points at `rep`
/// (it is about to become this component's own representative, so no
/// other entry should still claim it), then assign `rep` to the owner and
/// clear it from every reticulation being absorbed here.
fn adopt_representative(state: &mut SearchState, owner: ComponentOwner, rep: Option<usize>, absorbed: &[usize]) {
    match (owner, rep) {
        (ComponentOwner::Ret(p), Some(l)) => {
            for v in state.lf_below.values_mut() {
                if *v == Some(l) {
                    *v = None;
                }
            }
            state.lf_below.insert(p, Some(l));
        }
        (ComponentOwner::Ret(p), None) => {
            state.lf_below.insert(p, None);
        }
        (ComponentOwner::Root, _) => {}
    }
    for &r in absorbed {
        state.lf_below.insert(r, None);
    }
}

/// Split one unstable component into the "kept" (`+`) and "given up" (`-`)
/// branches over every disagreeing CROSS reticulation, recursing into
/// `continue_with` for each. `continue_with` carries on the search from
/// the next component index with the given `(state, b)`.
pub fn split(
    network: &Network,
    components: &ComponentSet,
    comp_idx: usize,
    b: &LeafSet,
    state: &mut SearchState,
    continue_with: impl Fn(&mut SearchState, usize, &LeafSet) -> Result<CcpOutcome>,
) -> Result<CcpOutcome> {
    let component = &components.components[comp_idx];
    let owner = component.owner;
    let owner_vertex = component_owner_vertex(network, component);

    let frontier = collect_cross_frontier(network, &components.arena, component.root, state);
    let mut this_parents: HashMap<usize, Vec<usize>> = HashMap::new();
    for &(r, p) in &frontier {
        this_parents.entry(r).or_default().push(p);
    }

    let mut rets_in: Vec<usize> = Vec::new();
    let mut rets_out: Vec<usize> = Vec::new();
    let mut lf_in: Vec<usize> = Vec::new();
    let mut lf_out: Vec<usize> = Vec::new();
    for &r in this_parents.keys() {
        if let Some(l) = state.lf_below.get(&r).copied().flatten() {
            if b.contains(l) {
                rets_in.push(r);
                if !lf_in.contains(&l) {
                    lf_in.push(l);
                }
            } else {
                rets_out.push(r);
                if !lf_out.contains(&l) {
                    lf_out.push(l);
                }
            }
        }
    }

    // Short-circuit: this component's definite-in leaves already exhaust B.
    if !lf_in.is_empty() && lf_in.len() == b.len() {
        return Ok(CcpOutcome::Success {
            witness: owner_vertex,
            branch_count: state.branch_count,
            adjacency: state.adjacency.clone(),
        });
    }

    // Nothing to branch on: cut this component's own edges (if it is a
    // reticulation's component) and move straight on.
    if rets_in.is_empty() && rets_out.is_empty() {
        if let ComponentOwner::Ret(p) = owner {
            for &parent in network.parents(p).to_vec().iter() {
                state.adjacency.remove(parent, p);
            }
        }
        return continue_with(state, comp_idx + 1, b);
    }

    state.branch_count += 1;
    let mut plus = state.clone();
    let mut minus = state.clone();

    for &r in &rets_in {
        let parents = &this_parents[&r];
        commit_in(network, &mut plus, r, parents);
        commit_out(network, &mut minus, r, parents);
    }
    for &r in &rets_out {
        let parents = &this_parents[&r];
        commit_out(network, &mut plus, r, parents);
        commit_in(network, &mut minus, r, parents);
    }

    let rep_plus = lf_in.first().copied();
    let rep_minus = lf_out.first().copied();
    adopt_representative(&mut plus, owner, rep_plus, &rets_in);
    adopt_representative(&mut minus, owner, rep_minus, &rets_out);

    // Feasibility pruning: the committed-out reticulations of each clone
    // must still admit a consistent upward walk against the original,
    // uncontracted `b` before either side is worth descending into.
    let run_plus = rets_out.iter().all(|&r| to_run_network(network, &plus, b, r, true));
    let run_minus = rets_in.iter().all(|&r| to_run_network(network, &minus, b, r, false));
    if !run_plus && !run_minus {
        return Ok(CcpOutcome::Fail {
            branch_count: plus.branch_count,
        });
    }

    let b_plus = if lf_in.len() > 1 {
        let rep = lf_in[0];
        let drop: HashSet<usize> = lf_in[1..].iter().copied().collect();
        b.restricted_to(|i| !drop.contains(&i) || i == rep)
    } else {
        b.clone()
    };

    let plus_outcome = if run_plus {
        continue_with(&mut plus, comp_idx + 1, &b_plus)?
    } else {
        CcpOutcome::Fail {
            branch_count: plus.branch_count,
        }
    };
    if plus_outcome.is_cluster() {
        return Ok(plus_outcome);
    }
    if run_minus {
        return continue_with(&mut minus, comp_idx + 1, b);
    }
    Ok(plus_outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::build_components;
    use crate::model::{LeafSet, NetworkBuilder};

    fn edge(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    fn vertex(net: &Network, label: &str) -> usize {
        (0..net.vertex_count()).find(|&v| net.label(v) == label).unwrap()
    }

    /// `r` has parents `p` and `q`; `p` also reaches `leafA`, `q` also
    /// reaches `leafB`. `r`'s own child is the leaf `leafR`, so it starts
    /// out already treated.
    fn two_parent_network() -> Network {
        NetworkBuilder::from_edges(&[
            edge("root", "p"),
            edge("root", "q"),
            edge("p", "leafA"),
            edge("p", "r"),
            edge("q", "r"),
            edge("q", "leafB"),
            edge("r", "leafR"),
        ])
        .unwrap()
    }

    #[test]
    fn giving_up_r_to_q_is_infeasible_when_qs_other_leaf_must_be_out() {
        let net = two_parent_network();
        let components = build_components(&net).unwrap();
        let mut state = SearchState::new(&net, &components.ret_table);
        let p = vertex(&net, "p");
        let q = vertex(&net, "q");
        let r = vertex(&net, "r");
        let leaf_b = net.leaf_index("leafB").unwrap();

        // `p`'s component gave `r` up to `q`: cut the p->r edge.
        state.adjacency.remove(p, r);

        // `b` excludes leafB, but the walk up from r through q demands
        // every sibling be *out* of b (indicator = true) only when that
        // matches membership — here leafB is out, consistent with
        // indicator = true, so the walk is feasible.
        let b_without_leaf_b = LeafSet::from_indices(net.leaf_count(), net.leaf_index("leafA").into_iter());
        assert!(to_run_network(&net, &state, &b_without_leaf_b, r, true));

        // If leafB is instead *in* b, that contradicts indicator = true and
        // the walk up through q is infeasible.
        let b_with_leaf_b = LeafSet::from_indices(net.leaf_count(), [leaf_b].into_iter());
        assert!(!to_run_network(&net, &state, &b_with_leaf_b, r, true));
    }

    /// Extends [`two_parent_network`] with a second reticulation `r2`
    /// hanging off `q`, sharing parent `c`. While `r2` is still untreated
    /// and has two live parents, it cannot make `q` infeasible for any
    /// sibling's sake — the walk must return feasible immediately.
    fn network_with_untreated_sibling_reticulation() -> Network {
        NetworkBuilder::from_edges(&[
            edge("root", "p"),
            edge("root", "q"),
            edge("root", "c"),
            edge("p", "leafA"),
            edge("p", "r"),
            edge("q", "r"),
            edge("q", "r2"),
            edge("c", "r2"),
            edge("r", "leafR"),
            edge("r2", "leafR2"),
        ])
        .unwrap()
    }

    #[test]
    fn an_untreated_multi_parent_sibling_reticulation_cannot_veto() {
        let net = network_with_untreated_sibling_reticulation();
        let components = build_components(&net).unwrap();
        let mut state = SearchState::new(&net, &components.ret_table);
        let p = vertex(&net, "p");
        let q = vertex(&net, "q");
        let r = vertex(&net, "r");
        let r2 = vertex(&net, "r2");

        state.adjacency.remove(p, r);
        // Force r2 untreated, regardless of how it was classified.
        state.lf_below.insert(r2, None);

        // An empty b would otherwise make every leaf sibling infeasible
        // under indicator = true, but r2 short-circuits before any leaf
        // under it is even considered.
        let empty = LeafSet::empty(net.leaf_count());
        assert!(to_run_network(&net, &state, &empty, r, true));
    }
}
