//! Stable-component resolution: leaf substitution, Vmax marking, and the
//! row-scan DP that decides whether a stable component already realizes
//! the queried cluster by itself.
//!
//! A component is *stable* when its subtree already contains a network
//! LEAF, or an already-resolved INNER reticulation — in either case every
//! reticulation appearing on its frontier can be collapsed to a single
//! representative leaf without losing information relevant to this
//! component's own shape, so the whole question ("does some node's
//! descendant leaf-set equal `B` exactly?") reduces to a search over one
//! multi-labelled tree. [`is_stable`] is the gate the CCP driver uses to
//! decide whether a component goes through [`resolve`] here or through
//! [`super::splitter::split`] instead.

use super::state::{RetFlag, SearchState};
use super::CcpOutcome;
use crate::components::{Component, ComponentArena, ComponentOwner, ComponentSet};
use crate::error::Result;
use crate::model::{LeafSet, Network, VertexKind};
use std::collections::{HashMap, HashSet};

/// Whether `component`'s subtree already contains a network LEAF, or a
/// reticulation that is currently INNER with a settled representative leaf.
pub fn is_stable(network: &Network, arena: &ComponentArena, component: &Component, state: &SearchState) -> bool {
    for v in arena.leaves_below(component.root) {
        match network.kind(v) {
            VertexKind::Leaf => return true,
            VertexKind::Ret => {
                let inner = state.flag.get(&v) == Some(&RetFlag::Inner);
                let settled = state.lf_below.get(&v).copied().flatten().is_some();
                if inner && settled {
                    return true;
                }
            }
            other => unreachable!("frontier vertex {v} classified {other}, expected LEAF or RET"),
        }
    }
    false
}

/// One position of the multi-labelled substituted tree T(C). Built
/// bottom-up (every child index is strictly less than its parent's, since
/// [`build`] pushes children before the node that owns them), so computing
/// each node's descendant leaf-set is a single linear pass with no
/// recursion needed.
struct SNode {
    /// The original network vertex this position stands for (a LEAF, a
    /// RET — resolved or still untreated — or a TREE/ROOT internal node).
    vertex: usize,
    /// `Some(leaf)` once this position has been resolved to a leaf label
    /// (a real LEAF, or a RET substituted via its `lf_below`); `None` for
    /// internal nodes and for untreated RET frontier positions.
    leaf: Option<usize>,
    children: Vec<usize>,
}

/// The bookkeeping [`build`]'s reticulation-substitution pass accumulates
/// alongside the substituted tree itself.
#[derive(Default)]
struct Subst {
    /// Every distinct leaf label appearing in T(C), whether from a real
    /// LEAF or an INNER-substituted reticulation.
    sleaves: HashSet<usize>,
    /// The subset of `sleaves` contributed by an INNER reticulation
    /// (tracked separately only for documentation purposes here — `ambig`
    /// is always a subset of `sleaves`, and Vmax marking scans `sleaves` as
    /// a whole).
    #[allow(dead_code)]
    ambig: HashSet<usize>,
    /// Leaf labels contributed by a CROSS (or super-degree > 2 REVISED)
    /// reticulation — negotiable, not part of `sleaves`.
    optional: HashSet<usize>,
    /// Leaf label -> the reticulation it stands in for, for every
    /// substituted frontier position.
    rpl_comp: HashMap<usize, usize>,
    /// Reticulation -> the network vertex that is its parent *within this
    /// component* (needed to tell "this component's edge" from "every
    /// other component's edge" during CR-in/CR-out cleanup).
    via_parent: HashMap<usize, usize>,
}

/// Walk `idx`'s subtree, substituting resolved reticulations with their
/// representative leaf, appending nodes to `nodes` in post-order. Returns
/// the new node's index.
fn build(arena: &ComponentArena, idx: crate::components::ArenaIdx, via_parent: usize, network: &Network, state: &mut SearchState, subst: &mut Subst, nodes: &mut Vec<SNode>) -> usize {
    let v = arena.node(idx).vertex;

    if arena.is_leaf(idx) {
        let snode = match network.kind(v) {
            VertexKind::Leaf => {
                subst.sleaves.insert(v);
                SNode { vertex: v, leaf: Some(v), children: Vec::new() }
            }
            VertexKind::Ret => {
                let r = v;
                subst.via_parent.insert(r, via_parent);
                match state.lf_below.get(&r).copied().flatten() {
                    None => SNode { vertex: r, leaf: None, children: Vec::new() },
                    Some(l) => {
                        subst.rpl_comp.insert(l, r);
                        let flag = *state.flag.get(&r).expect("every reticulation is tracked in SearchState");
                        match flag {
                            RetFlag::Inner => {
                                subst.sleaves.insert(l);
                                subst.ambig.insert(l);
                            }
                            RetFlag::Cross => {
                                state.flag.insert(r, RetFlag::Revised);
                                subst.optional.insert(l);
                            }
                            RetFlag::Revised => {
                                if state.super_deg.get(&r).copied().unwrap_or(1) > 2 {
                                    subst.optional.insert(l);
                                } else {
                                    subst.sleaves.insert(l);
                                    subst.ambig.insert(l);
                                }
                            }
                        }
                        SNode { vertex: r, leaf: Some(l), children: Vec::new() }
                    }
                }
            }
            other => unreachable!("frontier vertex {v} classified {other}, expected LEAF or RET"),
        };
        nodes.push(snode);
        return nodes.len() - 1;
    }

    let children: Vec<crate::components::ArenaIdx> = arena.node(idx).children.clone();
    let mut child_idxs = Vec::with_capacity(children.len());
    for child in children {
        child_idxs.push(build(arena, child, v, network, state, subst, nodes));
    }
    nodes.push(SNode { vertex: v, leaf: None, children: child_idxs });
    nodes.len() - 1
}

/// Every reticulation [`build`] substituted that transitioned to `Revised`
/// during this pass gets normalized once substitution is complete.
fn normalize_revised(subst: &Subst, state: &mut SearchState) {
    let touched: HashSet<usize> = subst.rpl_comp.values().copied().collect();
    for r in touched {
        if state.flag.get(&r) == Some(&RetFlag::Revised) {
            let sd = state.super_deg.get(&r).copied().unwrap_or(1);
            if sd > 2 {
                state.super_deg.insert(r, sd - 1);
                state.flag.insert(r, RetFlag::Cross);
            } else {
                state.super_deg.insert(r, 1);
                state.flag.insert(r, RetFlag::Inner);
            }
        }
    }
}

/// Each node's descendant leaf-label set, computed bottom-up in a single
/// linear pass (see [`SNode`]'s doc comment for why that's sound).
fn leaf_coverage(nodes: &[SNode], n_leaves: usize) -> Vec<LeafSet> {
    let mut coverage = Vec::with_capacity(nodes.len());
    for node in nodes {
        let set = if let Some(l) = node.leaf {
            LeafSet::singleton(n_leaves, l)
        } else if node.children.is_empty() {
            // Untreated RET frontier: opaque, contributes no known leaf.
            LeafSet::empty(n_leaves)
        } else {
            let mut acc = LeafSet::empty(n_leaves);
            for &c in &node.children {
                acc = acc.union(&coverage[c]);
            }
            acc
        };
        coverage.push(set);
    }
    coverage
}

/// Vmax marking: for every excluded sleaf `l`, mark the root-to-`l` path
/// top-down — flagging a node whenever exactly one child leads to `l`, and
/// stopping (flagging just that node) the moment more than one child does,
/// since `l` may occur more than once in a multi-labelled T(C) and the
/// walk can no longer tell which occurrence is "the" one. A node that ends
/// up unmarked can never have an excluded leaf below it through any path
/// the walk followed, so Vmax — the candidate region the DP searches — is
/// exactly the set of unmarked nodes: the unmarked children of marked
/// nodes *and everything below them*, not just their immediate frontier
/// (testing only the frontier misses genuine witnesses sitting deeper
/// inside an ambiguous frontier's subtree — see DESIGN.md).
fn marked_nodes(nodes: &[SNode], coverage: &[LeafSet], root: usize, sleaves: &HashSet<usize>, b: &LeafSet) -> Vec<bool> {
    let mut marked = vec![false; nodes.len()];
    for &l in sleaves {
        if !b.contains(l) {
            mark_path(nodes, coverage, root, l, &mut marked);
        }
    }
    marked
}

/// The row-scan DP, generalized to the full Vmax region: the first
/// unmarked node whose descendant leaf-set equals `b` exactly.
fn find_match(nodes: &[SNode], coverage: &[LeafSet], marked: &[bool], b: &LeafSet) -> Option<usize> {
    (0..nodes.len()).find(|&i| !marked[i] && coverage[i] == *b)
}

fn mark_path(nodes: &[SNode], coverage: &[LeafSet], idx: usize, l: usize, marked: &mut [bool]) {
    if nodes[idx].leaf.is_some() || nodes[idx].children.is_empty() {
        return;
    }
    let matching: Vec<usize> = nodes[idx].children.iter().copied().filter(|&c| coverage[c].contains(l)).collect();
    match matching.len() {
        1 => {
            marked[idx] = true;
            marked[matching[0]] = true;
            mark_path(nodes, coverage, matching[0], l, marked);
        }
        n if n > 1 => marked[idx] = true,
        _ => {}
    }
}

/// Cross-reticulation cleanup after a stable component settles ("CR-in"/
/// "CR-out"): for every optional reticulation `r`, cut either every
/// *other* component's edge into it (keeping only this component's) or
/// this component's own edge, depending on whether its representative leaf
/// is in `b`. `reset_lf_below_on_in` distinguishes CR-in (resets
/// `lf_below[r]` once `r` is fully absorbed here) from CR-out (leaves it
/// alone, since `r` may still be referenced downstream).
fn apply_cr(network: &Network, subst: &Subst, b: &LeafSet, state: &mut SearchState, reset_lf_below_on_in: bool) {
    for (&r, &via_parent) in &subst.via_parent {
        let l = match state.lf_below.get(&r).copied().flatten() {
            Some(l) => l,
            None => continue,
        };
        if !subst.optional.contains(&l) {
            continue;
        }
        if b.contains(l) {
            for &p in network.parents(r) {
                if p != via_parent {
                    state.adjacency.remove(p, r);
                }
            }
            if reset_lf_below_on_in {
                state.lf_below.insert(r, None);
            }
        } else {
            state.adjacency.remove(via_parent, r);
        }
    }
}

fn component_owner_vertex(network: &Network, component: &Component) -> usize {
    match component.owner {
        ComponentOwner::Ret(r) => r,
        ComponentOwner::Root => network.root(),
    }
}

/// Resolve one stable component against `b`, then either report a terminal
/// [`CcpOutcome`] or hand the (possibly contracted) leaf set to
/// `continue_with` to carry on with the next component.
pub fn resolve(
    network: &Network,
    components: &ComponentSet,
    comp_idx: usize,
    b: &LeafSet,
    state: &mut SearchState,
    continue_with: impl FnOnce(&mut SearchState, &LeafSet) -> Result<CcpOutcome>,
) -> Result<CcpOutcome> {
    let component = &components.components[comp_idx];
    let n_leaves = b.universe_size();
    let owner_vertex = component_owner_vertex(network, component);

    let mut nodes = Vec::new();
    let mut subst = Subst::default();
    let root_idx = build(&components.arena, component.root, owner_vertex, network, state, &mut subst, &mut nodes);
    normalize_revised(&subst, state);

    // (b) Trivial case: the whole component already collapses to one leaf.
    if subst.sleaves.len() == 1 && subst.optional.is_empty() {
        let only = *subst.sleaves.iter().next().expect("sleaves.len() == 1");
        if b.len() == 1 && b.contains(only) {
            return Ok(CcpOutcome::Success {
                witness: owner_vertex,
                branch_count: state.branch_count,
                adjacency: state.adjacency.clone(),
            });
        }
        if let ComponentOwner::Ret(p) = component.owner {
            state.lf_below.insert(p, Some(only));
        }
        return continue_with(state, b);
    }

    // (c)/(d) Vmax marking and the row-scan DP.
    let coverage = leaf_coverage(&nodes, n_leaves);
    let marked = marked_nodes(&nodes, &coverage, root_idx, &subst.sleaves, b);
    if let Some(v) = find_match(&nodes, &coverage, &marked, b) {
        // The search terminates on success: no CR cleanup is needed since
        // nothing downstream will ever be consulted again.
        return Ok(CcpOutcome::Success {
            witness: nodes[v].vertex,
            branch_count: state.branch_count,
            adjacency: state.adjacency.clone(),
        });
    }

    let all_out_b = subst.sleaves.iter().all(|&l| !b.contains(l));
    let all_in_b = subst.sleaves.iter().all(|&l| b.contains(l));

    if all_out_b {
        apply_cr(network, &subst, b, state, false);
        return continue_with(state, b);
    }

    if all_in_b {
        let optional_in_b: HashSet<usize> = subst.optional.iter().copied().filter(|&l| b.contains(l)).collect();
        let mut candidate: HashSet<usize> = subst.sleaves.clone();
        candidate.extend(optional_in_b);
        let b_members: HashSet<usize> = b.members().iter().copied().collect();
        if candidate == b_members {
            return Ok(CcpOutcome::Success {
                witness: owner_vertex,
                branch_count: state.branch_count,
                adjacency: state.adjacency.clone(),
            });
        }

        apply_cr(network, &subst, b, state, true);
        let mut sorted_sleaves: Vec<usize> = subst.sleaves.iter().copied().collect();
        sorted_sleaves.sort_unstable();
        let rep = sorted_sleaves[0];
        let drop: HashSet<usize> = subst.sleaves.union(&subst.optional).copied().collect();
        let contracted = b.restricted_to(|i| !drop.contains(&i) || i == rep);
        if let ComponentOwner::Ret(p) = component.owner {
            state.lf_below.insert(p, Some(rep));
        }
        return continue_with(state, &contracted);
    }

    // Straddles both B and its complement: no reticulation-edge choice can
    // make this component's definite leaves agree with B.
    Ok(CcpOutcome::Fail { branch_count: state.branch_count })
}
