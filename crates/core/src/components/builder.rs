//! Tree-component construction and level ordering.
//!
//! Each reticulation `r` owns the tree component rooted at its unique
//! child: the maximal subtree reachable from that child through TREE
//! vertices, stopping at LEAF and RET frontier vertices. The network's
//! root owns one more, synthetic, component rooted at itself. Components
//! are level-ordered so that a component is only resolved once every
//! reticulation appearing as one of its frontier leaves has already been
//! resolved — this is a topological sort over the "RET reachable from RET"
//! dependency graph (the base case is every reticulation with no such
//! dependency, the inductive step is every following level), ties broken
//! by descending component size then by ascending vertex index
//! (first-appearance order, since non-leaf vertices keep their original
//! edge-list order through the leaf-front permutation in
//! `model::network`).

use super::arena::{ArbNode, ArenaIdx, ComponentArena};
use super::reticulation::{classify_reticulations, RetTable};
use crate::error::{PhyloError, Result};
use crate::model::{Network, VertexKind};
use std::collections::{HashMap, HashSet};

/// Which vertex a tree component is rooted at and "belongs to".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentOwner {
    /// Owned by a reticulation; rooted at that reticulation's unique child.
    Ret(usize),
    /// The synthetic component rooted at the network root.
    Root,
}

/// A tree component: one arb tree plus the bookkeeping the resolver and
/// splitter need.
#[derive(Debug, Clone)]
pub struct Component {
    pub owner: ComponentOwner,
    pub root: ArenaIdx,
    /// Total arb-tree node count.
    pub size: usize,
    /// Node count excluding RET frontier leaves.
    pub no_tree_node: usize,
}

impl Component {
    pub fn owner_vertex(&self) -> usize {
        match self.owner {
            ComponentOwner::Ret(r) => r,
            ComponentOwner::Root => usize::MAX,
        }
    }
}

/// Everything the CCP driver needs to begin a search: the level-ordered
/// component list, their shared arb-tree arena, and the reticulation
/// classification table.
#[derive(Debug, Clone)]
pub struct ComponentSet {
    pub arena: ComponentArena,
    pub components: Vec<Component>,
    pub ret_table: RetTable,
    /// Maps every TREE/ROOT vertex to the index of the tree component it
    /// belongs to. Used by the reticulation classifier and by the
    /// splitter to resolve which component a given parent edge feeds
    /// into.
    pub component_of: HashMap<usize, usize>,
}

/// Build every tree component and classify every reticulation.
///
/// Returns [`PhyloError::Cyclic`] if the reticulation dependency graph
/// cannot be fully ordered — which can only happen if the input is not
/// actually a DAG, since every acyclic network admits at least one level
/// order.
pub fn build_components(network: &Network) -> Result<ComponentSet> {
    let ret_nodes = network.ret_nodes();

    // Pass 1: build each reticulation's raw component (order-independent —
    // it depends only on network structure) so we can read off, for each
    // r, which other reticulations appear as its component's frontier
    // leaves.
    let mut raw_arena = ComponentArena::new();
    let mut raw_roots: HashMap<usize, ArenaIdx> = HashMap::with_capacity(ret_nodes.len());
    let mut raw_sizes: HashMap<usize, usize> = HashMap::with_capacity(ret_nodes.len());
    let mut depends_on: HashMap<usize, Vec<usize>> = HashMap::with_capacity(ret_nodes.len());

    for &r in &ret_nodes {
        let child = single_child(network, r);
        let (root_idx, size, _no_tree_node) = grow_component(&mut raw_arena, network, child);
        let deps: Vec<usize> = raw_arena
            .leaves_below(root_idx)
            .into_iter()
            .filter(|&v| matches!(network.kind(v), VertexKind::Ret))
            .collect();
        raw_roots.insert(r, root_idx);
        raw_sizes.insert(r, size);
        depends_on.insert(r, deps);
    }

    let ordered = level_order(&ret_nodes, &depends_on, &raw_sizes)?;

    // Pass 2: build the real arena and component list in level order, plus
    // the vertex -> component-index map the reticulation classifier needs.
    let mut arena = ComponentArena::new();
    let mut components = Vec::with_capacity(ordered.len() + 1);
    let mut component_of: HashMap<usize, usize> = HashMap::new();

    for &r in &ordered {
        let child = single_child(network, r);
        let (root_idx, size, no_tree_node) = grow_component(&mut arena, network, child);
        let comp_idx = components.len();
        tag_owned_vertices(&arena, root_idx, comp_idx, &mut component_of);
        components.push(Component {
            owner: ComponentOwner::Ret(r),
            root: root_idx,
            size,
            no_tree_node,
        });
    }

    let (root_idx, size, no_tree_node) = grow_component(&mut arena, network, network.root());
    let comp_idx = components.len();
    tag_owned_vertices(&arena, root_idx, comp_idx, &mut component_of);
    components.push(Component {
        owner: ComponentOwner::Root,
        root: root_idx,
        size,
        no_tree_node,
    });

    let ret_table = classify_reticulations(network, &ordered);

    Ok(ComponentSet {
        arena,
        components,
        ret_table,
        component_of,
    })
}

fn single_child(network: &Network, r: usize) -> usize {
    let children = network.children(r);
    debug_assert_eq!(children.len(), 1, "a RET vertex has exactly one child");
    children[0]
}

/// Grow one component's arb tree from `start_vertex`, returning its root
/// index, total node count, and non-RET node count.
fn grow_component(arena: &mut ComponentArena, network: &Network, start_vertex: usize) -> (ArenaIdx, usize, usize) {
    let root_idx = arena.push(start_vertex);
    let mut size = 1usize;
    let mut no_tree_node = if matches!(network.kind(start_vertex), VertexKind::Ret) { 0 } else { 1 };

    let mut stack = Vec::new();
    if matches!(network.kind(start_vertex), VertexKind::Tree | VertexKind::Root) {
        stack.push(root_idx);
    }

    while let Some(idx) = stack.pop() {
        let v = arena.node(idx).vertex;
        let children: Vec<usize> = network.children(v).to_vec();
        for child in children {
            let child_idx = arena.push(child);
            arena.node_mut(idx).children.push(child_idx);
            size += 1;
            if !matches!(network.kind(child), VertexKind::Ret) {
                no_tree_node += 1;
            }
            if matches!(network.kind(child), VertexKind::Tree) {
                stack.push(child_idx);
            }
        }
    }

    (root_idx, size, no_tree_node)
}

/// Record, for every TREE/ROOT vertex in the subtree rooted at `root`, that
/// it belongs to component `comp_idx`. RET and LEAF frontier vertices are
/// never tagged: they belong to their own component (or to none, for
/// leaves), not to the component that merely references them.
fn tag_owned_vertices(arena: &ComponentArena, root: ArenaIdx, comp_idx: usize, component_of: &mut HashMap<usize, usize>) {
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        let node: &ArbNode = arena.node(idx);
        component_of.insert(node.vertex, comp_idx);
        for &child in &node.children {
            if !arena.is_leaf(child) {
                stack.push(child);
            }
        }
    }
}

/// Topologically level-order `ret_nodes` by their `depends_on` edges,
/// breaking ties within a level by descending `sizes` then ascending vertex
/// index.
fn level_order(ret_nodes: &[usize], depends_on: &HashMap<usize, Vec<usize>>, sizes: &HashMap<usize, usize>) -> Result<Vec<usize>> {
    let mut emitted: HashSet<usize> = HashSet::with_capacity(ret_nodes.len());
    let mut remaining: Vec<usize> = ret_nodes.to_vec();
    let mut ordered = Vec::with_capacity(ret_nodes.len());

    while !remaining.is_empty() {
        let mut ready: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|r| depends_on[r].iter().all(|d| emitted.contains(d)))
            .collect();

        if ready.is_empty() {
            return Err(PhyloError::Cyclic);
        }

        ready.sort_by(|&a, &b| sizes[&b].cmp(&sizes[&a]).then(a.cmp(&b)));

        for r in ready {
            emitted.insert(r);
            ordered.push(r);
        }
        remaining.retain(|r| !emitted.contains(r));
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NetworkBuilder;

    fn reference_network() -> Network {
        let edges = vec![
            ("1".to_string(), "2".to_string()),
            ("1".to_string(), "3".to_string()),
            ("3".to_string(), "4".to_string()),
            ("4".to_string(), "5".to_string()),
            ("2".to_string(), "6".to_string()),
            ("3".to_string(), "6".to_string()),
            ("6".to_string(), "leaf1".to_string()),
            ("5".to_string(), "leaf2".to_string()),
            ("5".to_string(), "leaf3".to_string()),
            ("4".to_string(), "leaf4".to_string()),
        ];
        NetworkBuilder::from_edges(&edges).unwrap()
    }

    #[test]
    fn builds_one_component_per_reticulation_plus_root() {
        let net = reference_network();
        let set = build_components(&net).unwrap();
        assert_eq!(set.components.len(), net.ret_nodes().len() + 1);
        assert!(matches!(set.components.last().unwrap().owner, ComponentOwner::Root));
    }

    #[test]
    fn sole_reticulation_component_reaches_its_leaf() {
        let net = reference_network();
        let set = build_components(&net).unwrap();
        let ret_comp = set
            .components
            .iter()
            .find(|c| matches!(c.owner, ComponentOwner::Ret(_)))
            .unwrap();
        let leaves = set.arena.leaves_below(ret_comp.root);
        let leaf1 = net.leaf_index("leaf1").unwrap();
        assert!(leaves.contains(&leaf1));
    }
}
