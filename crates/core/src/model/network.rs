//! The immutable network (graph) model.
//!
//! A [`Network`] is built once from a raw edge list and never mutated
//! afterwards. It is shared by reference (or behind `Arc`, from the SRFD
//! driver) across every CCP invocation; all of CCP's per-search mutable
//! state — the component list, the reticulation tables, and the working
//! adjacency matrix — lives in [`crate::ccp::state::SearchState`] instead.

use crate::error::{PhyloError, Result};
use indexmap::IndexMap;
use std::fmt;

/// The structural classification of a vertex, derived from its in/out
/// degree at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// Indegree 0, outdegree > 1. Exactly one per network.
    Root,
    /// Indegree 1, outdegree ≥ 1.
    Tree,
    /// Indegree > 1, outdegree 1.
    Ret,
    /// Indegree 1, outdegree 0.
    Leaf,
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VertexKind::Root => "ROOT",
            VertexKind::Tree => "TREE",
            VertexKind::Ret => "RET",
            VertexKind::Leaf => "LEAF",
        };
        f.write_str(s)
    }
}

/// A dense boolean adjacency matrix over `n` vertices, giving O(1)
/// `edge_exists` lookups.
///
/// Both the immutable [`Network`] and every mutable
/// [`SearchState`](crate::ccp::state::SearchState) clone carry one of
/// these; the network's copy is never mutated, the search state's copy is
/// mutated (edges logically "cut") as branches commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjMatrix {
    n: usize,
    bits: Vec<bool>,
}

impl AdjMatrix {
    /// An all-`false` matrix over `n` vertices.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            bits: vec![false; n * n],
        }
    }

    #[inline]
    fn idx(&self, u: usize, v: usize) -> usize {
        u * self.n + v
    }

    /// Whether the directed edge `u -> v` is present.
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> bool {
        self.bits[self.idx(u, v)]
    }

    /// Set or clear the directed edge `u -> v`.
    #[inline]
    pub fn set(&mut self, u: usize, v: usize, present: bool) {
        let i = self.idx(u, v);
        self.bits[i] = present;
    }

    /// Remove the directed edge `u -> v`. A no-op if absent.
    #[inline]
    pub fn remove(&mut self, u: usize, v: usize) {
        self.set(u, v, false);
    }
}

/// A rooted phylogenetic network: vertices classified by degree, edges
/// stored both as an adjacency matrix and as per-vertex children/parents
/// in original edge-insertion order.
///
/// Leaf vertices always occupy indices `0..leaf_count()`, sorted
/// lexicographically by label — this is what lets [`crate::srfd`] treat
/// "the same leaf" across two independently-built networks as "the same
/// index".
#[derive(Debug, Clone)]
pub struct Network {
    labels: Vec<String>,
    kinds: Vec<VertexKind>,
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
    adjacency: AdjMatrix,
    n_leaves: usize,
    root: usize,
}

impl Network {
    /// Number of vertices (leaves + internal nodes).
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of network leaves. Leaves occupy indices `0..leaf_count()`.
    pub fn leaf_count(&self) -> usize {
        self.n_leaves
    }

    /// Index of the unique root vertex.
    pub fn root(&self) -> usize {
        self.root
    }

    /// The label assigned to vertex `v` at parse time.
    pub fn label(&self, v: usize) -> &str {
        &self.labels[v]
    }

    /// The structural classification of vertex `v`.
    pub fn kind(&self, v: usize) -> VertexKind {
        self.kinds[v]
    }

    /// Children of `v`, in original edge-insertion order.
    pub fn children(&self, v: usize) -> &[usize] {
        &self.children[v]
    }

    /// Parents of `v`, in original edge-insertion order.
    pub fn parents(&self, v: usize) -> &[usize] {
        &self.parents[v]
    }

    /// Whether the directed edge `u -> v` exists in the original network.
    pub fn edge_exists(&self, u: usize, v: usize) -> bool {
        self.adjacency.get(u, v)
    }

    /// A fresh copy of this network's adjacency matrix, suitable as the
    /// starting point for a [`SearchState`](crate::ccp::state::SearchState).
    pub fn adjacency_matrix(&self) -> AdjMatrix {
        self.adjacency.clone()
    }

    /// All RET vertex indices, in first-seen (not yet level-ordered) order.
    pub fn ret_nodes(&self) -> Vec<usize> {
        (0..self.vertex_count())
            .filter(|&v| matches!(self.kinds[v], VertexKind::Ret))
            .collect()
    }

    /// Find the leaf index for a label, if it names a network leaf.
    pub fn leaf_index(&self, label: &str) -> Option<usize> {
        (0..self.n_leaves).find(|&i| self.labels[i] == label)
    }

    /// The sorted leaf labels, in canonical (index) order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        (0..self.n_leaves).map(|i| self.labels[i].as_str()).collect()
    }
}

/// Builds a validated [`Network`] from a raw, possibly-unordered edge list.
pub struct NetworkBuilder;

impl NetworkBuilder {
    /// Build a network from `(parent_label, child_label)` pairs.
    ///
    /// Interns labels in first-seen order, validates the topology, then
    /// permutes vertex indices so leaves occupy `0..n_leaves` sorted
    /// lexicographically by label.
    pub fn from_edges(edges: &[(String, String)]) -> Result<Network> {
        let mut index_of: IndexMap<String, usize> = IndexMap::new();
        let mut raw_edges: Vec<(usize, usize)> = Vec::with_capacity(edges.len());
        for (parent, child) in edges {
            let u = intern(&mut index_of, parent);
            let v = intern(&mut index_of, child);
            raw_edges.push((u, v));
        }

        let n = index_of.len();
        let labels: Vec<String> = index_of.keys().cloned().collect();

        let (kinds, root) = classify(n, &raw_edges)?;

        let permutation = leaf_front_permutation(&labels, &kinds);
        let new_labels: Vec<String> = (0..n)
            .map(|new_idx| labels[permutation[new_idx]].clone())
            .collect();
        // permutation[new_index] = old_index, so invert it to remap edges.
        let mut old_to_new = vec![0usize; n];
        for (new_idx, &old_idx) in permutation.iter().enumerate() {
            old_to_new[old_idx] = new_idx;
        }
        let new_edges: Vec<(usize, usize)> = raw_edges
            .iter()
            .map(|&(u, v)| (old_to_new[u], old_to_new[v]))
            .collect();
        let new_kinds: Vec<VertexKind> = (0..n).map(|new_idx| kinds[permutation[new_idx]]).collect();
        let new_root = old_to_new[root];
        let n_leaves = new_kinds
            .iter()
            .filter(|k| matches!(k, VertexKind::Leaf))
            .count();

        let mut children = vec![Vec::new(); n];
        let mut parents = vec![Vec::new(); n];
        let mut adjacency = AdjMatrix::new(n);
        for &(u, v) in &new_edges {
            children[u].push(v);
            parents[v].push(u);
            adjacency.set(u, v, true);
        }

        Ok(Network {
            labels: new_labels,
            kinds: new_kinds,
            children,
            parents,
            adjacency,
            n_leaves,
            root: new_root,
        })
    }
}

fn intern(map: &mut IndexMap<String, usize>, label: &str) -> usize {
    if let Some(&idx) = map.get(label) {
        return idx;
    }
    let idx = map.len();
    map.insert(label.to_string(), idx);
    idx
}

/// Classify every vertex by degree and locate the unique root.
///
/// Returns `BadTopology` if there is not exactly one root, or if any
/// vertex has both indegree > 1 and outdegree > 1.
fn classify(n: usize, edges: &[(usize, usize)]) -> Result<(Vec<VertexKind>, usize)> {
    let mut indeg = vec![0usize; n];
    let mut outdeg = vec![0usize; n];
    for &(u, v) in edges {
        outdeg[u] += 1;
        indeg[v] += 1;
    }

    let mut kinds = Vec::with_capacity(n);
    let mut root = None;
    for i in 0..n {
        let kind = match (indeg[i], outdeg[i]) {
            (0, out) if out > 1 => VertexKind::Root,
            (1, 0) => VertexKind::Leaf,
            (1, out) if out >= 1 => VertexKind::Tree,
            (ind, 1) if ind > 1 => VertexKind::Ret,
            (ind, out) => {
                return Err(PhyloError::BadTopology {
                    reason: format!(
                        "vertex {i} has indegree {ind} and outdegree {out}, which matches no valid vertex class"
                    ),
                })
            }
        };
        if matches!(kind, VertexKind::Root) {
            if root.is_some() {
                return Err(PhyloError::BadTopology {
                    reason: "network has more than one root".to_string(),
                });
            }
            root = Some(i);
        }
        kinds.push(kind);
    }

    let root = root.ok_or_else(|| PhyloError::BadTopology {
        reason: "network has no root".to_string(),
    })?;
    Ok((kinds, root))
}

/// Build a permutation `new_index -> old_index` placing leaves first,
/// sorted lexicographically by label, followed by the remaining vertices
/// in their original order.
fn leaf_front_permutation(labels: &[String], kinds: &[VertexKind]) -> Vec<usize> {
    let mut leaves: Vec<usize> = (0..labels.len())
        .filter(|&i| matches!(kinds[i], VertexKind::Leaf))
        .collect();
    leaves.sort_by(|&a, &b| labels[a].cmp(&labels[b]));

    let mut rest: Vec<usize> = (0..labels.len())
        .filter(|&i| !matches!(kinds[i], VertexKind::Leaf))
        .collect();
    rest.sort_unstable();

    leaves.into_iter().chain(rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    fn reference_network() -> Network {
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

    #[test]
    fn leaves_occupy_front_indices_sorted_lexicographically() {
        let net = reference_network();
        assert_eq!(net.leaf_count(), 4);
        assert_eq!(net.leaf_labels(), vec!["leaf1", "leaf2", "leaf3", "leaf4"]);
        for i in 0..net.leaf_count() {
            assert!(matches!(net.kind(i), VertexKind::Leaf));
        }
    }

    #[test]
    fn classifies_root_tree_ret() {
        let net = reference_network();
        let root = net.leaf_index("leaf1").map(|_| net.root()).unwrap();
        assert!(matches!(net.kind(root), VertexKind::Root));
        let ret = net.ret_nodes();
        assert_eq!(ret.len(), 1, "node 6 is the sole reticulation");
        assert!(matches!(net.kind(ret[0]), VertexKind::Ret));
    }

    #[test]
    fn rejects_two_roots() {
        let edges = vec![edge("a", "x"), edge("b", "x"), edge("a", "y"), edge("b", "y")];
        let err = NetworkBuilder::from_edges(&edges).unwrap_err();
        assert!(matches!(err, PhyloError::BadTopology { .. }));
    }

    #[test]
    fn rejects_mixed_degree_node() {
        // node m has indegree 2 and outdegree 2: invalid under the model.
        let edges = vec![
            edge("r", "a"),
            edge("r", "b"),
            edge("a", "m"),
            edge("b", "m"),
            edge("m", "x"),
            edge("m", "y"),
        ];
        let err = NetworkBuilder::from_edges(&edges).unwrap_err();
        assert!(matches!(err, PhyloError::BadTopology { .. }));
    }
}
