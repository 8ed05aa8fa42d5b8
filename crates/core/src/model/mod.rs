//! Core data model: the immutable [`Network`] and the [`LeafSet`] query
//! input.

mod leafset;
mod network;

pub use leafset::LeafSet;
pub use network::{AdjMatrix, Network, NetworkBuilder, VertexKind};
