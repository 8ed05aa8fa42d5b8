//! Tree-component decomposition: arb trees, the level-ordered component
//! list, and reticulation classification.

mod arena;
mod builder;
mod reticulation;

pub use arena::{for_each_preorder_ref, ArbNode, ArenaIdx, ComponentArena};
pub use builder::{build_components, Component, ComponentOwner, ComponentSet};
pub use reticulation::{classify_reticulations, RetFlag, RetInfo, RetTable};
