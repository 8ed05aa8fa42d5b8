//! Edge-list and leaf-file parsing. Kept deliberately minimal — reading a
//! whole file into a [`crate::model::Network`]/[`crate::model::LeafSet`] is
//! everything this crate's own tests need; richer formats and streaming
//! belong to the CLI crate.

mod edgelist;
mod leaffile;

pub use edgelist::{parse_file as parse_network_file, parse_reader as parse_network_reader, parse_reader_with_stats, ImportStats};
pub use leaffile::{parse_file as parse_leaf_file, parse_reader as parse_leaf_reader};
