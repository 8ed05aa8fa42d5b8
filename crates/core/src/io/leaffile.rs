//! Parsing a leaf-set file: one leaf label per line, defining the `B` of a
//! single CCP query.

use crate::error::{PhyloError, Result};
use crate::model::{LeafSet, Network};
use std::io::{BufRead, BufReader, Read};

/// Parse a leaf file against `network`, resolving each label to its leaf
/// index. Errors with [`PhyloError::UnknownLeaf`] if a label isn't one of
/// the network's leaves.
pub fn parse_reader(reader: impl Read, network: &Network) -> Result<LeafSet> {
    let buffered = BufReader::new(reader);
    let mut indices = Vec::new();
    for line in buffered.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let index = network.leaf_index(trimmed).ok_or_else(|| PhyloError::UnknownLeaf {
            label: trimmed.to_string(),
        })?;
        indices.push(index);
    }
    Ok(LeafSet::from_indices(network.leaf_count(), indices))
}

/// Parse a leaf file from a path.
pub fn parse_file(path: impl AsRef<std::path::Path>, network: &Network) -> Result<LeafSet> {
    let file = std::fs::File::open(path)?;
    parse_reader(file, network)
}
