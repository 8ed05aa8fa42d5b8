//! Error taxonomy for network construction, parsing, and CCP/SRFD driving.
//!
//! `NotACluster` is deliberately absent here: it is a normal algorithmic
//! outcome, not a failure, so it is carried as
//! [`crate::ccp::CcpOutcome::Fail`] instead of an error variant.

use thiserror::Error;

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, PhyloError>;

/// Fatal errors raised while building or driving a network.
#[derive(Debug, Error)]
pub enum PhyloError {
    /// The edge set does not describe a valid phylogenetic network: either
    /// there is not exactly one root, or some vertex has both indegree > 1
    /// and outdegree > 1.
    #[error("invalid network topology: {reason}")]
    BadTopology {
        /// Human-readable explanation of which invariant failed.
        reason: String,
    },

    /// A leaf named in a cluster-containment query is not a leaf of the
    /// network.
    #[error("leaf {label:?} is not a leaf of the network")]
    UnknownLeaf {
        /// The offending label.
        label: String,
    },

    /// The two networks passed to SRFD do not share the same sorted leaf
    /// label set.
    #[error("networks do not share the same leaf set")]
    LeafSetMismatch,

    /// The reticulation level ordering could not make progress; the input
    /// graph is not a DAG.
    #[error("network is not acyclic: reticulation level ordering stalled")]
    Cyclic,

    /// A caller-supplied [`crate::cancellation::Cancellation`] fired before
    /// the search completed.
    #[error("search cancelled before completion")]
    Cancelled,

    /// Propagated I/O failure while reading an edge-list or leaf file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
