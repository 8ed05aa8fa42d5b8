//! Core algorithms for the Cluster Containment Problem and the Soft
//! Robinson-Foulds Distance over rooted phylogenetic networks.
//!
//! This crate is a pure library: no file I/O, no printing, no process
//! exit codes. [`phylonet_cli`](../phylonet_cli/index.html) owns all of
//! that, so that the algorithms here can be driven from a CLI, a test
//! harness, or an embedding application alike.
//!
//! - [`model`] — the immutable [`model::Network`] and the [`model::LeafSet`]
//!   query input.
//! - [`components`] — tree-component decomposition and reticulation
//!   classification.
//! - [`ccp`] — the Cluster Containment Problem driver.
//! - [`srfd`] — the Soft Robinson-Foulds Distance driver.
//! - [`io`] — edge-list and leaf-file parsing.

pub mod cancellation;
pub mod ccp;
pub mod components;
pub mod error;
pub mod io;
pub mod model;
pub mod options;
pub mod srfd;

pub use error::{PhyloError, Result};
