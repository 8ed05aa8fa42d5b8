use clap::{Args, Parser, Subcommand};

/// Cluster containment and soft Robinson-Foulds distance over rooted
/// phylogenetic networks.
#[derive(Debug, Parser)]
#[command(name = "phylonet", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print network and query summaries before running.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Emit results as JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Test whether a leaf set is a soft cluster of a network.
    Ccp(CcpArgs),
    /// Compute the soft Robinson-Foulds distance between two networks.
    Srfd(SrfdArgs),
}

#[derive(Debug, Args)]
pub struct CcpArgs {
    /// Edge-list file describing the network.
    pub network: std::path::PathBuf,

    /// Leaf-set file naming the queried cluster `B`, one label per line.
    pub leaves: std::path::PathBuf,

    /// Abort the search after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args)]
pub struct SrfdArgs {
    /// First network's edge-list file.
    pub network_a: std::path::PathBuf,
    /// Second network's edge-list file.
    pub network_b: std::path::PathBuf,

    /// Evaluate the `2^n - 2` leaf subsets across a thread pool.
    #[arg(long)]
    pub parallel: bool,
}
