use crate::args::CcpArgs;
use phylonet_core::cancellation::{Deadline, NeverCancel};
use phylonet_core::model::{AdjMatrix, Network};
use phylonet_core::options::CcpOptions;
use phylonet_core::{ccp, io};
use std::time::Duration;

pub fn run(args: &CcpArgs, verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let network = io::parse_network_file(&args.network)?;
    tracing::debug!(path = %args.network.display(), vertices = network.vertex_count(), leaves = network.leaf_count(), "parsed network");

    let b = io::parse_leaf_file(&args.leaves, &network)?;
    tracing::debug!(path = %args.leaves.display(), size = b.len(), "parsed leaf set");

    if verbose {
        println!(
            "network: {} vertices, {} leaves, {} reticulations",
            network.vertex_count(),
            network.leaf_count(),
            network.ret_nodes().len()
        );
        println!("query: |B| = {} of {}", b.len(), b.universe_size());
    }

    let outcome = match args.timeout_secs {
        Some(secs) => {
            let components = phylonet_core::components::build_components(&network)?;
            let options = CcpOptions::with_cancellation(Deadline::after(Duration::from_secs(secs)));
            ccp::contains_with(&network, &components, &b, &options)?
        }
        None => {
            let components = phylonet_core::components::build_components(&network)?;
            let options = CcpOptions::<NeverCancel>::default();
            ccp::contains_with(&network, &components, &b, &options)?
        }
    };

    let witness_label = outcome.witness().map(|v| network.label(v));

    if json {
        println!(
            "{}",
            serde_json::json!({
                "is_cluster": outcome.is_cluster(),
                "witness": witness_label,
                "branch_count": outcome.branch_count(),
            })
        );
    } else {
        match &outcome {
            ccp::CcpOutcome::Success { witness, adjacency, .. } => {
                println!("cluster (witness: {})", network.label(*witness));
                for line in residual_tree_lines(&network, *witness, adjacency) {
                    println!("{line}");
                }
            }
            ccp::CcpOutcome::Fail { .. } => println!("not a cluster"),
        }
        println!("no_break: {}", outcome.branch_count());
    }

    Ok(())
}

/// Render the surviving edges below `witness` under the winning branch's
/// reticulation-edge selection, `parent_label child_label` per line.
fn residual_tree_lines(network: &Network, witness: usize, adjacency: &AdjMatrix) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack = vec![witness];
    while let Some(v) = stack.pop() {
        for &child in network.children(v) {
            if adjacency.get(v, child) {
                lines.push(format!("{} {}", network.label(v), network.label(child)));
                stack.push(child);
            }
        }
    }
    lines
}
