use crate::args::SrfdArgs;
use phylonet_core::io;
use phylonet_core::options::SrfdOptions;
use phylonet_core::srfd;

pub fn run(args: &SrfdArgs, verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let network_a = io::parse_network_file(&args.network_a)?;
    let network_b = io::parse_network_file(&args.network_b)?;

    if verbose {
        println!(
            "network A: {} vertices, {} leaves; network B: {} vertices, {} leaves",
            network_a.vertex_count(),
            network_a.leaf_count(),
            network_b.vertex_count(),
            network_b.leaf_count(),
        );
    }

    let options = SrfdOptions { parallel: args.parallel };
    let distance = srfd::distance(&network_a, &network_b, &options)?;

    if json {
        println!("{}", serde_json::json!({ "soft_rf_distance": distance }));
    } else {
        println!("{distance:.1}");
    }

    Ok(())
}
