mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Command::Ccp(args) => commands::ccp::run(args, cli.verbose, cli.json),
        Command::Srfd(args) => commands::srfd::run(args, cli.verbose, cli.json),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(10);
    }
}
