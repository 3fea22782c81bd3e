use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ldp",
    about = "Linked Data Platform resource server",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the server
    Serve(ServeArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Port to listen on, keeping the configured address
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Full listen address
    #[arg(long, conflicts_with = "port")]
    pub bind: Option<String>,
    /// Public URL of the root container
    #[arg(long)]
    pub base_url: Option<String>,
    /// Skip writing the public root policy
    #[arg(long)]
    pub no_bootstrap: bool,
}
