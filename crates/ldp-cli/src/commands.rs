use anyhow::Context;
use colored::Colorize;
use ldp_server::{LdpServer, ServerConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Config => cmd_config(&config),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn apply_overrides(mut config: ServerConfig, args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid listen address {bind}"))?;
    }
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if args.no_bootstrap {
        config.bootstrap_root_acl = false;
    }
    Ok(config)
}

async fn cmd_serve(config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args)?;
    let server = LdpServer::new(config)?;

    if server.config().bootstrap_root_acl && server.app().bootstrap_root_acl().await? {
        println!(
            "{} Public root policy written for {}",
            "✓".green(),
            server.app().root().to_string().bold()
        );
    }
    println!(
        "LDP server on {} serving {}",
        server.config().bind_addr.to_string().bold(),
        server.config().base_url.yellow()
    );
    server.serve().await?;
    Ok(())
}

fn cmd_config(config: &ServerConfig) -> anyhow::Result<()> {
    print!("{}", toml::to_string(config)?);
    Ok(())
}
