//! IEEE Puzzlers - forwarding server and admin CLI
//!
//! `puzzlers serve` (the default) runs the reverse proxy that relays
//! `/api-proxy/*` to the configured backend. The remaining subcommands drive
//! the backend API through the same client and session the web frontend uses.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod cli;
mod commands;
mod config_commands;
mod puzzle_commands;
mod router;
mod server_utils;
mod session_commands;
mod user_commands;

use cli::{Cli, Commands};
use commands::CliContext;
use puzzlers_core::modules::{config as core_config, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = core_config::load_config(cli.config.as_deref())?;
    let _log_guard = logger::init_logger(&cli.log_level, config.log_dir.as_deref().map(Path::new))?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let mut proxy_config = config.proxy;
            if let Some(port) = port {
                proxy_config.port = port;
            }
            serve(proxy_config).await
        },
        Commands::Config(cmd) => {
            commands::handle_config_command(&config, cli.config.as_deref(), cmd)
        },
        Commands::Login { username, password } => {
            let ctx = CliContext::load(config)?;
            session_commands::login(&ctx, &username, &password).await
        },
        Commands::Logout => session_commands::logout(&CliContext::load(config)?),
        Commands::Whoami { json } => session_commands::whoami(&CliContext::load(config)?, json),
        Commands::Users(cmd) => {
            commands::handle_user_command(&CliContext::load(config)?, cmd).await
        },
        Commands::Puzzles(cmd) => {
            commands::handle_puzzle_command(&CliContext::load(config)?, cmd).await
        },
    }
}

async fn serve(proxy_config: puzzlers_types::ProxyConfig) -> Result<()> {
    info!("IEEE Puzzlers forwarder v{} starting", env!("CARGO_PKG_VERSION"));

    let app = router::build_router(&proxy_config)?;
    let listener = server_utils::create_listener(&proxy_config).await?;

    info!("listening on http://{}", listener.local_addr()?);
    info!(
        "Forwarding {}/* to {}",
        proxy_config.route_prefix,
        proxy_config.upstream_base()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(server_utils::shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
