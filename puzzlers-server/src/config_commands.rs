use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use puzzlers_core::modules::config as core_config;
use puzzlers_types::AppConfig;

pub fn show_config(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let proxy = &config.proxy;
    println!("{}", "Forwarder Configuration:".cyan().bold());
    println!("  Listen: {}", proxy.get_socket_addr());
    println!("  Upstream: {}", proxy.upstream_base().unwrap_or("(not set)"));
    let prefix = if proxy.route_prefix.is_empty() { "/" } else { proxy.route_prefix.as_str() };
    println!("  Route prefix: {}", prefix);
    println!("  Edge CORS: {}", proxy.edge_cors);
    println!("  Expose error trace: {}", proxy.expose_error_trace);
    println!("  Upstream timeout: {}s", proxy.request_timeout);
    println!("  Max body: {} bytes", proxy.max_body_bytes);
    println!();
    println!("{}", "Client Configuration:".cyan().bold());
    println!("  API URL: {}", config.api_url);
    println!("  Timeout: {}s", config.client_timeout);
    println!("  Log dir: {}", config.log_dir.as_deref().unwrap_or("-"));
    Ok(())
}

pub fn init_config(config: &AppConfig, path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => core_config::default_config_path().context("Failed to resolve config path")?,
    };
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    core_config::save_config(config, &path)?;
    println!("{} Config written to {}", "✓".green(), path.display());
    Ok(())
}
