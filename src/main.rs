use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hoenn_dex::config::{Cli, Config, LogLevel};
use hoenn_dex::data::loader::load_catalog;
use hoenn_dex::shell::Shell;

fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr) // stdout carries the menus
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let catalog = load_catalog(&cli.catalog)
        .with_context(|| format!("cannot load catalog {}", cli.catalog.display()))?;
    let config = Config::new(&cli, &catalog).context("invalid starter selection")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), &catalog, &config);
    shell.run()?;

    info!(owners = shell.registry().len(), "session ended");
    Ok(())
}
