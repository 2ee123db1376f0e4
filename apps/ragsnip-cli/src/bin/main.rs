use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ragsnip_cli::{execute, Cli};
use ragsnip_core::config::Config;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Config::load()?.settings().context("loading settings")?;
    execute(cli, settings, &mut std::io::stdout().lock())
}
