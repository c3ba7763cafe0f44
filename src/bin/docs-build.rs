use anyhow::{Context, Result};
use clap::Parser;

use docs_publish::cli::{self, BuildCli};
use docs_publish::load_config::load_config;
use docs_publish::publish::{self, BuildOptions};

fn main() -> Result<()> {
    cli::init_tracing();
    let cli = BuildCli::parse();
    let repo_root = std::env::current_dir().context("Failed to determine working directory")?;
    let config = load_config(&repo_root)?;
    let opts = BuildOptions::resolve(cli, config, repo_root);
    publish::run(&opts)
}
