use anyhow::Result;
use clap::Parser;

use docs_publish::cli::{self, FixupCli};
use docs_publish::includes::{self, Mode};

fn main() -> Result<()> {
    cli::init_tracing();
    let cli = FixupCli::parse();
    let mode = if cli.check { Mode::Check } else { Mode::Rewrite };
    let offending = includes::run(mode)?;
    if cli.check && offending > 0 {
        std::process::exit(1);
    }
    Ok(())
}
