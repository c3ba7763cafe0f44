use clap::Parser;
use std::path::PathBuf;

/// CLI for docs-build: build the documentation and optionally commit/push
/// the rendered pages.
#[derive(Parser, Debug)]
#[clap(
    name = "docs-build",
    version,
    about = "Build the Sphinx documentation and optionally commit/push the rendered pages"
)]
pub struct BuildCli {
    /// If specified, a clean copy of the repository will be cloned at the
    /// given branch to build the docs rather than using the working copy
    #[clap(long, value_name = "branch-name")]
    pub clean_repo_branch: Option<String>,

    /// Branch to which the result should be committed
    #[clap(long, value_name = "branch-name")]
    pub commit_branch: Option<String>,

    /// Directory where build results will be written
    #[clap(long, value_name = "directory")]
    pub scratch_dir: Option<PathBuf>,

    /// The remote repository URI
    #[clap(long, value_name = "uri")]
    pub remote: Option<String>,

    /// Skip cloning from the remote. Assume the repository is already present.
    #[clap(long)]
    pub skip_remote_clone: bool,

    /// Delete the prior scratch directory if it exists
    #[clap(long)]
    pub delete_prior: bool,

    /// Push to the remote branch after building the documentation
    #[clap(long)]
    pub push: bool,
}

/// CLI for include-fixup: normalise `#include` directives to use `<...>`
/// for absolute includes.
#[derive(Parser, Debug)]
#[clap(
    name = "include-fixup",
    version,
    about = "Fixup #include directives to use <...> for absolute includes"
)]
pub struct FixupCli {
    /// Only check the #include formats, do not change anything
    #[clap(long)]
    pub check: bool,
}

/// Initialise the tracing subscriber for a binary. Events go to stderr so
/// stdout stays reserved for per-file output.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
