//! Build-and-publish orchestrator: clone, build, stage, commit, push.
//!
//! The pipeline is a linear sequence of external commands; the first
//! failure aborts the whole run. Only the temporary clone directory gets
//! guaranteed cleanup; a failed build may leave the scratch directory
//! partially populated.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use tempfile::TempDir;
use tracing::info;

use crate::cli::BuildCli;
use crate::git;
use crate::inventory;
use crate::load_config::DocsConfig;
use crate::sphinx;

/// Default scratch directory, relative to the repository root.
const DEFAULT_SCRATCH_DIR: &str = "_build/docs-build";
/// Doctree cache directory, relative to the repository root.
const DOCTREE_DIR: &str = "_build/docs-build.doctree";
/// Default Sphinx source subdirectory.
const DEFAULT_DOCS_DIR: &str = "docs";
/// Default remote for cloning the pages branch and pushing.
const DEFAULT_REMOTE: &str = "git@github.com:kasbuunk/docs-publish.git";

/// Fully resolved options for one build-and-publish run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub repo_root: PathBuf,
    pub clean_repo_branch: Option<String>,
    pub commit_branch: Option<String>,
    pub scratch_dir: PathBuf,
    pub remote: String,
    pub docs_dir: PathBuf,
    pub skip_remote_clone: bool,
    pub delete_prior: bool,
    pub push: bool,
}

impl BuildOptions {
    /// Merge command-line flags with the optional YAML defaults. Flags win
    /// over the config file, which wins over the built-in defaults.
    pub fn resolve(cli: BuildCli, config: DocsConfig, repo_root: PathBuf) -> Self {
        let scratch_dir = cli
            .scratch_dir
            .or(config.scratch_dir)
            .unwrap_or_else(|| repo_root.join(DEFAULT_SCRATCH_DIR));
        let remote = cli
            .remote
            .or(config.remote)
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string());
        let docs_dir = config
            .docs_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR));
        Self {
            repo_root,
            clean_repo_branch: cli.clean_repo_branch,
            commit_branch: cli.commit_branch,
            scratch_dir,
            remote,
            docs_dir,
            skip_remote_clone: cli.skip_remote_clone,
            delete_prior: cli.delete_prior,
            push: cli.push,
        }
    }
}

/// Run the whole build-and-publish pipeline.
pub fn run(opts: &BuildOptions) -> Result<()> {
    // The TempDir guard must outlive the build; dropping it removes the
    // clone on every exit path, including errors.
    let mut clone_guard: Option<TempDir> = None;
    let build_root = match &opts.clean_repo_branch {
        None => opts.repo_root.clone(),
        Some(branch) => {
            let tmp = tempfile::Builder::new()
                .suffix(".docs-clone")
                .tempdir()
                .context("Failed to create temporary clone directory")?;
            info!(path = %tmp.path().display(), branch = %branch, "Cloning into temporary directory");
            git::clone_shallow(&file_uri(&opts.repo_root)?, branch, tmp.path())?;
            let path = tmp.path().to_path_buf();
            clone_guard = Some(tmp);
            path
        }
    };

    if let Some(branch) = &opts.commit_branch {
        prepare_scratch(opts, branch)?;
    }

    let docs_source = build_root.join(&opts.docs_dir);
    inventory::write_inventory(
        &docs_source.join(inventory::CPPREF_INVENTORY_FILE),
        "cppreference",
        "0",
        &inventory::cppref_items(),
    )?;

    let doctree_dir = opts.repo_root.join(DOCTREE_DIR);
    sphinx::build(&docs_source, &opts.scratch_dir, &doctree_dir)?;

    // Tell GitHub Pages not to run the output through Jekyll.
    fs::write(opts.scratch_dir.join(".nojekyll"), b"")
        .context("Failed to write .nojekyll marker")?;
    info!(path = %opts.scratch_dir.display(), "Build pages are ready");

    if let Some(branch) = &opts.commit_branch {
        commit_and_push(opts, branch)?;
    }

    drop(clone_guard);
    Ok(())
}

/// Prepare the scratch directory for a publishing build: optionally wipe
/// it, require it to be empty, clone the existing pages branch into it and
/// untrack the prior content.
fn prepare_scratch(opts: &BuildOptions, branch: &str) -> Result<()> {
    if opts.delete_prior {
        match fs::remove_dir_all(&opts.scratch_dir) {
            Ok(()) => {
                info!(path = %opts.scratch_dir.display(), "Deleted prior scratch directory");
            }
            // The one suppressed filesystem error: nothing to delete.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "Failed to delete scratch directory {}",
                        opts.scratch_dir.display()
                    )
                })
            }
        }
    }
    if scratch_is_populated(&opts.scratch_dir)? {
        bail!(
            "Scratch directory [{}] is not empty",
            opts.scratch_dir.display()
        );
    }
    if !opts.skip_remote_clone {
        info!(path = %opts.scratch_dir.display(), "Cloning existing pages");
        git::clone_shallow(&opts.remote, branch, &opts.scratch_dir)?;
    }
    info!("Wiping prior content");
    git::rm_all(&opts.scratch_dir)
}

fn scratch_is_populated(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to inspect scratch directory {}", dir.display()))
        }
    };
    Ok(entries.next().is_some())
}

/// Stage the rendered pages, commit them with a timestamped message and
/// optionally push to the remote pages branch.
fn commit_and_push(opts: &BuildOptions, branch: &str) -> Result<()> {
    // Sphinx's build metadata has no business in the published tree.
    let buildinfo = opts.scratch_dir.join(".buildinfo");
    fs::remove_file(&buildinfo)
        .with_context(|| format!("Failed to remove {}", buildinfo.display()))?;
    info!("Staging...");
    git::add_all(&opts.scratch_dir)?;
    let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
    info!("Committing...");
    git::commit(&opts.scratch_dir, &format!("Documentation build [{stamp}]"))?;
    if opts.push {
        info!(remote = %opts.remote, branch = %branch, "Pushing...");
        git::push(&opts.scratch_dir, &opts.remote, branch)?;
    }
    Ok(())
}

/// `file://` URI of the repository root, for shallow local clones.
fn file_uri(path: &Path) -> Result<String> {
    let abs = fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve repository root {}", path.display()))?;
    Ok(format!("file://{}", abs.display()))
}
