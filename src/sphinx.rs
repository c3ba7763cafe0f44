use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Invoke `sphinx-build` on `source_dir`, writing rendered pages into
/// `out_dir`.
///
/// Warnings are promoted to errors, parallelism is auto-detected and
/// console output is kept minimal. The doctree cache is kept under the
/// source repository so repeated working-copy builds stay incremental.
pub fn build(source_dir: &Path, out_dir: &Path, doctree_dir: &Path) -> Result<()> {
    info!(
        source = %source_dir.display(),
        out = %out_dir.display(),
        "Executing sphinx-build"
    );
    let mut cmd = Command::new("sphinx-build");
    cmd.args(["-W", "-jauto", "-qa", "-bdirhtml"])
        .arg(format!("--doctree-dir={}", doctree_dir.display()))
        .arg(source_dir)
        .arg(out_dir);
    let status = cmd.status().context("Failed to launch sphinx-build")?;
    if !status.success() {
        bail!("sphinx-build exited with {status}");
    }
    Ok(())
}
