//! Thin wrappers around the `git` command line tool. All output is
//! inherited so diagnostics from git reach the operator unchanged.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Shallow, single-branch clone of `remote` at `branch` into `dest`.
pub fn clone_shallow(remote: &str, branch: &str, dest: &Path) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.args(["clone", "--quiet", "--depth=1"])
        .arg(format!("--branch={branch}"))
        .arg(remote)
        .arg(dest);
    run(cmd)
}

/// Remove every tracked file in the clone at `dir` (`git rm --quiet -rf .`).
pub fn rm_all(dir: &Path) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(dir).args(["rm", "--quiet", "-rf", "."]);
    run(cmd)
}

/// Stage all changes in the clone at `dir`.
pub fn add_all(dir: &Path) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(dir).args(["add", "."]);
    run(cmd)
}

/// Commit the staged tree in `dir` with the given message.
pub fn commit(dir: &Path, message: &str) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.arg("-C")
        .arg(dir)
        .args(["commit", "--quiet", "-m", message]);
    run(cmd)
}

/// Push `branch` of the clone at `dir` to the same branch on `remote`.
/// Non-force: the push fails if it is not a fast-forward.
pub fn push(dir: &Path, remote: &str, branch: &str) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.arg("-C")
        .arg(dir)
        .arg("push")
        .arg(remote)
        .arg(format!("{branch}:{branch}"));
    run(cmd)
}

fn run(mut cmd: Command) -> Result<()> {
    debug!(command = ?cmd, "Running git");
    let status = cmd
        .status()
        .with_context(|| format!("Failed to launch {cmd:?}"))?;
    if !status.success() {
        bail!("Command {cmd:?} exited with {status}");
    }
    Ok(())
}
