use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// Name of the optional defaults file at the working-copy root.
pub const CONFIG_FILE: &str = "docs-publish.yaml";

/// Optional defaults for docs-build. Every field may be omitted; command
/// line flags take precedence over values given here.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// Remote repository URI used for cloning the pages branch and pushing.
    #[serde(default)]
    pub remote: Option<String>,
    /// Directory where build results are written.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    /// Subdirectory of the repository holding the Sphinx sources.
    #[serde(default)]
    pub docs_dir: Option<PathBuf>,
}

/// Load the optional YAML defaults file from the given repository root.
///
/// A missing file yields the built-in defaults; an unreadable or malformed
/// file is an error.
pub fn load_config(repo_root: &Path) -> Result<DocsConfig> {
    let path = repo_root.join(CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "No config file present, using built-in defaults");
        return Ok(DocsConfig::default());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: DocsConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config YAML {}", path.display()))?;
    info!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}
