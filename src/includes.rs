//! Normalisation of local `#include "..."` directives to the canonical
//! angle-bracket form across the project's source trees.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

/// Directories scanned for source files, relative to the invocation root.
const SOURCE_ROOTS: &[&str] = &["src", "include"];

/// File extensions considered C/C++ sources.
const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cpp", "hpp"];

/// Matches a local include directive: `#include` with leading whitespace,
/// then a quoted path starting with a word character, then the rest of the
/// line (trailing comments stay in the third group).
const INCLUDE_PATTERN: &str = r#"^(\s*#include\s+)"(\w.*)"(.*)$"#;

/// Selects between rewriting files in place and read-only verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rewrite,
    Check,
}

/// One rewritten include line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub old_line: String,
    pub new_line: String,
}

/// Rewrite all local include directives in `content`, returning the new
/// content and the substitutions that were made. Lines without a quoted
/// include are passed through unchanged, so a second pass is a no-op.
pub fn rewrite_source(re: &Regex, content: &str) -> (String, Vec<Substitution>) {
    let mut substitutions = Vec::new();
    let lines: Vec<String> = content
        .split('\n')
        .map(|line| match re.captures(line) {
            Some(caps) => {
                let new_line = format!("{}<{}>{}", &caps[1], &caps[2], &caps[3]);
                substitutions.push(Substitution {
                    old_line: line.to_string(),
                    new_line: new_line.clone(),
                });
                new_line
            }
            None => line.to_string(),
        })
        .collect();
    (lines.join("\n"), substitutions)
}

/// Scan the `src/` and `include/` trees under the current directory and
/// normalise include directives according to `mode`.
///
/// In `Check` mode nothing is written; one diagnostic per non-conforming
/// file goes to stderr. In `Rewrite` mode changed files are written back
/// with `\n` line endings and one message per substitution goes to stdout.
/// Returns the number of non-conforming files found.
pub fn run(mode: Mode) -> Result<usize> {
    let re = Regex::new(INCLUDE_PATTERN).expect("include pattern is valid");
    let mut offending = 0usize;
    for path in source_files()? {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        // Line endings are normalised to \n before matching; a file that
        // differs only in line endings is left alone.
        let content = raw.replace("\r\n", "\n");
        let (new_content, substitutions) = rewrite_source(&re, &content);
        if new_content == content {
            debug!(path = %path.display(), "No include directives to fix");
            continue;
        }
        offending += 1;
        match mode {
            Mode::Check => {
                eprintln!(
                    "File [{}] contains improper #include directives",
                    path.display()
                );
            }
            Mode::Rewrite => {
                for sub in &substitutions {
                    println!(
                        "{}: update #include directive: {:?} -> {:?}",
                        path.display(),
                        sub.old_line,
                        sub.new_line
                    );
                }
                fs::write(&path, &new_content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
    }
    Ok(offending)
}

/// Enumerate source files under the fixed roots. Missing roots are skipped
/// so the tool works in partial checkouts.
fn source_files() -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in SOURCE_ROOTS {
        let root = Path::new(root);
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk source tree {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
            if matches {
                files.push(path);
            }
        }
    }
    Ok(files)
}
