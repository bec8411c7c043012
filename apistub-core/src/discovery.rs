//! Source file discovery under a package root

use crate::config::Config;
use crate::StubError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Python source files under `root` matching the discovery glob, skipping
/// ignored directories. Results are sorted by path.
pub fn discover_sources(root: &Path, config: &Config) -> crate::Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(StubError::FileNotFound(root.to_path_buf()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut builder = WalkBuilder::new(root);
    builder.hidden(false);
    builder.git_ignore(true);
    builder.git_global(false);
    builder.git_exclude(true);

    let include = include_set(&config.discovery.glob)?;
    let ignore = ignore_set(&config.ignore.patterns)?;

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if ignore.is_match(relative) {
            continue;
        }
        if include.is_match(relative) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "Discovered source files");
    Ok(files)
}

fn include_set(glob: &str) -> crate::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new(glob).map_err(|e| StubError::GlobPattern(e.to_string()))?);
    builder
        .build()
        .map_err(|e| StubError::GlobPattern(e.to_string()))
}

/// Bare names match a file or directory anywhere in the tree
fn ignore_set(patterns: &[String]) -> crate::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
            pattern.clone()
        } else {
            format!("**/{}", pattern)
        };
        if let Ok(g) = Glob::new(&glob_pattern) {
            builder.add(g);
        }
        if let Ok(g) = Glob::new(&format!("**/{}/**", pattern)) {
            builder.add(g);
        }
    }
    builder
        .build()
        .map_err(|e| StubError::GlobPattern(e.to_string()))
}
