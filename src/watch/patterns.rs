// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::fs::FileSystem;
use crate::watch::path_utils::relative_str;

/// Compiled glob selecting the files of interest below a root directory.
///
/// Patterns are matched against paths relative to the root, with forward
/// slashes (e.g. `"app/models/user.ts"`).
#[derive(Clone)]
pub struct SourcePattern {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePattern")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl SourcePattern {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        let set = build_globset(&patterns)?;
        Ok(Self { patterns, set })
    }

    /// Every file with the given extension, at any depth: `**/*.<ext>`.
    pub fn for_extension(extension: &str) -> Result<Self> {
        let ext = extension.trim_start_matches('.');
        Self::new(&[format!("**/*.{ext}")])
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` that match `pattern`, sorted by path.
///
/// A missing root yields an empty list rather than an error.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    pattern: &SourcePattern,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !fs.is_dir(root) {
        return Ok(files);
    }

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Some(rel_str) = relative_str(root, &path) {
                    if pattern.matches(&rel_str) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
