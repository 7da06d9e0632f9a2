// src/watch/monitor.rs

//! Polling change detection over a file set.
//!
//! No OS notification API is involved: every poll re-scans the tree and
//! compares modification times against the previous scan.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::patterns::{collect_matching_files, SourcePattern};

/// Modification times of a file set, captured at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSetSnapshot {
    entries: BTreeMap<PathBuf, SystemTime>,
}

impl FileSetSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.entries.get(path).copied()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}

impl FromIterator<(PathBuf, SystemTime)> for FileSetSnapshot {
    fn from_iter<I: IntoIterator<Item = (PathBuf, SystemTime)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Scan `root` and record the modification time of every matching file.
///
/// Files that disappear between listing and stat are left out.
pub fn snapshot(
    fs: &dyn FileSystem,
    root: &Path,
    pattern: &SourcePattern,
) -> Result<FileSetSnapshot> {
    let mut entries = BTreeMap::new();
    for path in collect_matching_files(fs, root, pattern)? {
        if let Some(modified) = fs.modified(&path)? {
            entries.insert(path, modified);
        }
    }
    Ok(FileSetSnapshot { entries })
}

/// Paths added, removed, or with a different modification time.
pub fn diff(previous: &FileSetSnapshot, current: &FileSetSnapshot) -> BTreeSet<PathBuf> {
    let mut changed = BTreeSet::new();

    for (path, modified) in &current.entries {
        if previous.entries.get(path) != Some(modified) {
            changed.insert(path.clone());
        }
    }
    for path in previous.entries.keys() {
        if !current.entries.contains_key(path) {
            changed.insert(path.clone());
        }
    }

    changed
}

/// Remembers the last snapshot of a directory tree and reports what changed.
#[derive(Debug)]
pub struct ChangeMonitor {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    pattern: SourcePattern,
    last: Option<FileSetSnapshot>,
}

impl ChangeMonitor {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, pattern: SourcePattern) -> Self {
        Self {
            fs,
            root: root.into(),
            pattern,
            last: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a baseline snapshot has been taken yet.
    pub fn has_baseline(&self) -> bool {
        self.last.is_some()
    }

    /// Changed paths since the last successful poll.
    ///
    /// The first call only records the baseline and returns an empty list.
    /// A failed scan leaves the previous snapshot in place.
    pub fn poll_once(&mut self) -> Result<Vec<PathBuf>> {
        let current = snapshot(self.fs.as_ref(), &self.root, &self.pattern)?;

        let changed = match self.last.as_ref() {
            Some(previous) => diff(previous, &current).into_iter().collect(),
            None => {
                debug!(root = ?self.root, files = current.len(), "change monitor baseline taken");
                Vec::new()
            }
        };

        if !changed.is_empty() {
            debug!(root = ?self.root, ?changed, "change monitor detected modifications");
        }

        self.last = Some(current);
        Ok(changed)
    }
}
