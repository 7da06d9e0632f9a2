// src/build/staleness.rs

//! Deciding what needs to be recompiled.
//!
//! Pure functions over snapshots of sources and outputs; nothing here
//! touches the filesystem.

use std::path::{Path, PathBuf};

use crate::build::SourceFile;

/// Whether one source must be compiled into its own output.
///
/// Always true when timestamp checking is off or the output is missing;
/// otherwise true only if the source is strictly newer than the output.
pub fn is_stale(source: &SourceFile, output: Option<&SourceFile>, check_timestamp: bool) -> bool {
    match output {
        _ if !check_timestamp => true,
        None => true,
        Some(output) => source.modified > output.modified,
    }
}

/// Whether the single bundle output must be rebuilt from `sources`.
///
/// An empty source set is never stale, even without timestamp checking.
pub fn bundle_is_stale(
    sources: &[SourceFile],
    output: Option<&SourceFile>,
    check_timestamp: bool,
) -> bool {
    let Some(newest) = sources.iter().map(|s| s.modified).max() else {
        return false;
    };

    match output {
        _ if !check_timestamp => true,
        None => true,
        Some(output) => newest > output.modified,
    }
}

/// Where per-file compilation writes the output for `source`.
///
/// The path relative to `source_root` is kept under `target_root` and the
/// extension swapped, so `src/app/a.ts` becomes `out/app/a.js`.
/// Returns `None` if `source` does not live under `source_root`.
pub fn output_path_for(
    source: &Path,
    source_root: &Path,
    target_root: &Path,
    target_extension: &str,
) -> Option<PathBuf> {
    let rel = source.strip_prefix(source_root).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(target_root.join(rel).with_extension(target_extension))
}
