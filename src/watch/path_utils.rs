// src/watch/path_utils.rs

use std::path::Path;

/// `path` relative to `root` with forward slashes, as glob patterns expect.
///
/// Purely lexical: `None` if `path` does not start with `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
