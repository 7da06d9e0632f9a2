// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File {
        content: Vec<u8>,
        modified: SystemTime,
    },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock in seconds; every write advances it by one tick.
    ticks: u64,
}

/// In-memory filesystem with a logical clock.
///
/// Each write stamps the file with a strictly later modification time than
/// any earlier write, so tests never depend on wall-clock resolution.
/// [`MockFileSystem::set_modified`] pins a time explicitly.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        // Ensure root exists
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(MockState { entries, ticks: 0 })),
        }
    }

    /// Time value corresponding to logical tick `n`.
    pub fn tick_time(n: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_000_000 + n)
    }

    /// Current logical time, without advancing it.
    pub fn now(&self) -> SystemTime {
        Self::tick_time(self.lock().ticks)
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.lock();
        state.ticks += 1;
        let modified = Self::tick_time(state.ticks);
        insert_file(&mut state.entries, path.as_ref(), content.into(), modified);
    }

    /// Create or overwrite a file with an explicit modification time.
    pub fn add_file_at(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) {
        let mut state = self.lock();
        insert_file(&mut state.entries, path.as_ref(), content.into(), modified);
    }

    /// Bump a file's modification time to a fresh tick, as `touch` would.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        state.ticks += 1;
        let now = Self::tick_time(state.ticks);
        match state.entries.get_mut(path.as_ref()) {
            Some(MockEntry::File { modified, .. }) => *modified = now,
            _ => insert_file(&mut state.entries, path.as_ref(), Vec::new(), now),
        }
    }

    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) {
        let mut state = self.lock();
        if let Some(MockEntry::File { modified, .. }) = state.entries.get_mut(path.as_ref()) {
            *modified = time;
        }
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        state.entries.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let parent = normalize_parent(parent);
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                children.retain(|c| c.as_str() != name.to_string_lossy());
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A poisoned mock only happens after a test already panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn normalize_parent(parent: &Path) -> &Path {
    if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    }
}

fn insert_file(
    entries: &mut HashMap<PathBuf, MockEntry>,
    path: &Path,
    content: Vec<u8>,
    modified: SystemTime,
) {
    entries.insert(path.to_path_buf(), MockEntry::File { content, modified });

    // Ensure parent directories exist implicitly for simplicity in this mock
    if let Some(parent) = path.parent() {
        let parent = normalize_parent(parent);
        ensure_dir_entry(entries, parent);
        link_child(entries, parent, path);
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = path.parent() {
        let parent = normalize_parent(parent);
        if parent != path {
            // Avoid infinite loop at root
            ensure_dir_entry(entries, parent);
            link_child(entries, parent, path);
        }
    }
}

fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { content, .. }) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File { .. }) => Err(anyhow!("Not a directory: {:?}", path)),
            _ => {
                ensure_dir_entry(&mut state.entries, path);
                Ok(())
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn modified(&self, path: &Path) -> Result<Option<SystemTime>> {
        match self.lock().entries.get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(Some(*modified)),
            Some(MockEntry::Dir(_)) => Ok(Some(UNIX_EPOCH)),
            None => Ok(None),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lock().entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
