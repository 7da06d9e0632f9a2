#![allow(dead_code)]

use std::path::PathBuf;

use tscbuild::config::{BuildOptions, RawConfigFile};
use tscbuild::types::ModuleFormat;

/// Builder for `BuildOptions` to simplify test setup.
///
/// Starts from the built-in defaults with `src` / `out` as the source and
/// target directories, so paths line up with a `MockFileSystem`.
pub struct BuildOptionsBuilder {
    config: RawConfigFile,
}

impl BuildOptionsBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                source_dir: PathBuf::from("src"),
                target_dir: PathBuf::from("out"),
                ..RawConfigFile::default()
            },
        }
    }

    pub fn source_dir(mut self, dir: &str) -> Self {
        self.config.source_dir = PathBuf::from(dir);
        self
    }

    pub fn target_dir(mut self, dir: &str) -> Self {
        self.config.target_dir = PathBuf::from(dir);
        self
    }

    /// Compile everything into one file.
    pub fn bundle(mut self, target_file: &str) -> Self {
        self.config.target_file = Some(PathBuf::from(target_file));
        self
    }

    pub fn listing_file(mut self, path: &str) -> Self {
        self.config.listing_file = PathBuf::from(path);
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    pub fn watch(mut self, val: bool) -> Self {
        self.config.watch = val;
        self
    }

    pub fn target(mut self, version: &str) -> Self {
        self.config.compiler.target = Some(version.to_string());
        self
    }

    pub fn module(mut self, module: ModuleFormat) -> Self {
        self.config.compiler.module = Some(module);
        self
    }

    pub fn source_map(mut self, val: bool) -> Self {
        self.config.compiler.source_map = val;
        self
    }

    pub fn remove_comments(mut self, val: bool) -> Self {
        self.config.compiler.remove_comments = val;
        self
    }

    pub fn declaration(mut self, val: bool) -> Self {
        self.config.compiler.declaration = val;
        self
    }

    pub fn use_embedded(mut self, val: bool) -> Self {
        self.config.invoker.use_embedded = val;
        self
    }

    pub fn use_external(mut self, val: bool) -> Self {
        self.config.invoker.use_external = val;
        self
    }

    pub fn external_only(mut self, val: bool) -> Self {
        self.config.invoker.external_only = val;
        self
    }

    pub fn executable(mut self, exe: &str) -> Self {
        self.config.invoker.executable = exe.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> BuildOptions {
        BuildOptions::try_from(self.config).expect("Failed to build valid options from builder")
    }
}

impl Default for BuildOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
