// src/build/mod.rs

//! Build orchestration.
//!
//! - [`staleness`] decides which sources (or whether the bundle) need work.
//! - [`arguments`] assembles compiler argument lists.
//! - [`orchestrator`] runs one build: discover, evaluate, invoke, report.

pub mod arguments;
pub mod orchestrator;
pub mod staleness;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result;

use crate::errors::{self, FailureKind, InvocationError, TscBuildError};
use crate::fs::FileSystem;

pub use orchestrator::BuildOrchestrator;
pub use staleness::{bundle_is_stale, is_stale, output_path_for};

/// A file and its modification time, read at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }

    /// Stat `path`; `None` if it does not exist.
    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Option<Self>> {
        Ok(fs.modified(path)?.map(|modified| Self::new(path, modified)))
    }
}

/// One file (or bundle) that failed to compile, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl BuildFailure {
    pub fn new(path: impl Into<PathBuf>, err: &InvocationError) -> Self {
        Self {
            path: path.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result of one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Source files compiled successfully.
    pub compiled: usize,
    /// Compiler invocations attempted.
    pub invocations: usize,
    pub failures: Vec<BuildFailure>,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when the run found nothing to do (as opposed to failing).
    pub fn nothing_compiled(&self) -> bool {
        self.compiled == 0 && self.failures.is_empty()
    }

    /// Raise [`TscBuildError::BuildFailed`] if anything failed.
    pub fn ensure_success(self) -> errors::Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TscBuildError::BuildFailed {
                compiled: self.compiled,
                failures: self.failures,
            })
        }
    }
}
