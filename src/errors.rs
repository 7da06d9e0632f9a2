// src/errors.rs

//! Crate-wide error types.
//!
//! [`InvocationError`] describes why a single compiler invocation failed;
//! [`TscBuildError`] is what orchestration, configuration and the CLI
//! surface to their callers.

use thiserror::Error;

use crate::build::BuildFailure;
use crate::types::Strategy;

#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Failed to execute {executable}: {source}")]
    LaunchFailure {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process Error: {strategy} compiler returned {status}")]
    NonZeroExit { strategy: Strategy, status: i32 },

    #[error("JavaScript Error: {message}")]
    EngineFault {
        message: String,
        stack: Option<String>,
    },
}

/// Copyable classification of an [`InvocationError`], kept in build outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    LaunchFailure,
    NonZeroExit,
    EngineFault,
}

impl InvocationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            InvocationError::LaunchFailure { .. } => FailureKind::LaunchFailure,
            InvocationError::NonZeroExit { .. } => FailureKind::NonZeroExit,
            InvocationError::EngineFault { .. } => FailureKind::EngineFault,
        }
    }

    /// Script stack trace, only present for engine faults.
    pub fn stack(&self) -> Option<&str> {
        match self {
            InvocationError::EngineFault { stack, .. } => stack.as_deref(),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum TscBuildError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("IO failure: {0:#}")]
    IoFailure(#[from] anyhow::Error),

    #[error("Build failed: {} file(s) failed, {compiled} compiled", failures.len())]
    BuildFailed {
        compiled: usize,
        failures: Vec<BuildFailure>,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl TscBuildError {
    /// Errors after which neither another run nor another poll makes sense.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(
            self,
            TscBuildError::ConfigError(_)
                | TscBuildError::Invocation(InvocationError::LaunchFailure { .. })
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TscBuildError>;
