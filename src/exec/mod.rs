// src/exec/mod.rs

//! Compiler invocation layer.
//!
//! - [`external`] runs a compiler executable from the search path.
//! - [`embedded`] runs the compiler script inside a [`ScriptEngine`] owned
//!   by this process.
//! - [`policy`] decides which of the two to try, and whether to fall back.
//! - [`invoker`] combines them into the [`CompilerInvoker`].
//! - [`backend`] is the trait the orchestrator drives, so tests can replace
//!   the real invoker with a fake.

pub mod backend;
pub mod embedded;
pub mod external;
pub mod invoker;
pub mod policy;
pub mod process;

pub use backend::CompilerBackend;
pub use embedded::{
    CompilerScripts, EmbeddedCompiler, EngineExit, EngineRequest, NodeScriptEngine, Script,
    ScriptEngine,
};
pub use external::ExternalCompiler;
pub use invoker::CompilerInvoker;
pub use policy::{select_strategy, InvocationPolicy};

use crate::errors::InvocationError;
use crate::types::Strategy;

/// What one compiler run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub strategy: Strategy,
    pub status: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl InvocationResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Turn a non-zero exit status into [`InvocationError::NonZeroExit`].
    pub fn check(self) -> Result<Self, InvocationError> {
        if self.success() {
            Ok(self)
        } else {
            Err(InvocationError::NonZeroExit {
                strategy: self.strategy,
                status: self.status,
            })
        }
    }
}
