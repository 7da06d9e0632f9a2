// src/exec/backend.rs

//! Pluggable compiler backend abstraction.
//!
//! The orchestrator talks to a `CompilerBackend` instead of the concrete
//! [`CompilerInvoker`](super::CompilerInvoker), so tests can swap in a fake
//! compiler that records argument lists without running anything.

use std::future::Future;
use std::pin::Pin;

use crate::errors::InvocationError;
use crate::exec::InvocationResult;

/// Anything able to run the compiler against an assembled argument list.
pub trait CompilerBackend: Send {
    /// Run one compilation. `args` is order-sensitive: option flags first,
    /// then output selection and inputs.
    ///
    /// A non-zero status is returned as `Ok`; see [`InvocationResult::check`].
    fn compile(
        &mut self,
        args: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationResult, InvocationError>> + Send + '_>>;
}
