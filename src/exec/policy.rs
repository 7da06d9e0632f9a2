// src/exec/policy.rs

//! Strategy selection, kept free of IO so it can be reasoned about alone.

use crate::config::InvokerOptions;
use crate::errors::InvocationError;
use crate::types::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationPolicy {
    pub use_embedded: bool,
    pub use_external: bool,
    pub external_only: bool,
}

impl From<&InvokerOptions> for InvocationPolicy {
    fn from(opts: &InvokerOptions) -> Self {
        Self {
            use_embedded: opts.use_embedded,
            use_external: opts.use_external || opts.external_only,
            external_only: opts.external_only,
        }
    }
}

impl InvocationPolicy {
    /// Whether the embedded compiler may ever be used under this policy.
    pub fn allows_embedded(&self) -> bool {
        self.use_embedded && !self.external_only
    }
}

/// Decide which strategy to run next for one invocation.
///
/// `prior` is the strategy that was just attempted and how it failed;
/// `None` means nothing has been attempted yet. Returns `None` when there
/// is nothing (more) to try.
///
/// Only a launch failure of the external executable falls back to the
/// embedded compiler, and only when external-only mode is off. A non-zero
/// exit never falls back.
pub fn select_strategy(
    policy: &InvocationPolicy,
    embedded_ready: bool,
    prior: Option<(Strategy, &InvocationError)>,
) -> Option<Strategy> {
    let embedded = embedded_ready && policy.allows_embedded();

    match prior {
        None if policy.use_external => Some(Strategy::External),
        None if embedded => Some(Strategy::Embedded),
        None => None,
        Some((Strategy::External, InvocationError::LaunchFailure { .. })) if embedded => {
            Some(Strategy::Embedded)
        }
        Some(_) => None,
    }
}
