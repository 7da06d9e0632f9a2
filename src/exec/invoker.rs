// src/exec/invoker.rs

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, error, info};

use crate::config::BuildOptions;
use crate::errors::{self, InvocationError, TscBuildError};
use crate::exec::backend::CompilerBackend;
use crate::exec::embedded::EmbeddedCompiler;
use crate::exec::external::ExternalCompiler;
use crate::exec::policy::{select_strategy, InvocationPolicy};
use crate::exec::InvocationResult;
use crate::fs::FileSystem;
use crate::types::Strategy;

/// Runs the compiler through the external or embedded strategy, falling
/// back from one to the other as the policy allows.
#[derive(Debug)]
pub struct CompilerInvoker {
    policy: InvocationPolicy,
    encoding: String,
    external: ExternalCompiler,
    embedded: Option<EmbeddedCompiler>,
    fallbacks: usize,
}

impl CompilerInvoker {
    /// Build an invoker around an already loaded embedded compiler (if any).
    ///
    /// Fails with a configuration error when no strategy could ever run.
    pub fn new(options: &BuildOptions, embedded: Option<EmbeddedCompiler>) -> errors::Result<Self> {
        let policy = InvocationPolicy::from(&options.invoker);
        let embedded = embedded.filter(|_| policy.allows_embedded());

        if select_strategy(&policy, embedded.is_some(), None).is_none() {
            return Err(TscBuildError::ConfigError(format!(
                "embedded compiler unavailable ({:?} could not be loaded) and no external compiler configured",
                options.invoker.compiler_script
            )));
        }

        Ok(Self {
            policy,
            encoding: options.encoding.clone(),
            external: ExternalCompiler::new(options.invoker.executable.clone()),
            embedded,
            fallbacks: 0,
        })
    }

    /// Load the embedded compiler script if the policy wants it, then build
    /// the invoker. A script that fails to load only disables that strategy.
    pub fn from_options(fs: &dyn FileSystem, options: &BuildOptions) -> errors::Result<Self> {
        let policy = InvocationPolicy::from(&options.invoker);

        let embedded = if policy.allows_embedded() {
            match EmbeddedCompiler::load(fs, options) {
                Ok(compiler) => {
                    info!(
                        script = ?options.invoker.compiler_script,
                        interpreter = %options.invoker.interpreter,
                        "embedded compiler ready"
                    );
                    Some(compiler)
                }
                Err(err) => {
                    error!("Unable to load embedded compiler: {err:#}");
                    None
                }
            }
        } else {
            None
        };

        Self::new(options, embedded)
    }

    pub fn policy(&self) -> &InvocationPolicy {
        &self.policy
    }

    pub fn embedded_ready(&self) -> bool {
        self.embedded.is_some()
    }

    /// How many invocations fell back from the external to the embedded
    /// strategy so far.
    pub fn fallback_count(&self) -> usize {
        self.fallbacks
    }

    pub async fn invoke(&mut self, args: &[String]) -> Result<InvocationResult, InvocationError> {
        debug!(?args, "compiler arguments");

        let first = select_strategy(&self.policy, self.embedded_ready(), None)
            .ok_or_else(|| InvocationError::EngineFault {
                message: "no compiler strategy available".to_string(),
                stack: None,
            })?;

        let err = match self.run_strategy(first, args).await {
            Ok(result) => return Ok(result),
            Err(err) => err,
        };

        match select_strategy(&self.policy, self.embedded_ready(), Some((first, &err))) {
            Some(next) => {
                debug!(error = %err, "external compiler could not be launched");
                info!(
                    "Unable to run '{}' binary - falling back to embedded compiler",
                    self.external.executable()
                );
                self.fallbacks += 1;
                self.run_strategy(next, args).await
            }
            None => Err(err),
        }
    }

    async fn run_strategy(
        &mut self,
        strategy: Strategy,
        args: &[String],
    ) -> Result<InvocationResult, InvocationError> {
        match strategy {
            Strategy::External => self.external.run(args).await,
            Strategy::Embedded => match self.embedded.as_mut() {
                Some(embedded) => embedded.run(args, &self.encoding).await,
                None => Err(InvocationError::EngineFault {
                    message: "embedded compiler is not loaded".to_string(),
                    stack: None,
                }),
            },
        }
    }
}

impl CompilerBackend for CompilerInvoker {
    fn compile(
        &mut self,
        args: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationResult, InvocationError>> + Send + '_>> {
        Box::pin(async move { self.invoke(&args).await })
    }
}
