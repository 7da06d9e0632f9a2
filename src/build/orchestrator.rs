// src/build/orchestrator.rs

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::build::arguments::{bundle_arguments, listing_contents, per_file_arguments};
use crate::build::staleness::{bundle_is_stale, is_stale, output_path_for};
use crate::build::{BuildFailure, BuildOutcome, SourceFile};
use crate::config::BuildOptions;
use crate::errors::{InvocationError, Result, TscBuildError};
use crate::exec::CompilerBackend;
use crate::fs::FileSystem;
use crate::types::CompileMode;
use crate::watch::patterns::{collect_matching_files, SourcePattern};

/// Drives one build at a time: find sources, decide what is stale, and
/// hand argument lists to the compiler backend.
pub struct BuildOrchestrator<C: CompilerBackend> {
    options: Arc<BuildOptions>,
    fs: Arc<dyn FileSystem>,
    compiler: C,
    pattern: SourcePattern,
    watching: bool,
}

impl<C: CompilerBackend> std::fmt::Debug for BuildOrchestrator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOrchestrator")
            .field("source_dir", &self.options.source_dir)
            .field("mode", &self.options.mode)
            .field("watching", &self.watching)
            .finish_non_exhaustive()
    }
}

impl<C: CompilerBackend> BuildOrchestrator<C> {
    pub fn new(options: Arc<BuildOptions>, fs: Arc<dyn FileSystem>, compiler: C) -> Result<Self> {
        let pattern = SourcePattern::for_extension(&options.source_extension)
            .map_err(|e| TscBuildError::ConfigError(format!("{e:#}")))?;

        Ok(Self {
            options,
            fs,
            compiler,
            pattern,
            watching: false,
        })
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn pattern(&self) -> &SourcePattern {
        &self.pattern
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Quiets the per-run "Searching directory" notice while watching.
    pub fn set_watching(&mut self, watching: bool) {
        self.watching = watching;
    }

    /// Create the source and target directories if they are missing.
    pub fn prepare(&self) -> Result<()> {
        self.fs.create_dir_all(&self.options.source_dir)?;
        self.fs.create_dir_all(&self.options.target_dir)?;
        Ok(())
    }

    /// Every source file under the source root, sorted by path.
    pub fn discover_sources(&self) -> Result<Vec<SourceFile>> {
        let mut sources = Vec::new();
        for path in collect_matching_files(self.fs.as_ref(), &self.options.source_dir, &self.pattern)? {
            if let Some(source) = SourceFile::read(self.fs.as_ref(), &path)? {
                sources.push(source);
            }
        }
        Ok(sources)
    }

    /// Run one build.
    ///
    /// With `check_timestamp = false` everything is recompiled. Compiler
    /// failures are recorded in the outcome and the run carries on; only a
    /// launch failure in external-only mode and IO failures abort it.
    pub async fn run_once(&mut self, check_timestamp: bool) -> Result<BuildOutcome> {
        if !self.watching {
            info!("Searching directory {}", self.options.source_dir.display());
        }

        let sources = self.discover_sources()?;
        debug!(count = sources.len(), check_timestamp, "discovered sources");

        let mode = self.options.mode.clone();
        let outcome = match &mode {
            CompileMode::Bundle(target) => {
                self.compile_bundle(target, &sources, check_timestamp).await?
            }
            CompileMode::PerFile => self.compile_per_file(&sources, check_timestamp).await?,
        };

        if outcome.nothing_compiled() {
            info!("Nothing to compile");
        } else if outcome.is_success() {
            info!("Compiled {} file(s)", outcome.compiled);
        } else {
            error!(
                "Compiled {} file(s), {} failed",
                outcome.compiled,
                outcome.failures.len()
            );
            for failure in &outcome.failures {
                error!("  {}: {}", failure.path.display(), failure.message);
            }
        }

        Ok(outcome)
    }

    /// [`run_once`](Self::run_once), raising `BuildFailed` if anything failed.
    pub async fn run_checked(&mut self, check_timestamp: bool) -> Result<BuildOutcome> {
        self.run_once(check_timestamp).await?.ensure_success()
    }

    async fn compile_bundle(
        &mut self,
        target: &Path,
        sources: &[SourceFile],
        check_timestamp: bool,
    ) -> Result<BuildOutcome> {
        let mut outcome = BuildOutcome::default();

        let output = SourceFile::read(self.fs.as_ref(), target)?;
        if !bundle_is_stale(sources, output.as_ref(), check_timestamp) {
            return Ok(outcome);
        }

        let listing = &self.options.listing_file;
        self.fs.write(listing, listing_contents(sources).as_bytes())?;

        let args = bundle_arguments(&self.options.compiler, target, listing);
        info!("Compiling {} file(s) into {}", sources.len(), target.display());

        outcome.invocations += 1;
        match self.invoke(args).await {
            Ok(()) => {
                info!("Generated: {}", target.display());
                outcome.compiled = sources.len();
            }
            Err(err) => self.record_failure(target, err, &mut outcome)?,
        }

        Ok(outcome)
    }

    async fn compile_per_file(
        &mut self,
        sources: &[SourceFile],
        check_timestamp: bool,
    ) -> Result<BuildOutcome> {
        let mut outcome = BuildOutcome::default();

        for source in sources {
            let Some(target) = output_path_for(
                &source.path,
                &self.options.source_dir,
                &self.options.target_dir,
                &self.options.target_extension,
            ) else {
                warn!(source = ?source.path, "source is outside the source directory; skipping");
                continue;
            };

            let output = SourceFile::read(self.fs.as_ref(), &target)?;
            if !is_stale(source, output.as_ref(), check_timestamp) {
                continue;
            }

            info!("Compiling: {}", source.path.display());
            let out_dir = target.parent().unwrap_or(self.options.target_dir.as_path());
            let args = per_file_arguments(&self.options.compiler, out_dir, &source.path);

            outcome.invocations += 1;
            match self.invoke(args).await {
                Ok(()) => {
                    info!("Generated: {}", target.display());
                    outcome.compiled += 1;
                }
                Err(err) => self.record_failure(&source.path, err, &mut outcome)?,
            }
        }

        Ok(outcome)
    }

    async fn invoke(&mut self, args: Vec<String>) -> std::result::Result<(), InvocationError> {
        self.compiler.compile(args).await?.check()?;
        Ok(())
    }

    /// Log and record a failed invocation. A launch failure in
    /// external-only mode is returned as an error instead.
    fn record_failure(
        &self,
        path: &Path,
        err: InvocationError,
        outcome: &mut BuildOutcome,
    ) -> Result<()> {
        error!("{}", err);
        if let Some(stack) = err.stack() {
            debug!("JS stack:\n{}", stack);
        }

        if self.options.invoker.external_only && matches!(err, InvocationError::LaunchFailure { .. }) {
            return Err(err.into());
        }

        outcome.failures.push(BuildFailure::new(path, &err));
        Ok(())
    }
}
