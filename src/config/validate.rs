// src/config/validate.rs

use std::time::Duration;

use tracing::warn;

use crate::config::model::{BuildOptions, CompilerFlags, InvokerOptions, RawConfigFile};
use crate::errors::{Result, TscBuildError};
use crate::types::CompileMode;

impl TryFrom<RawConfigFile> for BuildOptions {
    type Error = TscBuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let mode = match raw.target_file {
            Some(file) => CompileMode::Bundle(file),
            None => CompileMode::PerFile,
        };

        let c = raw.compiler;
        if !c.source_map && (c.source_root.is_some() || c.map_root.is_some()) {
            warn!("source_root/map_root are ignored unless [compiler].source_map = true");
        }

        let i = raw.invoker;
        let invoker = InvokerOptions {
            use_embedded: i.use_embedded,
            use_external: i.use_external || i.external_only,
            external_only: i.external_only,
            executable: i.executable.trim().to_string(),
            interpreter: i.interpreter.trim().to_string(),
            compiler_script: i.compiler_script,
        };

        Ok(BuildOptions {
            source_dir: raw.source_dir,
            target_dir: raw.target_dir,
            mode,
            listing_file: raw.listing_file,
            source_extension: raw.source_extension.trim_start_matches('.').to_string(),
            target_extension: raw.target_extension.trim_start_matches('.').to_string(),
            encoding: raw.encoding,
            compiler: CompilerFlags {
                target: c.target,
                module: c.module,
                remove_comments: c.remove_comments,
                no_implicit_any: c.no_implicit_any,
                declaration: c.declaration,
                source_map: c.source_map,
                source_root: c.source_root,
                map_root: c.map_root,
                no_lib: c.no_lib,
            },
            invoker,
            watch: raw.watch,
            poll_interval: Duration::from_millis(raw.poll_interval_ms),
        })
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch_settings(cfg)?;
    validate_layout(cfg)?;
    validate_invoker(cfg)?;
    Ok(())
}

fn validate_watch_settings(cfg: &RawConfigFile) -> Result<()> {
    if cfg.poll_interval_ms == 0 {
        return Err(TscBuildError::ConfigError(
            "poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_layout(cfg: &RawConfigFile) -> Result<()> {
    for (key, ext) in [
        ("source_extension", &cfg.source_extension),
        ("target_extension", &cfg.target_extension),
    ] {
        if ext.trim_start_matches('.').trim().is_empty() {
            return Err(TscBuildError::ConfigError(format!("{key} must not be empty")));
        }
    }

    if cfg.target_file.is_none() && cfg.source_dir == cfg.target_dir {
        return Err(TscBuildError::ConfigError(format!(
            "source_dir and target_dir must differ when compiling per file (both are {:?})",
            cfg.source_dir
        )));
    }

    if cfg.encoding.trim().is_empty() {
        return Err(TscBuildError::ConfigError("encoding must not be empty".to_string()));
    }

    Ok(())
}

fn validate_invoker(cfg: &RawConfigFile) -> Result<()> {
    let inv = &cfg.invoker;
    let external_requested = inv.use_external || inv.external_only;

    if !inv.use_embedded && !external_requested {
        return Err(TscBuildError::ConfigError(
            "no compiler strategy enabled: set [invoker].use_embedded or [invoker].use_external"
                .to_string(),
        ));
    }

    if external_requested && inv.executable.trim().is_empty() {
        return Err(TscBuildError::ConfigError(
            "[invoker].executable must not be empty".to_string(),
        ));
    }

    if inv.use_embedded && !inv.external_only && inv.interpreter.trim().is_empty() {
        return Err(TscBuildError::ConfigError(
            "[invoker].interpreter must not be empty".to_string(),
        ));
    }

    Ok(())
}
