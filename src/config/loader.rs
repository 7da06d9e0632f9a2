// src/config/loader.rs

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::model::{BuildOptions, RawConfigFile};
use crate::errors::Result;

/// Name of the config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Tscbuild.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// semantic checks and path resolution.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load, validate, and resolve relative paths against the config's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BuildOptions> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    let options = BuildOptions::try_from(raw)?;
    Ok(options.rooted_at(&config_root_dir(path)))
}

/// Like [`load_and_validate`], but a missing file at the default location
/// falls back to built-in defaults rooted at the current directory.
pub fn load_or_default(path: Option<&Path>) -> Result<BuildOptions> {
    match path {
        Some(path) => load_and_validate(path),
        None => {
            let path = default_config_path();
            if path.exists() {
                load_and_validate(&path)
            } else {
                let options = BuildOptions::try_from(RawConfigFile::default())?;
                Ok(options.rooted_at(&config_root_dir(&path)))
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Figure out the directory relative paths in a config are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "web/Tscbuild.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Tscbuild.toml" (parent = ""),
///   we fall back to the current working directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
