// src/config/mod.rs

//! Configuration loading and validation for tscbuild.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the validated
//!   [`BuildOptions`] record (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate and finalize it (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default, DEFAULT_CONFIG_FILE};
pub use model::{
    BuildOptions, CompilerFlags, CompilerSection, InvokerOptions, InvokerSection, RawConfigFile,
};
