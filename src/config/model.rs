// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{CompileMode, ModuleFormat};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// source_dir = "src/main/ts"
/// target_dir = "target/ts"
/// # target_file = "target/app.js"   # compile everything into one file
/// watch = true
/// poll_interval_ms = 250
///
/// [compiler]
/// target = "ES5"
/// module = "commonjs"
/// source_map = true
///
/// [invoker]
/// use_external = true
/// executable = "tsc"
/// ```
///
/// All keys are optional. Use `BuildOptions::try_from` to validate.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,

    /// When set, all sources are compiled into this single file.
    #[serde(default)]
    pub target_file: Option<PathBuf>,

    /// File listing every source path in bundle mode, passed as `@<file>`.
    #[serde(default = "default_listing_file")]
    pub listing_file: PathBuf,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default)]
    pub watch: bool,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default = "default_target_extension")]
    pub target_extension: String,

    #[serde(default)]
    pub compiler: CompilerSection,

    #[serde(default)]
    pub invoker: InvokerSection,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src/main/ts")
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("target/ts")
}

fn default_listing_file() -> PathBuf {
    PathBuf::from("modifiedFiles.txt")
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_source_extension() -> String {
    "ts".to_string()
}

fn default_target_extension() -> String {
    "js".to_string()
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            target_dir: default_target_dir(),
            target_file: None,
            listing_file: default_listing_file(),
            encoding: default_encoding(),
            watch: false,
            poll_interval_ms: default_poll_interval_ms(),
            source_extension: default_source_extension(),
            target_extension: default_target_extension(),
            compiler: CompilerSection::default(),
            invoker: InvokerSection::default(),
        }
    }
}

/// `[compiler]` section: flags handed to the compiler on every invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSection {
    /// ECMAScript version for `--target`.
    #[serde(default = "default_target_version")]
    pub target: Option<String>,

    #[serde(default = "default_module")]
    pub module: Option<ModuleFormat>,

    #[serde(default)]
    pub remove_comments: bool,

    #[serde(default)]
    pub no_implicit_any: bool,

    /// Generate `.d.ts` files.
    #[serde(default)]
    pub declaration: bool,

    #[serde(default)]
    pub source_map: bool,

    #[serde(default)]
    pub source_root: Option<String>,

    #[serde(default)]
    pub map_root: Option<String>,

    /// Skip the default `lib.d.ts`.
    #[serde(default)]
    pub no_lib: bool,
}

fn default_target_version() -> Option<String> {
    Some("ES3".to_string())
}

fn default_module() -> Option<ModuleFormat> {
    Some(ModuleFormat::Amd)
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            target: default_target_version(),
            module: default_module(),
            remove_comments: false,
            no_implicit_any: false,
            declaration: false,
            source_map: false,
            source_root: None,
            map_root: None,
            no_lib: false,
        }
    }
}

/// `[invoker]` section: which strategy runs the compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvokerSection {
    #[serde(default = "default_true")]
    pub use_embedded: bool,

    /// Try the external executable first.
    #[serde(default)]
    pub use_external: bool,

    /// Never fall back to the embedded compiler; implies `use_external`.
    #[serde(default)]
    pub external_only: bool,

    #[serde(default = "default_executable")]
    pub executable: String,

    /// JavaScript runtime hosting the embedded compiler script.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    #[serde(default = "default_compiler_script")]
    pub compiler_script: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_executable() -> String {
    "tsc".to_string()
}

fn default_interpreter() -> String {
    "node".to_string()
}

fn default_compiler_script() -> PathBuf {
    PathBuf::from("node_modules/typescript/lib/tsc.js")
}

impl Default for InvokerSection {
    fn default() -> Self {
        Self {
            use_embedded: true,
            use_external: false,
            external_only: false,
            executable: default_executable(),
            interpreter: default_interpreter(),
            compiler_script: default_compiler_script(),
        }
    }
}

/// Compiler flags, in the form the argument assembler consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerFlags {
    pub target: Option<String>,
    pub module: Option<ModuleFormat>,
    pub remove_comments: bool,
    pub no_implicit_any: bool,
    pub declaration: bool,
    pub source_map: bool,
    pub source_root: Option<String>,
    pub map_root: Option<String>,
    pub no_lib: bool,
}

/// Validated invocation strategy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerOptions {
    pub use_embedded: bool,
    pub use_external: bool,
    pub external_only: bool,
    pub executable: String,
    pub interpreter: String,
    pub compiler_script: PathBuf,
}

/// Finalized, validated configuration. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub mode: CompileMode,
    pub listing_file: PathBuf,
    pub source_extension: String,
    pub target_extension: String,
    pub encoding: String,
    pub compiler: CompilerFlags,
    pub invoker: InvokerOptions,
    pub watch: bool,
    pub poll_interval: Duration,
}

impl BuildOptions {
    /// Resolve every relative path against `base`.
    pub fn rooted_at(mut self, base: &Path) -> Self {
        let root = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };

        self.source_dir = root(self.source_dir);
        self.target_dir = root(self.target_dir);
        self.listing_file = root(self.listing_file);
        self.invoker.compiler_script = root(self.invoker.compiler_script);
        if let CompileMode::Bundle(file) = &mut self.mode {
            *file = root(std::mem::take(file));
        }
        self
    }
}
