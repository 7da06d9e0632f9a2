// src/types.rs

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Module format emitted by the compiler (`--module`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    #[default]
    Amd,
    CommonJs,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Amd => "amd",
            ModuleFormat::CommonJs => "commonjs",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sources map onto outputs for one orchestration run.
///
/// - `Bundle`: every source is compiled into the single file at the given path.
/// - `PerFile`: each source gets its own output under the target directory,
///   mirroring the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileMode {
    Bundle(PathBuf),
    PerFile,
}

impl CompileMode {
    pub fn is_bundle(&self) -> bool {
        matches!(self, CompileMode::Bundle(_))
    }
}

/// The two interchangeable ways of running the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A separate executable found on the search path.
    External,
    /// The compiler script hosted by a script engine owned by this process.
    Embedded,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::External => f.write_str("external"),
            Strategy::Embedded => f.write_str("embedded"),
        }
    }
}
