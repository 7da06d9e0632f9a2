// src/exec/embedded.rs

//! Embedded compiler strategy.
//!
//! The compiler's own script is loaded once at startup into
//! [`CompilerScripts`] and executed by a [`ScriptEngine`] for every
//! invocation. [`EmbeddedCompiler`] is the single owner of both; it lives
//! inside the invoker, so runs against one engine are always serialized.

use std::fmt::Debug;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::BuildOptions;
use crate::errors::InvocationError;
use crate::exec::process::stream_output;
use crate::exec::InvocationResult;
use crate::fs::FileSystem;
use crate::types::Strategy;

/// Prefix of the stderr line the host prelude writes for an uncaught error.
pub const FAULT_MARKER: &str = "tscbuild engine fault: ";

/// Exit status the host prelude uses after reporting a fault.
pub const FAULT_STATUS: i32 = 70;

const ENCODING_ENV: &str = "TSCBUILD_ENCODING";
const SCRIPT_PATH_ENV: &str = "TSCBUILD_SCRIPT_PATH";

/// Evaluated ahead of the compiler script. Exposes the simulated argv and
/// encoding, and turns uncaught exceptions into a fault report on stderr.
///
/// Kept to a single line ending in `;` so it can take the place of the
/// compiler's shebang line without shifting line numbers in stack traces.
const HOST_PRELUDE: &str = concat!(
    "(function () {",
    " var scriptPath = process.env.TSCBUILD_SCRIPT_PATH;",
    " if (scriptPath) {",
    " process.argv[1] = scriptPath;",
    " global.__filename = scriptPath;",
    " global.__dirname = require(\"path\").dirname(scriptPath);",
    " }",
    " process.encoding = process.env.TSCBUILD_ENCODING || \"utf-8\";",
    " process.on(\"uncaughtException\", function (err) {",
    " var message = err && err.message ? err.message : String(err);",
    " var stack = err && err.stack ? String(err.stack) : \"\";",
    " process.stderr.write(\"tscbuild engine fault: \" + message + \"\\n\" + stack + \"\\n\");",
    " process.exit(70);",
    " });",
    " })();",
);

/// One named script source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub source: String,
}

/// Scripts evaluated in order for every run; the last one is the compiler.
#[derive(Debug, Clone)]
pub struct CompilerScripts {
    scripts: Vec<Script>,
    entry_path: PathBuf,
}

impl CompilerScripts {
    /// Read the compiler script once and place the host prelude before it.
    pub fn load(fs: &dyn FileSystem, compiler_script: &Path) -> Result<Self> {
        let source = fs.read_to_string(compiler_script)?;
        let name = compiler_script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tsc.js".to_string());

        debug!(script = ?compiler_script, bytes = source.len(), "loaded compiler script");

        Ok(Self::from_sources(
            compiler_script,
            vec![
                Script {
                    name: "host-prelude.js".to_string(),
                    source: HOST_PRELUDE.to_string(),
                },
                Script {
                    name,
                    source: strip_shebang(&source).to_string(),
                },
            ],
        ))
    }

    pub fn from_sources(entry_path: impl Into<PathBuf>, scripts: Vec<Script>) -> Self {
        Self {
            scripts,
            entry_path: entry_path.into(),
        }
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }

    /// Name of the compiler script, used as `argv[1]`.
    pub fn entry_name(&self) -> &str {
        self.scripts.last().map(|s| s.name.as_str()).unwrap_or("tsc.js")
    }

    /// All scripts concatenated, unchanged, into one program text.
    ///
    /// Each script but the last must end in a statement terminator or a
    /// newline. Line numbers of the last script are preserved when every
    /// earlier script fits on the first line.
    pub fn program(&self) -> String {
        self.scripts.iter().map(|s| s.source.as_str()).collect()
    }
}

/// Drop a `#!` line but keep its newline, so line 2 stays line 2.
fn strip_shebang(source: &str) -> &str {
    if source.starts_with("#!") {
        source.find('\n').map(|i| &source[i..]).unwrap_or("")
    } else {
        source
    }
}

/// Everything an engine needs for one run. Built fresh per invocation.
#[derive(Debug)]
pub struct EngineRequest<'a> {
    /// Simulated process arguments: `["node", "<script>", args...]`.
    pub argv: Vec<String>,
    pub encoding: &'a str,
    pub scripts: &'a CompilerScripts,
}

/// How a script run ended when it did not fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineExit {
    /// The script's `process.exit(N)` status; 0 when it ran to completion.
    pub status: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

/// A script engine able to run the compiler scripts.
///
/// Implementations report script-level exceptions as
/// [`InvocationError::EngineFault`]; an exit status is not a fault.
pub trait ScriptEngine: Send + Debug {
    fn execute<'a>(
        &'a mut self,
        request: EngineRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<EngineExit, InvocationError>> + Send + 'a>>;
}

/// Hosts the compiler scripts in a JavaScript runtime (`node` by default),
/// handing it the program on stdin.
#[derive(Debug, Clone)]
pub struct NodeScriptEngine {
    interpreter: String,
}

impl NodeScriptEngine {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl ScriptEngine for NodeScriptEngine {
    fn execute<'a>(
        &'a mut self,
        request: EngineRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<EngineExit, InvocationError>> + Send + 'a>> {
        Box::pin(async move {
            let engine_fault = |message: String| InvocationError::EngineFault {
                message,
                stack: None,
            };

            let mut cmd = Command::new(&self.interpreter);
            cmd.arg("-")
                .args(request.argv.iter().skip(2))
                .env(ENCODING_ENV, request.encoding)
                .env(SCRIPT_PATH_ENV, request.scripts.entry_path())
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let mut child = cmd.spawn().map_err(|e| {
                engine_fault(format!(
                    "unable to start script engine '{}': {e}",
                    self.interpreter
                ))
            })?;

            if let Some(mut stdin) = child.stdin.take() {
                let program = request.scripts.program();
                tokio::spawn(async move {
                    if let Err(e) = stdin.write_all(program.as_bytes()).await {
                        warn!(error = %e, "failed to hand compiler scripts to script engine");
                    }
                    // Dropping stdin closes the pipe and lets the engine start.
                });
            }

            let output = stream_output(child, "embedded")
                .await
                .map_err(|e| engine_fault(format!("script engine I/O error: {e}")))?;

            if let Some(fault) = parse_fault(&output.stderr) {
                return Err(fault);
            }

            Ok(EngineExit {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        })
    }
}

/// Find a fault report in engine stderr: the marker line carries the
/// message, everything after it is the script stack.
pub fn parse_fault(stderr: &[String]) -> Option<InvocationError> {
    let idx = stderr.iter().position(|l| l.starts_with(FAULT_MARKER))?;
    let message = stderr[idx][FAULT_MARKER.len()..].to_string();
    let stack: Vec<&str> = stderr[idx + 1..]
        .iter()
        .map(String::as_str)
        .filter(|l| !l.trim().is_empty())
        .collect();

    Some(InvocationError::EngineFault {
        message,
        stack: (!stack.is_empty()).then(|| stack.join("\n")),
    })
}

/// The embedded strategy: an engine plus the scripts it runs.
#[derive(Debug)]
pub struct EmbeddedCompiler {
    engine: Box<dyn ScriptEngine>,
    scripts: CompilerScripts,
}

impl EmbeddedCompiler {
    pub fn new(engine: Box<dyn ScriptEngine>, scripts: CompilerScripts) -> Self {
        Self { engine, scripts }
    }

    /// Load the configured compiler script for the configured runtime.
    pub fn load(fs: &dyn FileSystem, options: &BuildOptions) -> Result<Self> {
        let scripts = CompilerScripts::load(fs, &options.invoker.compiler_script)?;
        let engine = NodeScriptEngine::new(options.invoker.interpreter.clone());
        Ok(Self::new(Box::new(engine), scripts))
    }

    pub fn scripts(&self) -> &CompilerScripts {
        &self.scripts
    }

    pub async fn run(
        &mut self,
        args: &[String],
        encoding: &str,
    ) -> Result<InvocationResult, InvocationError> {
        let mut argv = Vec::with_capacity(args.len() + 2);
        argv.push("node".to_string());
        argv.push(self.scripts.entry_name().to_string());
        argv.extend(args.iter().cloned());

        info!("Using embedded compiler to run command: {}", argv.join(" "));

        let request = EngineRequest {
            argv,
            encoding,
            scripts: &self.scripts,
        };
        let exit = self.engine.execute(request).await?;

        Ok(InvocationResult {
            strategy: Strategy::Embedded,
            status: exit.status,
            stdout: exit.stdout,
            stderr: exit.stderr,
        })
    }
}
