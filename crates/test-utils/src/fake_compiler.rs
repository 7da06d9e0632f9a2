use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tscbuild::errors::InvocationError;
use tscbuild::exec::{CompilerBackend, InvocationResult};
use tscbuild::fs::mock::MockFileSystem;
use tscbuild::types::Strategy;

/// A fake compiler that:
/// - records every argument list it is handed
/// - "generates" outputs by writing them into a `MockFileSystem`
/// - exits non-zero for inputs containing one of the configured substrings.
#[derive(Debug, Clone)]
pub struct FakeCompiler {
    fs: MockFileSystem,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    failing: Vec<String>,
    missing_executable: bool,
    target_extension: String,
}

impl FakeCompiler {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: Vec::new(),
            missing_executable: false,
            target_extension: "js".to_string(),
        }
    }

    /// Exit with status 1 whenever an argument contains `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.failing.push(needle.to_string());
        self
    }

    /// Behave like an executable that cannot be started.
    pub fn missing_executable(mut self) -> Self {
        self.missing_executable = true;
        self
    }

    /// Shared handle on the recorded argument lists.
    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn generate(&self, args: &[String]) {
        let value_after = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
        };

        if let Some(bundle) = value_after("--out") {
            self.fs.add_file(bundle, "// bundle");
        } else if let (Some(dir), Some(source)) = (value_after("--outDir"), args.last()) {
            let name = Path::new(source).with_extension(&self.target_extension);
            if let Some(file_name) = name.file_name() {
                self.fs.add_file(PathBuf::from(dir).join(file_name), "// compiled");
            }
        }
    }
}

impl CompilerBackend for FakeCompiler {
    fn compile(
        &mut self,
        args: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationResult, InvocationError>> + Send + '_>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(args.clone());

            if self.missing_executable {
                return Err(InvocationError::LaunchFailure {
                    executable: "tsc".to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
                });
            }

            let fails = args
                .iter()
                .any(|a| self.failing.iter().any(|needle| a.contains(needle.as_str())));
            let status = if fails {
                1
            } else {
                self.generate(&args);
                0
            };

            Ok(InvocationResult {
                strategy: Strategy::External,
                status,
                stdout: Vec::new(),
                stderr: Vec::new(),
            })
        })
    }
}
