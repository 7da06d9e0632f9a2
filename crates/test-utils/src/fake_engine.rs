use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tscbuild::errors::InvocationError;
use tscbuild::exec::{CompilerScripts, EngineExit, EngineRequest, Script, ScriptEngine};

/// A script engine that runs nothing. It records the simulated argv of
/// every request and ends each run with a fixed status, or a fault.
#[derive(Debug, Clone, Default)]
pub struct FakeScriptEngine {
    runs: Arc<Mutex<Vec<Vec<String>>>>,
    status: i32,
    fault: Option<String>,
}

impl FakeScriptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// End every run with `process.exit(status)`.
    pub fn exiting_with(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Throw an uncaught error with `message` on every run.
    pub fn faulting(mut self, message: &str) -> Self {
        self.fault = Some(message.to_string());
        self
    }

    /// Shared handle on the argv of every run, in order.
    pub fn runs(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.runs)
    }
}

impl ScriptEngine for FakeScriptEngine {
    fn execute<'a>(
        &'a mut self,
        request: EngineRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<EngineExit, InvocationError>> + Send + 'a>> {
        Box::pin(async move {
            self.runs.lock().unwrap().push(request.argv);

            if let Some(message) = &self.fault {
                return Err(InvocationError::EngineFault {
                    message: message.clone(),
                    stack: Some(format!("Error: {message}\n    at tsc.js:1:1")),
                });
            }

            Ok(EngineExit {
                status: self.status,
                stdout: Vec::new(),
                stderr: Vec::new(),
            })
        })
    }
}

/// A one-script compiler program named `tsc.js`.
pub fn fake_scripts() -> CompilerScripts {
    CompilerScripts::from_sources(
        "node_modules/typescript/lib/tsc.js",
        vec![Script {
            name: "tsc.js".to_string(),
            source: "// compiler".to_string(),
        }],
    )
}
