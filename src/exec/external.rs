// src/exec/external.rs

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::errors::InvocationError;
use crate::exec::process::{stream_output, ProcessOutput};
use crate::exec::InvocationResult;
use crate::types::Strategy;

/// Runs a compiler executable found on the search path.
#[derive(Debug, Clone)]
pub struct ExternalCompiler {
    executable: String,
}

impl ExternalCompiler {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Run the executable with `args` and wait for it to exit.
    ///
    /// Only a process that cannot be started is an error; a non-zero exit
    /// status is returned in the result for the caller to judge.
    pub async fn run(&self, args: &[String]) -> Result<InvocationResult, InvocationError> {
        let mut command_line = Vec::with_capacity(args.len() + 1);
        command_line.push(self.executable.clone());
        command_line.extend(args.iter().cloned());

        info!("Using external compiler to run command: {}", command_line.join(" "));
        debug!(?command_line, "About to execute command");

        let mut cmd = Command::new(&self.executable);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|source| InvocationError::LaunchFailure {
                executable: self.executable.clone(),
                source,
            })?;

        // After a successful spawn every failure is a failed run.
        let output = match stream_output(child, &self.executable).await {
            Ok(output) => output,
            Err(e) => {
                error!("Lost track of {} after launch: {e}", self.executable);
                ProcessOutput {
                    status: -1,
                    ..ProcessOutput::default()
                }
            }
        };

        if output.status != 0 {
            error!(
                "Failed to execute {}. Return code: {}",
                self.executable, output.status
            );
        } else {
            debug!(executable = %self.executable, "compiler finished successfully");
        }

        Ok(InvocationResult {
            strategy: Strategy::External,
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
