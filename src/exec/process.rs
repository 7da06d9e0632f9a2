// src/exec/process.rs

//! Child process output handling shared by both strategies.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tracing::{error, info, warn};

/// Exit status and captured output of a finished child process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub status: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Wait for `child` to exit, forwarding its output to the log line by line
/// (stdout at info, stderr at error) and keeping a copy of every line.
///
/// Both pipes are drained concurrently so neither can fill up and stall
/// the child. Output is decoded lossily, so undecodable bytes never fail
/// the run. A process killed by a signal reports status -1. Only waiting
/// on the child can return an error.
pub async fn stream_output(mut child: Child, label: &str) -> io::Result<ProcessOutput> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stderr_task = {
        let label = label.to_string();
        tokio::spawn(async move {
            match stderr {
                Some(stderr) => drain(stderr, &label, Stream::Stderr).await,
                None => Vec::new(),
            }
        })
    };

    let stdout_lines = match stdout {
        Some(stdout) => drain(stdout, label, Stream::Stdout).await,
        None => Vec::new(),
    };

    let status = child.wait().await?;
    let stderr_lines = stderr_task.await.unwrap_or_default();

    Ok(ProcessOutput {
        status: status.code().unwrap_or(-1),
        stdout: stdout_lines,
        stderr: stderr_lines,
    })
}

async fn drain<R>(reader: R, label: &str, stream: Stream) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut captured = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\n', '\r'])
                    .to_string();
                match stream {
                    Stream::Stdout => info!(compiler = %label, "{}", line),
                    Stream::Stderr => error!(compiler = %label, "{}", line),
                }
                captured.push(line);
            }
            Err(e) => {
                warn!(compiler = %label, ?stream, error = %e, "stopped reading compiler output");
                break;
            }
        }
    }

    captured
}
