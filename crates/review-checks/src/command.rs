//! Subprocess execution for tool-backed checks.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::debug;

use crate::error::{CheckError, Result};

/// A tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCommand {
    /// Tool name used in logs and errors.
    pub tool: String,

    /// Command to execute (first element is the executable).
    pub command: Vec<String>,

    /// Timeout in seconds, 0 disables it.
    pub timeout_secs: u64,
}

impl ToolCommand {
    pub fn new(tool: impl Into<String>, command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            tool: tool.into(),
            command,
            timeout_secs,
        }
    }
}

/// Captured result of a finished tool process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code, -1 when killed by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ToolOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `cmd` with `extra_args` appended and capture its output.
///
/// A non-zero exit status is not an error here; callers decide which
/// statuses their tool uses for findings.
pub async fn run_tool(cmd: &ToolCommand, extra_args: &[String]) -> Result<ToolOutput> {
    let start = Instant::now();

    let (exe, args) = cmd
        .command
        .split_first()
        .ok_or_else(|| CheckError::EmptyCommand(cmd.tool.clone()))?;

    let mut command = Command::new(exe);
    command
        .args(args)
        .args(extra_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(tool = %cmd.tool, exe = %exe, "Spawning tool");
    let child = command.spawn().map_err(|source| CheckError::Spawn {
        tool: cmd.tool.clone(),
        source,
    })?;

    let output = if cmd.timeout_secs > 0 {
        tokio::time::timeout(
            Duration::from_secs(cmd.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| CheckError::Timeout {
            tool: cmd.tool.clone(),
            secs: cmd.timeout_secs,
        })??
    } else {
        child.wait_with_output().await?
    };

    Ok(ToolOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
