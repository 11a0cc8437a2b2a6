//! Subprocess execution
//!
//! All registry interaction goes through an external CLI, so the only I/O
//! boundary in this crate is "run a program, capture its output". The
//! [`CommandRunner`] trait is that boundary; [`TokioRunner`] is the real
//! implementation.

use std::process::Stdio;

#[cfg(test)]
use mockall::automock;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs an external program and captures its output.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion and returns its captured
    /// output. An `Err` means the process could not be spawned or awaited,
    /// not that it exited unsuccessfully.
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by [`tokio::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioRunner;

#[async_trait::async_trait]
impl CommandRunner for TokioRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group so cancelling a check cannot signal our caller
        #[cfg(unix)]
        command.process_group(0);

        let output = command.output().await?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
