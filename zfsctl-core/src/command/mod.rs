// zfsctl-core/src/command/mod.rs

//! Subprocess execution seam.
//!
//! Clients build an argument vector and hand it to a [`CommandRunner`]; the
//! runner owns process spawning and output capture. [`ProcessRunner`] is the
//! real implementation; tests substitute a recording fake so argument vectors
//! and parsing can be checked without `zfs` installed.

pub mod process;

pub use process::ProcessRunner;

use crate::errors::{Result, ZfsError};
use crate::utils::compact_lines;
use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

/// Represents the structured output of an executed external command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    /// The exit status code of the command (`-1` if it was killed by a signal).
    pub status: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Checks if the command executed successfully (status code 0).
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs one program with an explicit argument vector and captures its output.
///
/// A non-zero exit is *not* an error at this layer; only failing to spawn or
/// read the process is. Callers decide how to treat the status.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// Runs `program` and applies the exit-status policy shared by both clients:
/// zero yields stdout, non-zero yields [`ZfsError::CommandFailed`] carrying the
/// compacted stderr (stdout is discarded).
pub(crate) async fn run_checked(
    runner: &dyn CommandRunner,
    program: &Path,
    args: &[String],
) -> Result<String> {
    let output = runner.run(program, args).await?;
    if output.success() {
        return Ok(output.stdout);
    }

    let mut message = compact_lines(&output.stderr);
    if message.is_empty() {
        message = format!("{} exited with status {}", program.display(), output.status);
    }
    warn!(program = %program.display(), status = output.status, error = %message, "Command failed");
    Err(ZfsError::CommandFailed {
        program: program.to_path_buf(),
        status: output.status,
        message,
    })
}
