// zfsctl-core/src/command/process.rs

//! [`CommandRunner`] backed by a tokio child process.

use super::{CommandOutput, CommandRunner};
use crate::config::DEFAULT_MAX_OUTPUT_BYTES;
use crate::errors::{Result, ZfsError};
use crate::utils::preview_lines;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Spawns the program directly (no shell) and buffers stdout and stderr, each
/// up to `max_output_bytes`. A process that writes more is killed.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    max_output_bytes: usize,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OUTPUT_BYTES)
    }
}

impl ProcessRunner {
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }
}

enum CaptureError {
    Io(std::io::Error),
    TooLarge,
}

async fn read_capped<R>(reader: Option<R>, limit: usize) -> std::result::Result<Vec<u8>, CaptureError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(reader) = reader {
        reader
            .take(limit as u64 + 1)
            .read_to_end(&mut buf)
            .await
            .map_err(CaptureError::Io)?;
    }
    if buf.len() > limit {
        return Err(CaptureError::TooLarge);
    }
    Ok(buf)
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        debug!("Executing: {} {}", program.display(), args.join(" "));

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(source) => {
                warn!(program = %program.display(), error = %source, "Failed to spawn command process");
                return Err(ZfsError::Spawn {
                    program: program.to_path_buf(),
                    source,
                });
            }
        };

        let limit = self.max_output_bytes;
        let captured = tokio::try_join!(
            read_capped(child.stdout.take(), limit),
            read_capped(child.stderr.take(), limit),
        );
        let (stdout, stderr) = match captured {
            Ok(streams) => streams,
            Err(CaptureError::TooLarge) => {
                warn!(program = %program.display(), limit, "Output ceiling exceeded; killing process");
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(ZfsError::OutputTooLarge {
                    program: program.to_path_buf(),
                    limit,
                });
            }
            Err(CaptureError::Io(e)) => {
                let _ = child.start_kill();
                return Err(ZfsError::Io(e));
            }
        };

        let status = child.wait().await?.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&stdout).to_string();
        let stderr = String::from_utf8_lossy(&stderr).to_string();

        debug!(
            "{} exit status: {}\nStdout preview: {}\nStderr preview: {}",
            program.display(),
            status,
            preview_lines(&stdout, 3),
            preview_lines(&stderr, 3)
        );

        Ok(CommandOutput {
            status,
            stdout,
            stderr,
        })
    }
}
