//! Step execution: one blocking child process per call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::classify::Verdict;
use crate::command::CommandSpec;
use crate::error::{HarnessError, HarnessResult};

/// Raw result of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `-1` when the child was killed by a signal.
    pub exit_code: i32,

    /// Full stdout when capture was requested.
    pub stdout: Option<String>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns a command and waits for it to exit.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn launch(
        &self,
        command: &CommandSpec,
        dir: &Path,
        capture: bool,
    ) -> std::io::Result<ProcessOutput>;
}

/// Launches real operating-system processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

#[async_trait]
impl ProcessLauncher for SystemLauncher {
    async fn launch(
        &self,
        command: &CommandSpec,
        dir: &Path,
        capture: bool,
    ) -> std::io::Result<ProcessOutput> {
        let exe = command.program().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command")
        })?;

        let mut cmd = Command::new(exe);
        cmd.args(command.args()).current_dir(dir);

        if capture {
            let output = cmd.stdout(Stdio::piped()).spawn()?.wait_with_output().await?;
            Ok(ProcessOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            })
        } else {
            let status = cmd.spawn()?.wait().await?;
            Ok(ProcessOutput {
                exit_code: status.code().unwrap_or(-1),
                stdout: None,
            })
        }
    }
}

/// Outcome of a step that ran to completion with exit code 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: String,
    pub exit_code: i32,
    pub stdout: Option<String>,

    /// Content verdict; set only for steps whose output is classified.
    pub verdict: Option<Verdict>,
}

impl StepOutcome {
    pub fn passed(&self) -> bool {
        self.exit_code == 0 && self.verdict.map_or(true, |v| v.is_pass())
    }
}

/// Runs commands through a [`ProcessLauncher`], turning non-zero exits
/// into [`HarnessError::ProcessFailed`].
#[derive(Clone)]
pub struct StepRunner {
    launcher: Arc<dyn ProcessLauncher>,
}

impl StepRunner {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self { launcher }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemLauncher))
    }

    pub async fn run(
        &self,
        step: &str,
        command: &CommandSpec,
        dir: &Path,
        capture: bool,
    ) -> HarnessResult<StepOutcome> {
        if command.is_empty() {
            return Err(HarnessError::EmptyCommand {
                step: step.to_string(),
            });
        }

        debug!(step, command = %command, dir = %dir.display(), capture, "Spawning step");
        let output = self
            .launcher
            .launch(command, dir, capture)
            .await
            .map_err(|source| HarnessError::Spawn {
                step: step.to_string(),
                source,
            })?;

        if !output.success() {
            warn!(step, exit_code = output.exit_code, "Step process failed");
            return Err(HarnessError::ProcessFailed {
                step: step.to_string(),
                exit_code: output.exit_code,
            });
        }

        Ok(StepOutcome {
            step: step.to_string(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            verdict: None,
        })
    }
}
