//! External command execution
//!
//! Thin wrapper around `tokio::process::Command` with consistent error handling and
//! logging. Used for the local container CLI and the AWS CLI.

use crate::error::{MirrorError, Result};
use crate::logging::Logger;
use tokio::process::Command;

/// Runs one program with varying arguments and captures its output.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    fail_on_stderr: bool,
    logger: Logger,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, logger: Logger) -> Self {
        Self {
            program: program.into(),
            fail_on_stderr: false,
            logger,
        }
    }

    /// Treat any stderr output as a failure, even with a zero exit status.
    pub fn with_fail_on_stderr(mut self, fail_on_stderr: bool) -> Self {
        self.fail_on_stderr = fail_on_stderr;
        self
    }

    /// Execute the command and return its stdout.
    pub async fn run(&self, args: &[String]) -> Result<String> {
        self.logger.debug(&format!("Executing: {} {}", self.program, args.join(" ")));

        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                MirrorError::command(&self.program, args, format!("failed to start: {}", e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            self.logger.detail(line);
        }

        if !output.status.success() {
            return Err(MirrorError::command(
                &self.program,
                args,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        if !stderr.trim().is_empty() {
            if self.fail_on_stderr {
                return Err(MirrorError::command(
                    &self.program,
                    args,
                    format!("wrote to stderr: {}", stderr.trim()),
                ));
            }
            for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                self.logger.detail(line);
            }
        }

        Ok(stdout)
    }
}
