//! Command execution
//!
//! Every external command the pipeline runs goes through a [`CommandRunner`],
//! so stages can be exercised without spawning processes (see
//! [`DryRunRunner`]).

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::AdapterError;

/// How a single command is run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Working directory (inherits the current one when unset)
    pub cwd: Option<PathBuf>,

    /// Treat a non-zero exit code as an error
    pub fail_on_error: bool,

    /// Log the captured output at info level instead of debug
    pub log_output: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            fail_on_error: true,
            log_output: false,
        }
    }
}

impl RunOptions {
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            ..Default::default()
        }
    }
}

/// Result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: i32,
    /// stdout followed by stderr
    pub output: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait CommandRunner {
    /// Run a shell command line and report its outcome
    fn run(&self, cmd: &str, opts: &RunOptions) -> Result<CommandOutcome, AdapterError>;
}

/// Runs commands through `sh -c`
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, cmd: &str, opts: &RunOptions) -> Result<CommandOutcome, AdapterError> {
        let start = Instant::now();
        info!(operation = "run", command = %cmd, "running command");

        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd);
        if let Some(cwd) = &opts.cwd {
            command.current_dir(cwd);
        }

        let output = command.output().map_err(|e| {
            AdapterError::io(opts.cwd.clone().unwrap_or_else(|| PathBuf::from(".")), e)
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let outcome = CommandOutcome {
            // Killed by a signal
            exit_code: output.status.code().unwrap_or(-1),
            output: text,
        };

        if opts.log_output {
            info!(command = %cmd, output = %outcome.output.trim_end(), "command output");
        } else {
            debug!(command = %cmd, output = %outcome.output.trim_end(), "command output");
        }

        finish(cmd, opts, outcome, start)
    }
}

/// Logs commands without running them
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, cmd: &str, opts: &RunOptions) -> Result<CommandOutcome, AdapterError> {
        let cwd = opts
            .cwd
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ".".to_string());
        info!(operation = "run", status = "dry_run", command = %cmd, cwd = %cwd, "would run command");

        Ok(CommandOutcome {
            exit_code: 0,
            output: String::new(),
        })
    }
}

fn finish(
    cmd: &str,
    opts: &RunOptions,
    outcome: CommandOutcome,
    start: Instant,
) -> Result<CommandOutcome, AdapterError> {
    let elapsed = start.elapsed().as_secs_f64();

    if outcome.success() {
        info!(
            operation = "run",
            status = "success",
            command = %cmd,
            duration_s = %format!("{:.2}", elapsed),
            "command finished"
        );
        return Ok(outcome);
    }

    if opts.fail_on_error {
        return Err(AdapterError::CommandFailed {
            command: cmd.to_string(),
            exit_code: outcome.exit_code,
            output: outcome.output,
        });
    }

    warn!(
        operation = "run",
        status = "error",
        command = %cmd,
        exit_code = outcome.exit_code,
        "command failed (ignored)"
    );
    Ok(outcome)
}

/// Resolve a command name on PATH, logging the outcome
///
/// Only used for diagnostics: a missing command is reported and otherwise
/// ignored.
pub fn probe_command(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => {
            info!(operation = "probe", status = "success", command = name, path = %path.display(), "found existing command");
            Some(path)
        }
        Err(e) => {
            warn!(operation = "probe", status = "miss", command = name, error = %e, "command not found on PATH");
            None
        }
    }
}
