//! External program execution.
//!
//! Tools are invoked directly (no intermediate shell) so arguments such as
//! version constraints never need quoting.

use crate::error::{Result, ToolsError};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a program.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Standard output followed by standard error.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

/// Options for program execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout and stderr (if false, inherits from parent).
    pub capture: bool,
}

impl CommandOptions {
    /// Options that capture all output.
    pub fn captured() -> Self {
        Self {
            capture: true,
            ..Default::default()
        }
    }
}

/// Render a program invocation for messages and logs.
pub fn display_command<S: AsRef<OsStr>>(program: impl AsRef<OsStr>, args: &[S]) -> String {
    let mut parts = vec![program.as_ref().to_string_lossy().into_owned()];
    parts.extend(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Run a program to completion.
///
/// A non-zero exit is reported through [`CommandResult::success`], not as
/// an error. Failing to start the program is an `Io` error.
pub fn execute<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program.as_ref());
    cmd.args(args);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }

    tracing::debug!("Running: {}", display_command(program.as_ref(), args));
    let output = cmd.output()?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

/// Run a program and fail with `CommandFailed` on a non-zero exit.
pub fn execute_check<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let result = execute(program.as_ref(), args, options)?;
    if !result.success {
        return Err(ToolsError::CommandFailed {
            command: display_command(program.as_ref(), args),
            code: result.exit_code,
        });
    }
    Ok(result)
}
