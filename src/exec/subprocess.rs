//! Subprocess execution

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        let exit_code = status.code().unwrap_or(-1);
        Self {
            success: status.success(),
            exit_code,
            stdout,
            stderr,
            duration,
        }
    }
}

/// Run a command in `cwd`, either inheriting the terminal or capturing output
///
/// With `inherit_io` the child writes straight to the terminal and the
/// captured `stdout`/`stderr` are empty.
pub fn run_command(program: &str, args: &[&str], cwd: &Path, inherit_io: bool) -> Result<CommandResult> {
    let start = Instant::now();
    let stdio = || if inherit_io { Stdio::inherit() } else { Stdio::piped() };

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(if inherit_io { Stdio::inherit() } else { Stdio::null() })
        .stdout(stdio())
        .stderr(stdio())
        .output()
        .with_context(|| format!("Failed to execute {}", program))?;

    Ok(CommandResult::from_status(
        output.status,
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        start.elapsed(),
    ))
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command("pwd", &[], dir.path(), false).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        let printed = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(printed, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_reports_failure_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command("sh", &["-c", "exit 3"], dir.path(), false).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
    }

    #[test]
    fn test_inherited_output_is_not_captured() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command("sh", &["-c", "echo generated"], dir.path(), true).unwrap();
        assert!(result.success);
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_command("definitely-not-a-real-tool-42", &[], dir.path(), false).is_err());
        assert!(!command_exists("definitely-not-a-real-tool-42"));
    }
}
