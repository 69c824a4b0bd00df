// crates/hexaville-cli/src/process.rs
// ============================================================================
// Module: External Processes
// Description: Cancellable child-process execution.
// Purpose: Run docker commands that stop when the operator interrupts.
// Dependencies: thiserror, tokio, tokio-util
// ============================================================================

//! ## Overview
//! Build steps shell out to external tools. Children inherit the terminal so
//! their output streams live, and they are killed when the cancellation
//! token fires or the future is dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// External process failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// The program could not be found on `PATH`.
    #[error("{0} was not found in PATH")]
    NotFound(String),
    /// The program could not be started.
    #[error("failed to start {program}: {error}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying error text.
        error: String,
    },
    /// The run was cancelled and the child killed.
    #[error("{0} was interrupted")]
    Interrupted(String),
    /// The program exited unsuccessfully.
    #[error("{program} exited with status {code}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
    },
}

// ============================================================================
// SECTION: Lookup
// ============================================================================

/// Finds `program` in the directories listed by `PATH`.
///
/// # Errors
///
/// Returns [`ProcessError::NotFound`] when no directory holds the program.
pub fn find_executable(program: &str) -> Result<PathBuf, ProcessError> {
    let Some(search_path) = env::var_os("PATH") else {
        return Err(ProcessError::NotFound(program.to_string()));
    };
    env::split_paths(&search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ProcessError::NotFound(program.to_string()))
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs `program` with `args` in `cwd` until it exits or `cancel` fires.
///
/// # Errors
///
/// Returns [`ProcessError`] when the program cannot start, is cancelled, or
/// exits with a non-zero status.
pub async fn run_command(
    program: &Path,
    args: &[String],
    cwd: &Path,
    cancel: &CancellationToken,
) -> Result<(), ProcessError> {
    let name = program.display().to_string();
    let mut command = Command::new(program);
    command.args(args);
    command.current_dir(cwd);
    command.kill_on_drop(true);
    command.stdin(Stdio::null());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let mut child = command.spawn().map_err(|err| ProcessError::Spawn {
        program: name.clone(),
        error: err.to_string(),
    })?;

    tokio::select! {
        () = cancel.cancelled() => {
            let _ = child.kill().await;
            Err(ProcessError::Interrupted(name))
        }
        status = child.wait() => {
            let status = status.map_err(|err| ProcessError::Spawn {
                program: name.clone(),
                error: err.to_string(),
            })?;
            if status.success() {
                Ok(())
            } else {
                Err(ProcessError::Failed {
                    program: name,
                    code: status.code().unwrap_or(-1),
                })
            }
        }
    }
}
