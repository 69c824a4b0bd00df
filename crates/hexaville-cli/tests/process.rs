// crates/hexaville-cli/tests/process.rs
// ============================================================================
// Module: External Process Tests
// Description: Exit status mapping, PATH lookup, and cancellation.
// Purpose: Ensure interrupted builds stop their children.
// Dependencies: hexaville-cli, tempfile, tokio, tokio-util
// ============================================================================

//! ## Overview
//! Runs short `sh` commands through the process runner.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use hexaville_cli::process::ProcessError;
use hexaville_cli::process::find_executable;
use hexaville_cli::process::run_command;
use tokio_util::sync::CancellationToken;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests that common programs are found on PATH.
#[test]
fn find_executable_locates_sh() {
    let path = find_executable("sh").unwrap();
    assert!(path.is_file());
}

/// Tests that unknown programs are reported.
#[test]
fn find_executable_reports_missing() {
    let result = find_executable("hexaville-definitely-not-installed");
    assert_eq!(
        result,
        Err(ProcessError::NotFound("hexaville-definitely-not-installed".to_string()))
    );
}

/// Tests that a zero exit status succeeds.
#[tokio::test(flavor = "multi_thread")]
async fn run_command_succeeds() {
    let sh = find_executable("sh").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let args = vec!["-c".to_string(), "echo ok > marker".to_string()];

    run_command(&sh, &args, dir.path(), &CancellationToken::new()).await.unwrap();

    assert!(dir.path().join("marker").is_file());
}

/// Tests that non-zero exit codes are surfaced.
#[tokio::test(flavor = "multi_thread")]
async fn run_command_reports_exit_code() {
    let sh = find_executable("sh").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let args = vec!["-c".to_string(), "exit 3".to_string()];

    let result = run_command(&sh, &args, dir.path(), &CancellationToken::new()).await;

    assert!(matches!(result, Err(ProcessError::Failed { code: 3, .. })));
}

/// Tests that cancellation kills a long-running child promptly.
#[tokio::test(flavor = "multi_thread")]
async fn run_command_stops_on_cancel() {
    let sh = find_executable("sh").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let args = vec!["-c".to_string(), "sleep 30".to_string()];
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = run_command(&sh, &args, dir.path(), &cancel).await;

    assert!(matches!(result, Err(ProcessError::Interrupted(_))));
    assert!(started.elapsed() < Duration::from_secs(10));
}
