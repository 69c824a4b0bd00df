// crates/hexaville-cli/tests/events.rs
// ============================================================================
// Module: Deploy Event Sink Tests
// Description: Console rendering, JSON-lines files, and fan-out.
// Purpose: Ensure deploy progress reaches every configured sink.
// Dependencies: hexaville-cli, hexaville-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Feeds synthetic deploy events through each sink and inspects the output.

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

use std::fs;
use std::sync::Arc;

use hexaville_cli::events::ConsoleDeploySink;
use hexaville_cli::events::FanoutDeploySink;
use hexaville_cli::events::FileDeploySink;
use hexaville_cli::events::render_event;
use hexaville_core::DeployEvent;
use hexaville_core::DeployEventKind;
use hexaville_core::DeployEventSink;
use hexaville_core::DeployPhase;
use hexaville_core::RecordingDeploySink;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a method-level event.
fn method_created() -> DeployEvent {
    DeployEvent::new(DeployEventKind::MethodCreated, DeployPhase::ReconcileRoutes)
        .with_subject("/hello")
        .with_method("GET")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests that route events render with method and path.
#[test]
fn render_includes_method_and_subject() {
    assert_eq!(render_event(&method_created()).as_deref(), Some("Created method GET /hello"));
}

/// Tests that phase starts render with the phase label.
#[test]
fn render_phase_started() {
    let event = DeployEvent::new(DeployEventKind::PhaseStarted, DeployPhase::PruneMethods);
    assert_eq!(render_event(&event).as_deref(), Some("==> prune_methods"));
}

/// Tests that response bookkeeping events are not rendered.
#[test]
fn render_skips_response_events() {
    let event =
        DeployEvent::new(DeployEventKind::MethodResponseCreated, DeployPhase::ReconcileRoutes);
    assert_eq!(render_event(&event), None);
}

/// Tests that the deletion plan renders its detail line verbatim.
#[test]
fn render_deletion_plan_uses_detail() {
    let event = DeployEvent::new(DeployEventKind::DeletionPlanned, DeployPhase::PruneMethods)
        .with_detail("1 resources and 2 methods will be deleted");
    assert_eq!(
        render_event(&event).as_deref(),
        Some("1 resources and 2 methods will be deleted")
    );
}

/// Tests that the console sink writes one line per rendered event.
#[test]
fn console_sink_writes_lines() {
    let sink = ConsoleDeploySink::new(Vec::new());
    sink.record(&method_created());
    sink.record(&DeployEvent::new(DeployEventKind::DeployCompleted, DeployPhase::Done));
    sink.record(
        &DeployEvent::new(DeployEventKind::DeploymentPublished, DeployPhase::PublishDeployment)
            .with_subject("staging"),
    );
    let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(output, "Created method GET /hello\nPublished stage staging\n");
}

/// Tests that the file sink appends one JSON object per line.
#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let sink = FileDeploySink::new(&path).unwrap();
        sink.record(&method_created());
    }
    {
        let sink = FileDeploySink::new(&path).unwrap();
        sink.record(&DeployEvent::new(DeployEventKind::DeployCompleted, DeployPhase::Done));
    }
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> =
        content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "method_created");
    assert_eq!(lines[0]["phase"], "reconcile_routes");
    assert_eq!(lines[0]["method"], "GET");
    assert_eq!(lines[1]["event"], "deploy_completed");
}

/// Tests that fan-out forwards each event to every sink in order.
#[test]
fn fanout_forwards_to_every_sink() {
    let first = Arc::new(RecordingDeploySink::default());
    let second = Arc::new(RecordingDeploySink::default());
    let fanout = FanoutDeploySink::new()
        .with(Box::new(Arc::clone(&first)))
        .with(Box::new(Arc::clone(&second)));
    assert_eq!(fanout.len(), 2);

    fanout.record(&method_created());

    assert_eq!(first.events().len(), 1);
    assert_eq!(second.events().len(), 1);
    assert_eq!(second.events()[0].event, DeployEventKind::MethodCreated);
}

/// Tests that an empty fan-out accepts events.
#[test]
fn empty_fanout_is_a_noop() {
    let fanout = FanoutDeploySink::new();
    assert!(fanout.is_empty());
    fanout.record(&method_created());
}
