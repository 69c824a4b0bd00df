// crates/hexaville-cli/src/events.rs
// ============================================================================
// Module: Deploy Event Sinks
// Description: Console, JSON-lines, and file renderers for deploy events.
// Purpose: Surface deployment progress to operators and log collectors.
// Dependencies: hexaville-core, serde_json
// ============================================================================

//! ## Overview
//! The deployer reports progress through [`DeployEventSink`]. The CLI wires
//! a human-readable console sink by default, optionally fanned out with a
//! JSON-lines stream on stderr and an append-only JSON-lines file.
//!
//! ## Invariants
//! - Sinks never fail the deployment: write errors are swallowed.
//! - JSON payloads are one event per line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use hexaville_core::DeployEvent;
use hexaville_core::DeployEventKind;
use hexaville_core::DeployEventSink;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a deploy event as a console line.
///
/// Returns `None` for events that are not worth a line of their own.
#[must_use]
pub fn render_event(event: &DeployEvent) -> Option<String> {
    let subject = event.subject.as_deref().unwrap_or_default();
    let method = event.method.as_deref().unwrap_or_default();
    let line = match event.event {
        DeployEventKind::PhaseStarted => format!("==> {}", event.phase),
        DeployEventKind::BucketCreated => format!("Created bucket {subject}"),
        DeployEventKind::BucketExists => format!("Using bucket {subject}"),
        DeployEventKind::PackageUploaded => format!("Uploaded package to {subject}"),
        DeployEventKind::RoleCreated => format!("Created role {subject}"),
        DeployEventKind::RolePolicyAttached => format!("Attached logging policy to {subject}"),
        DeployEventKind::FunctionCreated => format!("Created function {subject}"),
        DeployEventKind::FunctionUpdated => format!("Updated function {subject}"),
        DeployEventKind::RestApiCreated => format!("Created rest api {subject}"),
        DeployEventKind::BinaryMediaTypesPatched => {
            format!("Enabled binary media types on {subject}")
        }
        DeployEventKind::ResourceCreated => format!("Created resource {subject}"),
        DeployEventKind::MethodCreated => format!("Created method {method} {subject}"),
        DeployEventKind::IntegrationCreated => format!("Created integration {method} {subject}"),
        DeployEventKind::IntegrationUriPatched => {
            format!("Updated integration uri {method} {subject}")
        }
        DeployEventKind::IntegrationResponseCreated
        | DeployEventKind::MethodResponseCreated
        | DeployEventKind::DeployCompleted => return None,
        DeployEventKind::DeletionPlanned => event.detail.clone()?,
        DeployEventKind::MethodDeleted => format!("Deleted method {method} {subject}"),
        DeployEventKind::PermissionAdded => format!("Granted invoke permission for {subject}"),
        DeployEventKind::PermissionRemoved => format!("Revoked invoke permission for {subject}"),
        DeployEventKind::ResourceDeleted => format!("Deleted resource {subject}"),
        DeployEventKind::DeploymentPublished => format!("Published stage {subject}"),
    };
    Some(line)
}

// ============================================================================
// SECTION: Console Sink
// ============================================================================

/// Human-readable sink writing one line per notable event.
pub struct ConsoleDeploySink<W> {
    /// Output writer.
    writer: Mutex<W>,
}

impl ConsoleDeploySink<io::Stdout> {
    /// Creates a console sink on stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleDeploySink<W> {
    /// Creates a console sink over `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns its writer.
    ///
    /// # Errors
    ///
    /// Returns the writer wrapped in a poison error if a writer panicked.
    pub fn into_inner(self) -> Result<W, std::sync::PoisonError<W>> {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> DeployEventSink for ConsoleDeploySink<W> {
    fn record(&self, event: &DeployEvent) {
        let Some(line) = render_event(event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
        }
    }
}

// ============================================================================
// SECTION: JSON Sinks
// ============================================================================

/// Sink writing JSON lines to stderr.
pub struct StderrJsonDeploySink;

impl DeployEventSink for StderrJsonDeploySink {
    fn record(&self, event: &DeployEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink appending JSON lines to a file.
pub struct FileDeploySink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileDeploySink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DeployEventSink for FileDeploySink {
    fn record(&self, event: &DeployEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

// ============================================================================
// SECTION: Fan-out
// ============================================================================

/// Forwards every event to each inner sink in order.
#[derive(Default)]
pub struct FanoutDeploySink {
    /// Inner sinks.
    sinks: Vec<Box<dyn DeployEventSink>>,
}

impl FanoutDeploySink {
    /// Creates an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    #[must_use]
    pub fn with(mut self, sink: Box<dyn DeployEventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Returns the number of inner sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns true when no sink is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DeployEventSink for FanoutDeploySink {
    fn record(&self, event: &DeployEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}
