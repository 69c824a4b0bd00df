// crates/hexaville-core/src/runtime/sinks.rs
// ============================================================================
// Module: Deploy Event Sinks
// Description: In-process sinks for deployment progress events.
// Purpose: Provide a discarding sink and a recording sink for tests.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Output-facing sinks (console, JSON lines, files) live with the CLI. This
//! module only carries the sinks the engine itself and its tests need.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use crate::core::DeployEvent;
use crate::core::DeployEventKind;
use crate::interfaces::DeployEventSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDeploySink;

impl DeployEventSink for NoopDeploySink {
    fn record(&self, _event: &DeployEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingDeploySink {
    /// Recorded events shared across clones.
    events: Arc<Mutex<Vec<DeployEvent>>>,
}

impl RecordingDeploySink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// Returns the recorded event kinds in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<DeployEventKind> {
        self.events().into_iter().map(|event| event.event).collect()
    }

    /// Counts recorded events of one kind.
    #[must_use]
    pub fn count(&self, kind: DeployEventKind) -> usize {
        self.events().iter().filter(|event| event.event == kind).count()
    }
}

impl DeployEventSink for RecordingDeploySink {
    fn record(&self, event: &DeployEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
    }
}
