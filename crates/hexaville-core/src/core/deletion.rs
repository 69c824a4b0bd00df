// crates/hexaville-core/src/core/deletion.rs
// ============================================================================
// Module: Deletion Candidates
// Description: Classification of remote resources against the manifest.
// Purpose: Carry the planner's output and summarize it for reporting.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`DeletionCandidate`] is produced for every remote resource that has at
//! least one method. When `should_delete_whole_resource` is set, the listed
//! methods are informational only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::resources::RemoteResource;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Planner verdict for one remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionCandidate {
    /// The remote resource under consideration.
    pub resource: RemoteResource,
    /// True when no manifest route uses the resource any more.
    pub should_delete_whole_resource: bool,
    /// Methods no longer declared for this path.
    pub methods_to_delete: Vec<String>,
}

impl DeletionCandidate {
    /// Returns true when the candidate requires no action.
    #[must_use]
    pub fn is_keep(&self) -> bool {
        !self.should_delete_whole_resource && self.methods_to_delete.is_empty()
    }
}

/// Aggregate counts over a deletion plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    /// Paths of resources flagged for whole deletion.
    pub deleted_resources: Vec<String>,
    /// `(path, method)` pairs flagged individually.
    pub deleted_methods: Vec<(String, String)>,
}

impl DeletionSummary {
    /// Summarizes a set of candidates.
    #[must_use]
    pub fn from_candidates(candidates: &[DeletionCandidate]) -> Self {
        let mut summary = Self::default();
        for candidate in candidates {
            if candidate.should_delete_whole_resource {
                summary.deleted_resources.push(candidate.resource.path.clone());
                continue;
            }
            for method in &candidate.methods_to_delete {
                summary.deleted_methods.push((candidate.resource.path.clone(), method.clone()));
            }
        }
        summary
    }

    /// Returns the one-line headline used in progress output.
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "There are {} deleted resources and {} deleted methods.",
            self.deleted_resources.len(),
            self.deleted_methods.len()
        )
    }

    /// Returns true when nothing is flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deleted_resources.is_empty() && self.deleted_methods.is_empty()
    }
}
