// crates/hexaville-core/src/runtime/planner.rs
// ============================================================================
// Module: Deletion Planner
// Description: Diffs remote resources and methods against the route manifest.
// Purpose: Classify stale remote state for reporting and safe pruning.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`plan_deletions`] is pure: it inspects resource paths and method sets
//! only, never integrations or responses. [`prune_plan`] turns the advisory
//! candidates into concrete delete calls, refusing to remove a resource that
//! something declared still depends on.
//!
//! ## Invariants
//! - Resources without methods are never candidates.
//! - Method comparison is case-insensitive.
//! - The root resource and ancestors of declared paths are never deleted
//!   whole; only their stale methods are.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::DeletionCandidate;
use crate::core::RemoteResource;
use crate::core::RouteEntry;
use crate::core::RouteManifest;

// ============================================================================
// SECTION: Planning
// ============================================================================

/// Computes deletion candidates for `resources` against `manifest`.
#[must_use]
pub fn plan_deletions(
    manifest: &RouteManifest,
    resources: &[RemoteResource],
) -> Vec<DeletionCandidate> {
    let mut candidates = Vec::new();
    for resource in resources {
        if resource.methods.is_empty() {
            continue;
        }
        let declared: BTreeSet<String> = manifest
            .entries_for_path(&resource.path)
            .map(RouteEntry::normalized_method)
            .collect();
        if declared.is_empty() {
            candidates.push(DeletionCandidate {
                resource: resource.clone(),
                should_delete_whole_resource: true,
                methods_to_delete: Vec::new(),
            });
            continue;
        }
        let stale: Vec<String> = resource
            .methods
            .iter()
            .filter(|method| !declared.contains(&method.to_ascii_uppercase()))
            .cloned()
            .collect();
        if stale.is_empty() {
            continue;
        }
        let whole = stale.len() == resource.methods.len();
        candidates.push(DeletionCandidate {
            resource: resource.clone(),
            should_delete_whole_resource: whole,
            methods_to_delete: stale,
        });
    }
    candidates
}

// ============================================================================
// SECTION: Pruning
// ============================================================================

/// Concrete delete calls derived from deletion candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrunePlan {
    /// Individual methods to delete, as (resource, method).
    pub methods: Vec<(RemoteResource, String)>,
    /// Whole resources to delete.
    pub resources: Vec<RemoteResource>,
}

impl PrunePlan {
    /// Returns true when there is nothing to delete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.resources.is_empty()
    }
}

/// Builds the prune plan, downgrading unsafe whole-resource deletions.
#[must_use]
pub fn prune_plan(manifest: &RouteManifest, candidates: &[DeletionCandidate]) -> PrunePlan {
    let mut plan = PrunePlan::default();
    for candidate in candidates {
        let resource = &candidate.resource;
        let still_referenced = resource.is_root() || manifest.has_descendant_of(&resource.path);
        if candidate.should_delete_whole_resource && !still_referenced {
            plan.resources.push(resource.clone());
            continue;
        }
        let methods: Vec<String> = if candidate.should_delete_whole_resource {
            resource.methods.iter().cloned().collect()
        } else {
            candidate.methods_to_delete.clone()
        };
        for method in methods {
            plan.methods.push((resource.clone(), method));
        }
    }
    plan
}
