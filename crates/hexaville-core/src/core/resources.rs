// crates/hexaville-core/src/core/resources.rs
// ============================================================================
// Module: Remote Resource Index
// Description: Snapshot of the gateway resource tree for one deployment run.
// Purpose: Give the resolver and planner a typed, append-stable resource list.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The index is fetched fresh at the start of each run and keeps the order in
//! which the provider listed resources. Resources created during the run are
//! appended, so later routes sharing a prefix reuse them instead of creating
//! duplicates.
//!
//! ## Invariants
//! - The root resource has `path == "/"` and no parent.
//! - Appending never reorders existing entries and never duplicates an id.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ResourceId;
use crate::core::manifest::ROOT_PATH;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One path-segment node in the gateway resource tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    /// Provider-assigned resource id.
    pub id: ResourceId,
    /// Full path of the resource, `/` for the root.
    pub path: String,
    /// Last path segment; `/` for the root.
    pub path_part: String,
    /// Parent resource id; `None` for the root.
    pub parent_id: Option<ResourceId>,
    /// Upper-case HTTP methods configured on the resource.
    pub methods: BTreeSet<String>,
}

impl RemoteResource {
    /// Returns true when this is the gateway root resource.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    /// Returns true when `method` is configured (case-insensitive).
    #[must_use]
    pub fn has_method(&self, method: &str) -> bool {
        let upper = method.to_uppercase();
        self.methods.iter().any(|existing| existing.to_uppercase() == upper)
    }
}

/// Per-segment resolution record built while walking a route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPathSegment {
    /// Path segment text.
    pub path_part: String,
    /// Upper-case method; set only on the terminal segment.
    pub method: Option<String>,
    /// Resource that already existed for this segment, if any.
    pub existing_resource: Option<RemoteResource>,
    /// Resource the segment hangs from.
    pub parent_resource: Option<RemoteResource>,
}

/// Ordered snapshot of remote resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    /// Resources in provider listing order, then creation order.
    resources: Vec<RemoteResource>,
}

// ============================================================================
// SECTION: Implementation
// ============================================================================

impl ResourceIndex {
    /// Builds an index from a provider listing.
    #[must_use]
    pub const fn new(resources: Vec<RemoteResource>) -> Self {
        Self {
            resources,
        }
    }

    /// Returns the root resource, if listed.
    #[must_use]
    pub fn root(&self) -> Option<&RemoteResource> {
        self.resources.iter().find(|resource| resource.is_root())
    }

    /// Finds the first resource for `segment` directly under `parent`.
    ///
    /// A candidate matches when its `path_part` equals the segment and its
    /// path is the parent's path extended by that segment.
    #[must_use]
    pub fn find_child(&self, parent: &RemoteResource, segment: &str) -> Option<&RemoteResource> {
        let expected = child_path(&parent.path, segment);
        self.resources
            .iter()
            .find(|resource| resource.path_part == segment && resource.path == expected)
    }

    /// Finds a resource by exact path.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&RemoteResource> {
        self.resources.iter().find(|resource| resource.path == path)
    }

    /// Appends a newly created resource unless its id is already present.
    pub fn push(&mut self, resource: RemoteResource) {
        if !self.resources.iter().any(|existing| existing.id == resource.id) {
            self.resources.push(resource);
        }
    }

    /// Records a method on an indexed resource; unknown ids are ignored.
    pub fn record_method(&mut self, resource_id: &ResourceId, method: &str) {
        if let Some(resource) =
            self.resources.iter_mut().find(|resource| resource.id == *resource_id)
        {
            resource.methods.insert(method.to_ascii_uppercase());
        }
    }

    /// Returns the resources in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[RemoteResource] {
        &self.resources
    }

    /// Returns the number of indexed resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true when the index holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Consumes the index, returning the resources.
    #[must_use]
    pub fn into_inner(self) -> Vec<RemoteResource> {
        self.resources
    }
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Splits a route path into segments; the root path is the single segment `/`.
#[must_use]
pub fn split_path(path: &str) -> Vec<String> {
    let segments: Vec<String> =
        path.split('/').filter(|segment| !segment.is_empty()).map(str::to_string).collect();
    if segments.is_empty() {
        vec![ROOT_PATH.to_string()]
    } else {
        segments
    }
}

/// Joins a parent path and a child segment.
#[must_use]
pub fn child_path(parent: &str, segment: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}
