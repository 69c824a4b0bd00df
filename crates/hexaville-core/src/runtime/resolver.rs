// crates/hexaville-core/src/runtime/resolver.rs
// ============================================================================
// Module: Resource Path Resolver
// Description: Locates or creates the gateway resource chain for a route path.
// Purpose: Turn a declared path into its terminal remote resource.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Paths are walked left to right starting from the root resource. Each
//! segment is looked up in the [`ResourceIndex`]; a miss creates the segment
//! under the current parent and appends it to the index so later routes in
//! the same run reuse it.
//!
//! ## Invariants
//! - The root segment is never created.
//! - A path is resolved with at most one create call per missing segment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DeployEvent;
use crate::core::DeployEventKind;
use crate::core::DeployPhase;
use crate::core::RemoteResource;
use crate::core::ResolvedPathSegment;
use crate::core::ResourceIndex;
use crate::core::RestApiId;
use crate::core::manifest::ROOT_PATH;
use crate::core::resources::split_path;
use crate::interfaces::DeployEventSink;
use crate::interfaces::GatewayManager;
use crate::runtime::error::DeployError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of resolving one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Terminal resource of the path.
    pub resource: RemoteResource,
    /// Per-segment resolution trace, root first.
    pub segments: Vec<ResolvedPathSegment>,
    /// Number of resources created while resolving.
    pub created: usize,
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves `path`, creating missing segments, and tags the terminal segment
/// with `method`.
///
/// # Errors
///
/// Returns [`DeployError::MissingRootResource`] when the index has no root
/// and [`DeployError::Remote`] when a create call fails.
pub fn resolve_path<G>(
    gateway: &G,
    rest_api_id: &RestApiId,
    index: &mut ResourceIndex,
    path: &str,
    method: Option<&str>,
    sink: &dyn DeployEventSink,
) -> Result<ResolvedPath, DeployError>
where
    G: GatewayManager + ?Sized,
{
    let root = index
        .root()
        .cloned()
        .ok_or_else(|| DeployError::MissingRootResource(rest_api_id.to_string()))?;
    let segments = split_path(path);
    let mut trace = Vec::with_capacity(segments.len());
    let mut current = root;
    let mut created = 0;

    for (position, segment) in segments.iter().enumerate() {
        let terminal_method = if position + 1 == segments.len() {
            method.map(str::to_ascii_uppercase)
        } else {
            None
        };
        if segment == ROOT_PATH {
            trace.push(ResolvedPathSegment {
                path_part: segment.clone(),
                method: terminal_method,
                existing_resource: Some(current.clone()),
                parent_resource: None,
            });
            continue;
        }
        let parent = current;
        if let Some(existing) = index.find_child(&parent, segment).cloned() {
            trace.push(ResolvedPathSegment {
                path_part: segment.clone(),
                method: terminal_method,
                existing_resource: Some(existing.clone()),
                parent_resource: Some(parent),
            });
            current = existing;
            continue;
        }
        let fresh = gateway
            .create_resource(rest_api_id, &parent.id, segment)
            .map_err(DeployError::remote(DeployPhase::ReconcileRoutes))?;
        sink.record(
            &DeployEvent::new(DeployEventKind::ResourceCreated, DeployPhase::ReconcileRoutes)
                .with_subject(fresh.path.clone()),
        );
        index.push(fresh.clone());
        created += 1;
        trace.push(ResolvedPathSegment {
            path_part: segment.clone(),
            method: terminal_method,
            existing_resource: None,
            parent_resource: Some(parent),
        });
        current = fresh;
    }

    Ok(ResolvedPath {
        resource: current,
        segments: trace,
        created,
    })
}
