// crates/hexaville-core/tests/resolver.rs
// ============================================================================
// Module: Resource Path Resolver Tests
// Description: Segment creation, reuse, and property checks.
// ============================================================================
//! ## Overview
//! Validates that each missing segment is created once under the right
//! parent and that resolution is stable across runs.

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

use std::collections::BTreeSet;

use hexaville_core::DeployError;
use hexaville_core::GatewayManager;
use hexaville_core::InMemoryCloud;
use hexaville_core::NoopDeploySink;
use hexaville_core::ResourceIndex;
use hexaville_core::RestApiId;
use hexaville_core::runtime::resolve_path;
use proptest::prelude::*;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn fresh_api(cloud: &InMemoryCloud) -> (RestApiId, ResourceIndex) {
    let api = cloud.create_rest_api("hexaville-resolver").unwrap();
    let index = ResourceIndex::new(cloud.get_resources(&api.id).unwrap());
    (api.id, index)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests the documented path sequence creates exactly three resources.
#[test]
fn resolving_shared_prefixes_reuses_created_segments() {
    let cloud = InMemoryCloud::default();
    let (api, mut index) = fresh_api(&cloud);
    let sink = NoopDeploySink;

    let mut created = 0;
    let mut terminals = Vec::new();
    for path in ["/", "/a", "/a/b", "/a/{id}"] {
        let resolved = resolve_path(&cloud, &api, &mut index, path, Some("GET"), &sink).unwrap();
        created += resolved.created;
        terminals.push(resolved.resource);
    }

    assert_eq!(created, 3);
    assert_eq!(cloud.call_count("create_resource"), 3);
    assert!(terminals[0].is_root());
    let a = &terminals[1];
    assert_eq!(terminals[2].parent_id.as_ref(), Some(&a.id));
    assert_eq!(terminals[3].parent_id.as_ref(), Some(&a.id));
    assert_eq!(terminals[3].path, "/a/{id}");
    assert_eq!(index.len(), 4);
}

/// Tests that the root is never created and carries the terminal method.
#[test]
fn root_path_resolves_to_existing_root() {
    let cloud = InMemoryCloud::default();
    let (api, mut index) = fresh_api(&cloud);

    let resolved =
        resolve_path(&cloud, &api, &mut index, "/", Some("any"), &NoopDeploySink).unwrap();

    assert_eq!(resolved.created, 0);
    assert!(resolved.resource.is_root());
    assert_eq!(resolved.segments.len(), 1);
    assert_eq!(resolved.segments[0].path_part, "/");
    assert_eq!(resolved.segments[0].method.as_deref(), Some("ANY"));
    assert_eq!(cloud.call_count("create_resource"), 0);
}

/// Tests the per-segment trace: method only on the terminal segment.
#[test]
fn segment_trace_marks_existing_and_created() {
    let cloud = InMemoryCloud::default();
    let (api, mut index) = fresh_api(&cloud);
    resolve_path(&cloud, &api, &mut index, "/a", None, &NoopDeploySink).unwrap();

    let resolved =
        resolve_path(&cloud, &api, &mut index, "/a/b", Some("POST"), &NoopDeploySink).unwrap();

    assert_eq!(resolved.segments.len(), 2);
    let first = &resolved.segments[0];
    assert_eq!(first.path_part, "a");
    assert!(first.existing_resource.is_some());
    assert!(first.method.is_none());
    assert!(first.parent_resource.as_ref().unwrap().is_root());
    let second = &resolved.segments[1];
    assert_eq!(second.path_part, "b");
    assert!(second.existing_resource.is_none());
    assert_eq!(second.method.as_deref(), Some("POST"));
    assert_eq!(second.parent_resource.as_ref().unwrap().path, "/a");
}

/// Tests that a same-named segment under a different parent is not reused.
#[test]
fn matching_requires_consistent_parent_path() {
    let cloud = InMemoryCloud::default();
    let (api, mut index) = fresh_api(&cloud);
    let first = resolve_path(&cloud, &api, &mut index, "/x/id", None, &NoopDeploySink).unwrap();
    let second = resolve_path(&cloud, &api, &mut index, "/y/id", None, &NoopDeploySink).unwrap();

    assert_ne!(first.resource.id, second.resource.id);
    assert_eq!(second.resource.path, "/y/id");
    assert_eq!(cloud.call_count("create_resource"), 4);
}

/// Tests that a failed create aborts resolution.
#[test]
fn create_failure_propagates() {
    let cloud = InMemoryCloud::default();
    let (api, mut index) = fresh_api(&cloud);
    cloud.fail_on("create_resource");

    let err = resolve_path(&cloud, &api, &mut index, "/a", None, &NoopDeploySink).unwrap_err();

    assert!(matches!(err, DeployError::Remote { .. }));
    assert_eq!(index.len(), 1);
}

/// Tests that an index without a root is rejected.
#[test]
fn missing_root_is_reported() {
    let cloud = InMemoryCloud::default();
    let mut index = ResourceIndex::new(Vec::new());
    let err = resolve_path(&cloud, &RestApiId::new("api"), &mut index, "/a", None, &NoopDeploySink)
        .unwrap_err();
    assert!(matches!(err, DeployError::MissingRootResource(_)));
}

// ============================================================================
// SECTION: Properties
// ============================================================================

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof!["[a-c]", Just("{id}".to_string())], 0 .. 4)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

proptest! {
    /// Creates exactly one resource per distinct non-root prefix and nothing on re-run.
    #[test]
    fn resolution_creates_each_prefix_once(
        paths in prop::collection::vec(path_strategy(), 1 .. 8),
    ) {
        let cloud = InMemoryCloud::default();
        let (api, mut index) = fresh_api(&cloud);

        let mut prefixes = BTreeSet::new();
        for path in &paths {
            let mut current = String::new();
            for segment in path.split('/').filter(|segment| !segment.is_empty()) {
                current.push('/');
                current.push_str(segment);
                prefixes.insert(current.clone());
            }
        }

        for path in &paths {
            let resolved =
                resolve_path(&cloud, &api, &mut index, path, None, &NoopDeploySink).unwrap();
            prop_assert_eq!(&resolved.resource.path, path);
        }
        prop_assert_eq!(cloud.call_count("create_resource"), prefixes.len());

        let mut rerun = ResourceIndex::new(cloud.get_resources(&api).unwrap());
        for path in &paths {
            let resolved =
                resolve_path(&cloud, &api, &mut rerun, path, None, &NoopDeploySink).unwrap();
            prop_assert_eq!(resolved.created, 0);
        }
        prop_assert_eq!(cloud.call_count("create_resource"), prefixes.len());
    }
}
