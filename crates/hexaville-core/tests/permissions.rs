// crates/hexaville-core/tests/permissions.rs
// ============================================================================
// Module: Permission Synchronizer Tests
// Description: Convergence of invoke grants onto the active ARN set.
// ============================================================================
//! ## Overview
//! Validates exact-string planning and the remote synchronization calls.

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

mod common;

use std::collections::BTreeSet;

use hexaville_core::ArnContext;
use hexaville_core::CodeLocation;
use hexaville_core::DeployError;
use hexaville_core::DeployEventKind;
use hexaville_core::FunctionManager;
use hexaville_core::FunctionSpec;
use hexaville_core::InMemoryCloud;
use hexaville_core::NoopDeploySink;
use hexaville_core::PolicyStatement;
use hexaville_core::RecordingDeploySink;
use hexaville_core::RestApiId;
use hexaville_core::StatementId;
use hexaville_core::policy::GATEWAY_PRINCIPAL;
use hexaville_core::policy::INVOKE_ACTION;
use hexaville_core::runtime::active_arns;
use hexaville_core::runtime::plan_permissions;
use hexaville_core::runtime::sync_permissions;

use crate::common::manifest;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const FUNCTION: &str = "hexaville-sample-function";

fn statement(id: &str, arn: Option<&str>) -> PolicyStatement {
    PolicyStatement {
        statement_id: StatementId::new(id),
        source_arn: arn.map(str::to_string),
        principal: GATEWAY_PRINCIPAL.to_string(),
        action: INVOKE_ACTION.to_string(),
    }
}

fn cloud_with_function() -> InMemoryCloud {
    let cloud = InMemoryCloud::default();
    cloud
        .create_function(
            &FunctionSpec {
                name: FUNCTION.to_string(),
                role_arn: "arn:aws:iam::123456789012:role/r".to_string(),
                handler: "index.handler".to_string(),
                runtime: "nodejs20.x".to_string(),
                description: String::new(),
                timeout: 10,
                memory: 256,
                vpc: None,
                environment: std::collections::BTreeMap::new(),
            },
            &CodeLocation {
                bucket: "b".to_string(),
                key: "k".to_string(),
                object_version: None,
            },
        )
        .unwrap();
    cloud
}

fn source_arns(statements: &[PolicyStatement]) -> BTreeSet<String> {
    statements.iter().filter_map(|statement| statement.source_arn.clone()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests the documented convergence example as a pure plan.
#[test]
fn plan_adds_missing_and_removes_stale() {
    let existing = vec![statement("sx", Some("X")), statement("sy", Some("Y"))];
    let plan = plan_permissions(&existing, &["Y".to_string(), "Z".to_string()]);

    assert_eq!(plan.to_add, vec!["Z".to_string()]);
    assert_eq!(plan.to_remove.len(), 1);
    assert_eq!(plan.to_remove[0].statement_id.as_str(), "sx");
}

/// Tests that statements without a source ARN are left alone.
#[test]
fn plan_ignores_statements_without_source_arn() {
    let existing = vec![statement("manual", None)];
    let plan = plan_permissions(&existing, &[]);
    assert!(plan.is_empty());
}

/// Tests that matching is exact string equality.
#[test]
fn plan_matches_exact_strings_only() {
    let existing = vec![statement("s1", Some("arn:aws:execute-api:r:1:api/*/GET/users/*"))];
    let active = vec!["arn:aws:execute-api:r:1:api/*/GET/users/{id}".to_string()];
    let plan = plan_permissions(&existing, &active);
    assert_eq!(plan.to_add.len(), 1);
    assert_eq!(plan.to_remove.len(), 1);
}

/// Tests the documented convergence example against the in-memory cloud.
#[test]
fn sync_converges_remote_policy() {
    let cloud = cloud_with_function();
    cloud.seed_policy_statement(FUNCTION, statement("sx", Some("X")));
    cloud.seed_policy_statement(FUNCTION, statement("sy", Some("Y")));
    let sink = RecordingDeploySink::new();

    let plan =
        sync_permissions(&cloud, FUNCTION, &["Y".to_string(), "Z".to_string()], &sink).unwrap();

    let remaining = cloud.policy_statements(FUNCTION);
    assert_eq!(source_arns(&remaining), BTreeSet::from(["Y".to_string(), "Z".to_string()]));
    assert!(remaining.iter().any(|statement| statement.statement_id.as_str() == "sy"));
    assert_eq!(plan.to_add, vec!["Z".to_string()]);
    assert_eq!(sink.count(DeployEventKind::PermissionAdded), 1);
    assert_eq!(sink.count(DeployEventKind::PermissionRemoved), 1);
    assert_eq!(cloud.call_count("add_permission"), 1);
    assert_eq!(cloud.call_count("remove_permission"), 1);
}

/// Tests that new grants use the gateway principal and distinct random ids.
#[test]
fn sync_grants_gateway_invoke_with_fresh_ids() {
    let cloud = cloud_with_function();
    sync_permissions(&cloud, FUNCTION, &["A".to_string(), "B".to_string()], &NoopDeploySink)
        .unwrap();

    let statements = cloud.policy_statements(FUNCTION);
    assert_eq!(statements.len(), 2);
    assert_ne!(statements[0].statement_id, statements[1].statement_id);
    for statement in &statements {
        assert_eq!(statement.principal, GATEWAY_PRINCIPAL);
        assert_eq!(statement.action, INVOKE_ACTION);
    }
}

/// Tests that a second sync with the same active set is a no-op.
#[test]
fn sync_is_idempotent() {
    let cloud = cloud_with_function();
    let active = vec!["A".to_string()];
    sync_permissions(&cloud, FUNCTION, &active, &NoopDeploySink).unwrap();
    let plan = sync_permissions(&cloud, FUNCTION, &active, &NoopDeploySink).unwrap();
    assert!(plan.is_empty());
    assert_eq!(cloud.call_count("add_permission"), 1);
}

/// Tests that a policy fetch failure other than not-found is fatal.
#[test]
fn sync_propagates_policy_fetch_failure() {
    let cloud = cloud_with_function();
    cloud.fail_on("get_policy");
    let err = sync_permissions(&cloud, FUNCTION, &["A".to_string()], &NoopDeploySink).unwrap_err();
    assert!(matches!(err, DeployError::Remote { .. }));
    assert_eq!(cloud.call_count("add_permission"), 0);
}

/// Tests that active ARNs are derived per route and deduplicated in order.
#[test]
fn active_arns_deduplicate_in_order() {
    let context = ArnContext {
        region: "us-east-1".to_string(),
        account_id: "999999999999".to_string(),
        rest_api_id: RestApiId::new("abc123"),
    };
    let routes = manifest(&[("/items/{id}", "GET"), ("/", "get"), ("/items/{key}", "GET")]);

    let arns = active_arns(&context, &routes).unwrap();

    assert_eq!(
        arns,
        vec![
            "arn:aws:execute-api:us-east-1:999999999999:abc123/*/GET/items/*".to_string(),
            "arn:aws:execute-api:us-east-1:999999999999:abc123/*/GET/".to_string(),
        ]
    );
}
