// crates/hexaville-core/tests/model.rs
// ============================================================================
// Module: Core Model Tests
// Description: Naming, stages, packages, policies, and gateway patches.
// ============================================================================
//! ## Overview
//! Validates the derived names and wire shapes the engine depends on.

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

use hexaville_core::AppNaming;
use hexaville_core::BuildArtifact;
use hexaville_core::DeployEvent;
use hexaville_core::DeployEventKind;
use hexaville_core::DeployPhase;
use hexaville_core::DeploymentStage;
use hexaville_core::LambdaPackage;
use hexaville_core::PatchOp;
use hexaville_core::PolicyError;
use hexaville_core::gateway::binary_media_type_patches;
use hexaville_core::policy::parse_policy_document;
use time::OffsetDateTime;

/// Tests the remote object names derived from the app name.
#[test]
fn naming_follows_conventions() {
    let naming = AppNaming::new("todo");
    assert_eq!(naming.function_name(), "hexaville-todo-function");
    assert_eq!(naming.api_name(), "hexaville-todo");
    assert_eq!(naming.role_name(), "todo-and-lambda-basic-execution");
}

/// Tests stage parsing and display.
#[test]
fn stages_parse_and_display() {
    assert_eq!(DeploymentStage::default(), DeploymentStage::Staging);
    assert_eq!(DeploymentStage::parse("production"), DeploymentStage::Production);
    assert_eq!(DeploymentStage::parse("qa").to_string(), "qa");
    let stage: DeploymentStage = serde_json::from_str("\"staging\"").unwrap();
    assert_eq!(stage, DeploymentStage::Staging);
}

/// Tests the timestamped package key.
#[test]
fn package_key_is_utc_timestamp() {
    let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
    let package = LambdaPackage::timestamped(vec![1, 2, 3], at);
    assert_eq!(package.key, "20231114221320-lambda-package.zip");
}

/// Tests build artifact paths.
#[test]
fn build_artifact_paths() {
    let artifact = BuildArtifact::new("/app/__docker_shared/debug", "Server");
    assert!(artifact.manifest_path().ends_with(".routing-manifest.json"));
    assert!(artifact.executable_path().ends_with("Server"));
}

/// Tests that only missing binary media types produce patches.
#[test]
fn binary_media_type_patches_skip_present_types() {
    assert_eq!(binary_media_type_patches(&[]).len(), 4);
    let patches = binary_media_type_patches(&["image/*".to_string()]);
    assert_eq!(patches.len(), 3);
    assert!(patches.iter().all(|patch| patch.op == PatchOp::Add));
    assert_eq!(patches[0].path, "/binaryMediaTypes/application~1x-protobuf");
}

/// Tests parsing of a provider policy document.
#[test]
fn policy_document_statements_are_typed() {
    let document = r#"{
        "Version": "2012-10-17",
        "Id": "default",
        "Statement": [
            {
                "Sid": "abc",
                "Effect": "Allow",
                "Principal": {"Service": "apigateway.amazonaws.com"},
                "Action": "lambda:InvokeFunction",
                "Resource": "arn:aws:lambda:us-east-1:1:function:f",
                "Condition": {
                    "ArnLike": {"AWS:SourceArn": "arn:aws:execute-api:us-east-1:1:api/*/GET/"}
                }
            },
            {
                "Sid": "manual",
                "Effect": "Allow",
                "Principal": "*",
                "Action": ["lambda:InvokeFunction"]
            }
        ]
    }"#;

    let statements = parse_policy_document(document).unwrap();

    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].statement_id.as_str(), "abc");
    assert_eq!(
        statements[0].source_arn.as_deref(),
        Some("arn:aws:execute-api:us-east-1:1:api/*/GET/")
    );
    assert_eq!(statements[0].principal, "apigateway.amazonaws.com");
    assert_eq!(statements[1].source_arn, None);
    assert_eq!(statements[1].action, "lambda:InvokeFunction");
}

/// Tests that invalid policy documents are rejected.
#[test]
fn malformed_policy_documents_are_rejected() {
    assert!(matches!(parse_policy_document("{"), Err(PolicyError::Malformed(_))));
    assert!(matches!(
        parse_policy_document(r#"{"Statement":[{"Effect":"Allow"}]}"#),
        Err(PolicyError::Malformed(_))
    ));
    assert!(parse_policy_document("{}").unwrap().is_empty());
}

/// Tests the JSON shape of deploy events.
#[test]
fn deploy_events_serialize_snake_case() {
    let event = DeployEvent::new(DeployEventKind::MethodCreated, DeployPhase::ReconcileRoutes)
        .with_subject("/items")
        .with_method("POST");
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "method_created");
    assert_eq!(value["phase"], "reconcile_routes");
    assert_eq!(value["subject"], "/items");
    assert_eq!(value["method"], "POST");
}
