// crates/hexaville-core/tests/arn.rs
// ============================================================================
// Module: ARN Derivation Tests
// Description: Invocation URIs, source ARNs, and endpoints.
// ============================================================================
//! ## Overview
//! Validates the strings that connect the gateway, the function, and the
//! permission policy.

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

use hexaville_core::ArnContext;
use hexaville_core::ArnError;
use hexaville_core::DeploymentStage;
use hexaville_core::RestApiId;
use hexaville_core::RouteEntry;
use hexaville_core::arn::account_id_from_invocation_uri;
use hexaville_core::arn::endpoint;
use hexaville_core::arn::invocation_uri;
use hexaville_core::arn::path_for_arn;

/// Tests the documented wildcarding example.
#[test]
fn source_arn_wildcards_path_parameters() {
    let context = ArnContext {
        region: "us-east-1".to_string(),
        account_id: "999999999999".to_string(),
        rest_api_id: RestApiId::new("abc123"),
    };
    let arn = context.source_arn(&RouteEntry::new("/users/{userId}", "GET")).unwrap();
    assert_eq!(arn, "arn:aws:execute-api:us-east-1:999999999999:abc123/*/GET/users/*");
}

/// Tests that every braced segment becomes a wildcard and the method is upper-cased.
#[test]
fn source_arn_handles_multiple_parameters_and_root() {
    let context = ArnContext {
        region: "ap-northeast-1".to_string(),
        account_id: "111122223333".to_string(),
        rest_api_id: RestApiId::new("xyz"),
    };
    assert_eq!(
        context.source_arn(&RouteEntry::new("/a/{first_id}/b/{second-id}", "post")).unwrap(),
        "arn:aws:execute-api:ap-northeast-1:111122223333:xyz/*/POST/a/*/b/*"
    );
    assert_eq!(
        context.source_arn(&RouteEntry::new("/", "ANY")).unwrap(),
        "arn:aws:execute-api:ap-northeast-1:111122223333:xyz/*/ANY/"
    );
}

/// Tests that only the pattern's character class is wildcarded.
#[test]
fn path_for_arn_leaves_non_matching_braces() {
    assert_eq!(path_for_arn("/files/{name2}").unwrap(), "/files/{name2}");
    assert_eq!(path_for_arn("/files/{}").unwrap(), "/files/*");
}

/// Tests that invocation URIs drop the version qualifier.
#[test]
fn invocation_uri_strips_version_qualifier() {
    let arn = "arn:aws:lambda:us-east-1:999999999999:function:hexaville-app-function:7";
    let uri = invocation_uri("us-east-1", arn).unwrap();
    assert_eq!(
        uri,
        "arn:aws:apigateway:us-east-1:lambda:path/2015-03-31/functions/arn:aws:lambda:us-east-1:\
         999999999999:function:hexaville-app-function/invocations"
    );
    assert_eq!(account_id_from_invocation_uri(&uri).unwrap(), "999999999999");
}

/// Tests that non-ARN inputs are rejected.
#[test]
fn invalid_inputs_are_rejected() {
    assert!(matches!(
        invocation_uri("us-east-1", "hexaville-app-function"),
        Err(ArnError::InvalidFunctionArn(_))
    ));
    assert!(matches!(
        account_id_from_invocation_uri("not-a-uri"),
        Err(ArnError::InvalidInvocationUri(_))
    ));
}

/// Tests the endpoint format for built-in and custom stages.
#[test]
fn endpoint_uses_stage_name() {
    let api = RestApiId::new("abc123");
    assert_eq!(
        endpoint(&api, "us-east-1", &DeploymentStage::Staging),
        "https://abc123.execute-api.us-east-1.amazonaws.com/staging"
    );
    assert_eq!(
        endpoint(&api, "eu-west-1", &DeploymentStage::parse("canary")),
        "https://abc123.execute-api.eu-west-1.amazonaws.com/canary"
    );
}
