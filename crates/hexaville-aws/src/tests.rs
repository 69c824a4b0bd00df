// crates/hexaville-aws/src/tests.rs
// ============================================================================
// Module: AWS Provider Unit Tests
// Description: SDK shape conversions and the blocking bridge.
// ============================================================================
//! ## Overview
//! Exercises the pure conversion helpers and runtime bridging without any
//! network access.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test fixtures use explicit asserts and unwraps for clarity."
)]

use std::collections::BTreeMap;

use aws_sdk_apigateway::types::Method;
use aws_sdk_apigateway::types::Op;
use aws_sdk_apigateway::types::Resource;
use hexaville_config::HexavilleFile;
use hexaville_core::CloudProvider;
use hexaville_core::FunctionSpec;
use hexaville_core::PatchOperation;
use hexaville_core::RemoteError;
use hexaville_core::ResourceId;
use hexaville_core::VpcSettings;
use hexaville_core::gateway::binary_media_type_patches;
use tokio::runtime::Runtime;

use crate::client::AwsCloudProvider;
use crate::client::block_on_with_runtime;
use crate::gateway::remote_resource;
use crate::gateway::sdk_patch;
use crate::lambda::environment;
use crate::lambda::vpc_config;
use crate::storage::bucket_configuration;

#[test]
fn sdk_patch_keeps_escaped_path() {
    let patches = binary_media_type_patches(&[]);
    let converted = sdk_patch(&patches[0]);
    assert_eq!(converted.op(), Some(&Op::Add));
    assert_eq!(converted.path(), Some("/binaryMediaTypes/image~1*"));
    assert_eq!(converted.value(), None);
}

#[test]
fn sdk_patch_carries_uri_value() {
    let converted = sdk_patch(&PatchOperation::replace_uri("arn:uri"));
    assert_eq!(converted.op(), Some(&Op::Replace));
    assert_eq!(converted.value(), Some("arn:uri"));
}

#[test]
fn remote_resource_uppercases_embedded_methods() {
    let resource = Resource::builder()
        .id("res1")
        .parent_id("root")
        .path("/items")
        .path_part("items")
        .resource_methods("get", Method::builder().build())
        .resource_methods("POST", Method::builder().build())
        .build();

    let converted = remote_resource(&resource).unwrap();

    assert_eq!(converted.id, ResourceId::new("res1"));
    assert_eq!(converted.parent_id, Some(ResourceId::new("root")));
    assert_eq!(converted.path_part, "items");
    assert_eq!(converted.methods.into_iter().collect::<Vec<_>>(), vec!["GET", "POST"]);
}

#[test]
fn remote_resource_root_has_slash_path_part() {
    let resource = Resource::builder().id("root").path("/").build();
    let converted = remote_resource(&resource).unwrap();
    assert_eq!(converted.path_part, "/");
    assert!(converted.parent_id.is_none());
    assert!(converted.methods.is_empty());
}

#[test]
fn remote_resource_skips_incomplete_records() {
    let resource = Resource::builder().path("/orphan").build();
    assert!(remote_resource(&resource).is_none());
}

#[test]
fn bucket_configuration_only_outside_default_region() {
    assert!(bucket_configuration("us-east-1").is_none());
    let configuration = bucket_configuration("ap-northeast-1").unwrap();
    assert_eq!(
        configuration.location_constraint().map(|constraint| constraint.as_str()),
        Some("ap-northeast-1")
    );
}

#[test]
fn function_conversions_copy_vpc_and_environment() {
    let vpc = VpcSettings {
        subnet_ids: vec!["subnet-a".to_string()],
        security_group_ids: vec!["sg-a".to_string(), "sg-b".to_string()],
    };
    let converted = vpc_config(Some(&vpc)).unwrap();
    assert_eq!(converted.subnet_ids(), ["subnet-a".to_string()]);
    assert_eq!(converted.security_group_ids().len(), 2);
    assert!(vpc_config(None).is_none());

    let mut variables = BTreeMap::new();
    variables.insert("FOO".to_string(), "bar".to_string());
    let spec = FunctionSpec {
        name: "hexaville-sample-function".to_string(),
        role_arn: "arn:aws:iam::123456789012:role/sample".to_string(),
        handler: "index.handler".to_string(),
        runtime: "nodejs20.x".to_string(),
        description: "Automatically generated by Hexaville".to_string(),
        timeout: 10,
        memory: 256,
        vpc: None,
        environment: variables,
    };
    let converted = environment(&spec);
    assert_eq!(
        converted.variables().and_then(|vars| vars.get("FOO")).map(String::as_str),
        Some("bar")
    );
}

#[test]
fn block_on_outside_runtime_uses_owned_runtime() {
    let runtime = Runtime::new().unwrap();
    let value = block_on_with_runtime(&runtime, async { Ok::<_, RemoteError>(7) }).unwrap();
    assert_eq!(value, 7);
}

#[test]
fn block_on_inside_current_thread_runtime_uses_helper_thread() {
    let runtime = Runtime::new().unwrap();
    let outer = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let result = outer.block_on(async {
        block_on_with_runtime(&runtime, async {
            Err::<(), _>(RemoteError::NotFound("x".to_string()))
        })
    });
    assert_eq!(result, Err(RemoteError::NotFound("x".to_string())));
}

#[test]
fn provider_uses_configured_region() {
    let file = HexavilleFile::from_yaml_str(concat!(
        "appName: a\n",
        "executableTarget: a\n",
        "swift:\n",
        "  version: \"5.0\"\n",
        "provider:\n",
        "  aws:\n",
        "    credential:\n",
        "      accessKeyId: AKIDEXAMPLE\n",
        "      secretAccessKey: secret\n",
        "    region: eu-west-1\n",
        "    endpoint: http://localhost:4566\n",
        "    lambda:\n",
        "      s3Bucket: b\n",
    ))
    .unwrap();
    let provider = AwsCloudProvider::new(file.aws()).unwrap();
    assert_eq!(provider.region(), "eu-west-1");
}
