// crates/hexaville-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for reconciliation engine tests.
// ============================================================================

//! ## Overview
//! Builders for manifests, deploy requests, and deployers over the
//! in-memory cloud.

#![allow(dead_code, reason = "Not every test file uses every helper.")]

use std::time::Duration;

use hexaville_core::AppNaming;
use hexaville_core::DeployRequest;
use hexaville_core::Deployer;
use hexaville_core::DeployerConfig;
use hexaville_core::DeploymentStage;
use hexaville_core::FunctionSettings;
use hexaville_core::InMemoryCloud;
use hexaville_core::LambdaPackage;
use hexaville_core::RecordingDeploySink;
use hexaville_core::RouteEntry;
use hexaville_core::RouteManifest;

/// Application name used across tests.
pub const APP_NAME: &str = "sample";

/// Bucket used across tests.
pub const BUCKET: &str = "hexaville-sample-bucket";

/// Builds a manifest from (path, method) pairs.
pub fn manifest(routes: &[(&str, &str)]) -> RouteManifest {
    RouteManifest::new(
        routes.iter().map(|(path, method)| RouteEntry::new(*path, *method)).collect(),
    )
}

/// Builds a deploy request for the sample application.
pub fn request(manifest: RouteManifest) -> DeployRequest {
    DeployRequest {
        naming: AppNaming::new(APP_NAME),
        stage: DeploymentStage::Staging,
        bucket: BUCKET.to_string(),
        package: LambdaPackage {
            key: "20260101000000-lambda-package.zip".to_string(),
            bytes: b"PK\x03\x04".to_vec(),
        },
        function: FunctionSettings::default(),
        manifest,
    }
}

/// Deployer config without the role propagation wait.
pub fn fast_config() -> DeployerConfig {
    DeployerConfig {
        role_propagation_delay: Duration::ZERO,
        ..DeployerConfig::default()
    }
}

/// Builds a deployer sharing state with `cloud` and `sink`.
pub fn deployer(
    cloud: &InMemoryCloud,
    sink: &RecordingDeploySink,
) -> Deployer<InMemoryCloud, RecordingDeploySink> {
    Deployer::new(cloud.clone(), sink.clone(), fast_config())
}
