// crates/hexaville-core/src/core/gateway.rs
// ============================================================================
// Module: Gateway Types
// Description: REST API records, patch operations, and route listings.
// Purpose: Vendor-neutral shapes for the gateway management surface.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! These types mirror the parts of the gateway API that reconciliation reads
//! or writes. Patch paths follow JSON Pointer escaping, so `/` inside a
//! value segment is written as `~1`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::RestApiId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content types the gateway must treat as binary.
pub const BINARY_MEDIA_TYPES: [&str; 4] = [
    "image/*",
    "application/x-protobuf",
    "application/x-google-protobuf",
    "application/octet-stream",
];
/// Status code of the integration and method responses.
pub const RESPONSE_STATUS_CODE: &str = "200";
/// Verb the gateway uses when invoking the function.
pub const BACKEND_INVOCATION_METHOD: &str = "POST";
/// Authorization type of created methods.
pub const METHOD_AUTHORIZATION_TYPE: &str = "NONE";

// ============================================================================
// SECTION: Types
// ============================================================================

/// A REST API known to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestApi {
    /// API id.
    pub id: RestApiId,
    /// API name.
    pub name: String,
    /// Content types currently treated as binary.
    pub binary_media_types: Vec<String>,
}

/// Patch operation verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Add a value.
    Add,
    /// Replace a value.
    Replace,
    /// Remove a value.
    Remove,
}

/// One JSON-patch style update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation verb.
    pub op: PatchOp,
    /// Target path.
    pub path: String,
    /// New value, when the verb takes one.
    pub value: Option<String>,
}

impl PatchOperation {
    /// Builds the patch replacing an integration URI.
    #[must_use]
    pub fn replace_uri(uri: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: "/uri".to_string(),
            value: Some(uri.into()),
        }
    }
}

/// Methods configured on one resource path, for route listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteListing {
    /// Resource path.
    pub path: String,
    /// Configured methods.
    pub methods: Vec<String>,
}

/// Deployed routes and the stage endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutesReport {
    /// Public endpoint URL.
    pub endpoint: String,
    /// Resources with their methods.
    pub routes: Vec<RouteListing>,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the `add` patches for binary media types missing from `existing`.
#[must_use]
pub fn binary_media_type_patches(existing: &[String]) -> Vec<PatchOperation> {
    BINARY_MEDIA_TYPES
        .iter()
        .filter(|media_type| !existing.iter().any(|present| present == *media_type))
        .map(|media_type| PatchOperation {
            op: PatchOp::Add,
            path: format!("/binaryMediaTypes/{}", media_type.replace('/', "~1")),
            value: None,
        })
        .collect()
}
