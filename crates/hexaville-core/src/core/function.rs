// crates/hexaville-core/src/core/function.rs
// ============================================================================
// Module: Function Definitions
// Description: Function-compute code location, settings, and configuration.
// Purpose: Describe the function the gateway proxies to, independent of vendor.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! [`FunctionSettings`] is what the operator configures; [`FunctionSpec`] is
//! the complete definition sent to the provider once the role ARN has been
//! resolved. Code is always uploaded to object storage first and referenced
//! by [`CodeLocation`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default function timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: i32 = 10;
/// Default function memory in MiB.
pub const DEFAULT_MEMORY_MB: i32 = 256;
/// Content type of uploaded packages.
pub const PACKAGE_CONTENT_TYPE: &str = "application/octet-stream";
/// Suffix of uploaded package object keys.
pub const PACKAGE_KEY_SUFFIX: &str = "lambda-package.zip";

// ============================================================================
// SECTION: Types
// ============================================================================

/// VPC attachment for the function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcSettings {
    /// Subnet ids.
    pub subnet_ids: Vec<String>,
    /// Security group ids.
    pub security_group_ids: Vec<String>,
}

/// Operator-controlled function settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSettings {
    /// Explicit role ARN; a managed role is used when absent.
    pub role: Option<String>,
    /// Timeout in seconds.
    pub timeout: i32,
    /// Memory size in MiB.
    pub memory: i32,
    /// Optional VPC attachment.
    pub vpc: Option<VpcSettings>,
    /// Environment variables.
    pub environment: BTreeMap<String, String>,
}

impl Default for FunctionSettings {
    fn default() -> Self {
        Self {
            role: None,
            timeout: DEFAULT_TIMEOUT_SECONDS,
            memory: DEFAULT_MEMORY_MB,
            vpc: None,
            environment: BTreeMap::new(),
        }
    }
}

/// Location of uploaded function code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLocation {
    /// Bucket holding the package.
    pub bucket: String,
    /// Object key of the package.
    pub key: String,
    /// Object version when the bucket is versioned.
    pub object_version: Option<String>,
}

/// Full function definition sent on create or configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Function name.
    pub name: String,
    /// Execution role ARN.
    pub role_arn: String,
    /// Handler entry point.
    pub handler: String,
    /// Runtime identifier.
    pub runtime: String,
    /// Human-readable description.
    pub description: String,
    /// Timeout in seconds.
    pub timeout: i32,
    /// Memory size in MiB.
    pub memory: i32,
    /// Optional VPC attachment.
    pub vpc: Option<VpcSettings>,
    /// Environment variables.
    pub environment: BTreeMap<String, String>,
}

/// Function state reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfiguration {
    /// Function ARN, possibly version-qualified.
    pub function_arn: String,
}

/// Packaged function code ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaPackage {
    /// Object key the package is uploaded under.
    pub key: String,
    /// Zip archive bytes.
    pub bytes: Vec<u8>,
}

impl LambdaPackage {
    /// Wraps package bytes with a key derived from `packaged_at`.
    #[must_use]
    pub fn timestamped(bytes: Vec<u8>, packaged_at: OffsetDateTime) -> Self {
        Self {
            key: package_object_key(packaged_at),
            bytes,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the `yyyyMMddHHmmss-lambda-package.zip` object key for a UTC instant.
#[must_use]
pub fn package_object_key(packaged_at: OffsetDateTime) -> String {
    let utc = packaged_at.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}-{PACKAGE_KEY_SUFFIX}",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}
