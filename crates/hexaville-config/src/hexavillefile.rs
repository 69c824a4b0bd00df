// crates/hexaville-config/src/hexavillefile.rs
// ============================================================================
// Module: Hexavillefile
// Description: Application configuration loading and validation.
// Purpose: Provide strict, fail-closed Hexavillefile parsing with hard limits.
// Dependencies: hexaville-core, serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! The Hexavillefile is a YAML document describing the application, its
//! toolchain, the build sandbox, and the cloud provider. It is loaded with
//! strict size and path limits and validated before any remote call.
//!
//! ## Invariants
//! - `appName` and `executableTarget` are non-empty.
//! - `timeout` lies in `1..=900` seconds and `memory` in `128..=10240` MiB.
//! - Credentials, when present, carry both keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use hexaville_core::FunctionSettings;
use hexaville_core::VpcSettings;
use hexaville_core::function::DEFAULT_MEMORY_MB;
use hexaville_core::function::DEFAULT_TIMEOUT_SECONDS;
use serde::Deserialize;
use thiserror::Error;

use crate::version::SwiftVersion;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default Hexavillefile name.
pub const DEFAULT_HEXAVILLEFILE_NAME: &str = "Hexavillefile.yml";
/// Environment variable overriding the Hexavillefile path.
pub const HEXAVILLEFILE_ENV_VAR: &str = "HEXAVILLEFILE";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Smallest accepted function timeout in seconds.
const MIN_TIMEOUT_SECONDS: i32 = 1;
/// Largest accepted function timeout in seconds.
const MAX_TIMEOUT_SECONDS: i32 = 900;
/// Smallest accepted function memory in MiB.
const MIN_MEMORY_MB: i32 = 128;
/// Largest accepted function memory in MiB.
const MAX_MEMORY_MB: i32 = 10_240;

// ============================================================================
// SECTION: Model
// ============================================================================

/// Parsed Hexavillefile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexavilleFile {
    /// Application name; every remote object is named after it.
    pub app_name: String,
    /// Swift executable target producing the server binary.
    pub executable_target: String,
    /// Toolchain settings.
    pub swift: SwiftSettings,
    /// Build sandbox settings.
    #[serde(default)]
    pub docker: Option<DockerSettings>,
    /// Cloud provider settings.
    pub provider: ProviderSettings,
}

/// Swift toolchain settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftSettings {
    /// Toolchain version.
    pub version: SwiftVersion,
    /// Build options.
    #[serde(default)]
    pub build_options: Option<SwiftBuildOptions>,
}

impl SwiftSettings {
    /// Returns the effective build configuration (debug unless set).
    #[must_use]
    pub fn build_configuration(&self) -> BuildConfiguration {
        self.build_options
            .as_ref()
            .map_or(BuildConfiguration::Debug, |options| options.configuration)
    }
}

/// Swift build options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SwiftBuildOptions {
    /// Build configuration.
    pub configuration: BuildConfiguration,
}

/// Swift build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfiguration {
    /// Debug build.
    #[default]
    Debug,
    /// Release build.
    Release,
}

impl BuildConfiguration {
    /// Returns the lowercase label used in paths and build flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Docker sandbox settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerSettings {
    /// Image build options.
    pub build_options: DockerBuildOptions,
}

/// Docker image build options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct DockerBuildOptions {
    /// Disables the docker layer cache.
    #[serde(default)]
    pub nocache: Option<bool>,
}

/// Provider section; AWS is the only provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// AWS settings.
    pub aws: AwsSettings,
}

/// AWS provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSettings {
    /// Static credentials; the default credential chain is used when absent.
    #[serde(default)]
    pub credential: Option<AwsCredential>,
    /// Region name.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for every service (local emulators).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Function settings.
    pub lambda: LambdaSettings,
}

impl AwsSettings {
    /// Returns the configured region or the default.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

/// Static AWS credentials.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredential {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

impl fmt::Debug for AwsCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Function-compute settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaSettings {
    /// Bucket receiving code packages.
    #[serde(default)]
    pub s3_bucket: Option<String>,
    /// Explicit execution role ARN.
    #[serde(default)]
    pub role: Option<String>,
    /// Timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: i32,
    /// Memory in MiB.
    #[serde(default = "default_memory")]
    pub memory: i32,
    /// VPC attachment.
    #[serde(default)]
    pub vpc: Option<VpcSection>,
}

/// VPC attachment as written in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcSection {
    /// Subnet ids.
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    /// Security group ids.
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HexavilleFile {
    /// Loads the Hexavillefile from disk.
    ///
    /// Resolution order: `path`, then `HEXAVILLEFILE`, then
    /// `Hexavillefile.yml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized, not
    /// UTF-8, not valid YAML, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_resolved(&resolved)
    }

    /// Loads a Hexavillefile from an already resolved path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the same conditions as [`Self::load`].
    pub fn load_resolved(resolved: &Path) -> Result<Self, ConfigError> {
        validate_path(resolved)?;
        let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_yaml_str(content)
    }

    /// Parses and validates Hexavillefile text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: Self =
            serde_yaml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("appName", &self.app_name)?;
        require_non_empty("executableTarget", &self.executable_target)?;
        self.provider.aws.validate()
    }

    /// Returns the AWS settings.
    #[must_use]
    pub const fn aws(&self) -> &AwsSettings {
        &self.provider.aws
    }

    /// Returns whether docker builds skip the layer cache.
    #[must_use]
    pub fn docker_nocache(&self) -> bool {
        self.docker.and_then(|docker| docker.build_options.nocache).unwrap_or(false)
    }

    /// Returns the code bucket, required for deployment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no bucket is configured.
    pub fn require_bucket(&self) -> Result<&str, ConfigError> {
        self.provider.aws.lambda.s3_bucket.as_deref().ok_or_else(|| {
            ConfigError::Invalid("provider.aws.lambda.s3Bucket is required for deploy".to_string())
        })
    }

    /// Builds function settings with the given environment variables.
    #[must_use]
    pub fn function_settings(&self, environment: BTreeMap<String, String>) -> FunctionSettings {
        let lambda = &self.provider.aws.lambda;
        FunctionSettings {
            role: lambda.role.clone(),
            timeout: lambda.timeout,
            memory: lambda.memory,
            vpc: lambda.vpc.as_ref().map(|vpc| VpcSettings {
                subnet_ids: vpc.subnet_ids.clone(),
                security_group_ids: vpc.security_group_ids.clone(),
            }),
            environment,
        }
    }
}

impl AwsSettings {
    /// Validates region, credentials, and function limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(region) = &self.region {
            require_non_empty("provider.aws.region", region)?;
        }
        if let Some(endpoint) = &self.endpoint {
            require_non_empty("provider.aws.endpoint", endpoint)?;
        }
        if let Some(credential) = &self.credential {
            require_non_empty("provider.aws.credential.accessKeyId", &credential.access_key_id)?;
            require_non_empty(
                "provider.aws.credential.secretAccessKey",
                &credential.secret_access_key,
            )?;
        }
        self.lambda.validate()
    }
}

impl LambdaSettings {
    /// Validates bucket, role, and numeric limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bucket) = &self.s3_bucket {
            require_non_empty("provider.aws.lambda.s3Bucket", bucket)?;
        }
        if let Some(role) = &self.role {
            require_non_empty("provider.aws.lambda.role", role)?;
        }
        if !(MIN_TIMEOUT_SECONDS ..= MAX_TIMEOUT_SECONDS).contains(&self.timeout) {
            return Err(ConfigError::Invalid(format!(
                "provider.aws.lambda.timeout must be between {MIN_TIMEOUT_SECONDS} and \
                 {MAX_TIMEOUT_SECONDS}"
            )));
        }
        if !(MIN_MEMORY_MB ..= MAX_MEMORY_MB).contains(&self.memory) {
            return Err(ConfigError::Invalid(format!(
                "provider.aws.lambda.memory must be between {MIN_MEMORY_MB} and {MAX_MEMORY_MB}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// YAML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the Hexavillefile path using explicit input or defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the environment override is too long.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(HEXAVILLEFILE_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_HEXAVILLEFILE_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Rejects empty or whitespace-only values.
fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    Ok(())
}

/// Default function timeout.
const fn default_timeout() -> i32 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Default function memory.
const fn default_memory() -> i32 {
    DEFAULT_MEMORY_MB
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn validate_path_accepts_relative_name() {
        assert!(validate_path(Path::new(DEFAULT_HEXAVILLEFILE_NAME)).is_ok());
    }

    #[test]
    fn validate_path_rejects_long_component() {
        let component = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let err = validate_path(Path::new(&component)).unwrap_err();
        assert!(err.to_string().contains("component too long"));
    }

    #[test]
    fn require_non_empty_rejects_whitespace() {
        let err = require_non_empty("appName", "   ").unwrap_err();
        assert_eq!(err, ConfigError::Invalid("appName must be non-empty".to_string()));
    }
}
