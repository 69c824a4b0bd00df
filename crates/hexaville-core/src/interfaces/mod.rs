// crates/hexaville-core/src/interfaces/mod.rs
// ============================================================================
// Module: Hexaville Interfaces
// Description: Provider capability traits consumed by the reconciliation engine.
// Purpose: Keep the engine independent from any specific cloud SDK.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The engine depends only on the operation signatures below. Calls are
//! synchronous, unary, and never retried. Providers classify failures into
//! [`RemoteError`] so the engine can tell "not found" (first-deploy
//! detection) and "already exists" (idempotent create) from everything
//! else. Existence probes return `Ok(false)` for not-found and surface any
//! other failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CodeLocation;
use crate::core::DeployEvent;
use crate::core::DeploymentStage;
use crate::core::FunctionConfiguration;
use crate::core::FunctionSpec;
use crate::core::PatchOperation;
use crate::core::PolicyStatement;
use crate::core::RemoteResource;
use crate::core::ResourceId;
use crate::core::RestApi;
use crate::core::RestApiId;
use crate::core::StatementId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Remote API failure classification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The addressed object does not exist.
    #[error("remote object not found: {0}")]
    NotFound(String),
    /// The object to create already exists.
    #[error("remote object already exists: {0}")]
    AlreadyExists(String),
    /// Any other remote failure.
    #[error("remote call failed: {0}")]
    Failed(String),
}

impl RemoteError {
    /// Returns true for [`RemoteError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

// ============================================================================
// SECTION: Code Storage
// ============================================================================

/// Object storage holding function packages.
pub trait CodeStorage {
    /// Creates a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::AlreadyExists`] when the bucket already exists
    /// (owned by anyone) and [`RemoteError::Failed`] otherwise.
    fn create_bucket(&self, bucket: &str) -> Result<(), RemoteError>;

    /// Uploads an object and returns its version id, if versioned.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the upload fails.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Option<String>, RemoteError>;
}

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Identity management for the function execution role.
pub trait RoleManager {
    /// Returns the ARN of an existing role.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when the role does not exist.
    fn get_role_arn(&self, role_name: &str) -> Result<String, RemoteError>;

    /// Creates a role and returns its ARN.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn create_role(&self, role_name: &str, assume_role_policy: &str)
    -> Result<String, RemoteError>;

    /// Returns whether an inline role policy exists.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] for failures other than not-found.
    fn role_policy_exists(&self, role_name: &str, policy_name: &str) -> Result<bool, RemoteError>;

    /// Attaches an inline policy to a role.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the call fails.
    fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<(), RemoteError>;
}

// ============================================================================
// SECTION: Function Compute
// ============================================================================

/// Function-compute management.
pub trait FunctionManager {
    /// Fetches the function configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when the function does not exist.
    fn get_function(&self, function_name: &str) -> Result<FunctionConfiguration, RemoteError>;

    /// Creates and publishes a function.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn create_function(
        &self,
        spec: &FunctionSpec,
        code: &CodeLocation,
    ) -> Result<FunctionConfiguration, RemoteError>;

    /// Replaces the function code and publishes a new version.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the update fails.
    fn update_function_code(
        &self,
        function_name: &str,
        code: &CodeLocation,
    ) -> Result<FunctionConfiguration, RemoteError>;

    /// Updates role, runtime, timeout, memory, VPC, and environment.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the update fails.
    fn update_function_configuration(
        &self,
        spec: &FunctionSpec,
    ) -> Result<FunctionConfiguration, RemoteError>;

    /// Blocks until a newly created function is active.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the function fails to activate or the
    /// wait times out.
    fn wait_until_function_active(&self, function_name: &str) -> Result<(), RemoteError>;

    /// Blocks until the last code or configuration update has settled.
    ///
    /// The service rejects further changes to a function while an update is
    /// in progress.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the update fails or the wait times out.
    fn wait_until_function_updated(&self, function_name: &str) -> Result<(), RemoteError>;
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// API gateway resource, method, and deployment management.
pub trait GatewayManager {
    /// Lists REST APIs visible to the account.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when listing fails.
    fn list_rest_apis(&self) -> Result<Vec<RestApi>, RemoteError>;

    /// Creates a REST API; the gateway creates its root resource.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn create_rest_api(&self, name: &str) -> Result<RestApi, RemoteError>;

    /// Applies patch operations to a REST API.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the update fails.
    fn update_rest_api(
        &self,
        rest_api_id: &RestApiId,
        patches: &[PatchOperation],
    ) -> Result<(), RemoteError>;

    /// Lists every resource of a REST API with its methods.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when listing fails.
    fn get_resources(&self, rest_api_id: &RestApiId) -> Result<Vec<RemoteResource>, RemoteError>;

    /// Creates a child resource.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn create_resource(
        &self,
        rest_api_id: &RestApiId,
        parent_id: &ResourceId,
        path_part: &str,
    ) -> Result<RemoteResource, RemoteError>;

    /// Deletes a resource and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when it is already gone.
    fn delete_resource(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
    ) -> Result<(), RemoteError>;

    /// Returns whether a method exists.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] for failures other than not-found.
    fn method_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<bool, RemoteError>;

    /// Creates an open method (no API key, no authorization).
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn put_method(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<(), RemoteError>;

    /// Deletes a method.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when it is already gone.
    fn delete_method(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<(), RemoteError>;

    /// Returns whether a method has an integration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] for failures other than not-found.
    fn integration_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<bool, RemoteError>;

    /// Creates a proxy integration invoking `uri` with `POST`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn put_integration(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        uri: &str,
    ) -> Result<(), RemoteError>;

    /// Applies patch operations to an integration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the update fails.
    fn update_integration(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        patches: &[PatchOperation],
    ) -> Result<(), RemoteError>;

    /// Returns whether an integration response exists for a status code.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] for failures other than not-found.
    fn integration_response_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<bool, RemoteError>;

    /// Creates an integration response without mappings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn put_integration_response(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<(), RemoteError>;

    /// Returns whether a method response exists for a status code.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] for failures other than not-found.
    fn method_response_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<bool, RemoteError>;

    /// Creates a method response without mappings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when creation fails.
    fn put_method_response(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<(), RemoteError>;

    /// Publishes the current configuration to a stage.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when publishing fails.
    fn create_deployment(
        &self,
        rest_api_id: &RestApiId,
        stage: &DeploymentStage,
    ) -> Result<(), RemoteError>;
}

// ============================================================================
// SECTION: Permissions
// ============================================================================

/// Function invoke-permission management.
pub trait PermissionManager {
    /// Returns the statements of the function policy.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] when the function has no policy.
    fn get_policy(&self, function_name: &str) -> Result<Vec<PolicyStatement>, RemoteError>;

    /// Adds a permission statement.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the grant fails.
    fn add_permission(
        &self,
        function_name: &str,
        statement: &PolicyStatement,
    ) -> Result<(), RemoteError>;

    /// Removes a permission statement.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when removal fails.
    fn remove_permission(
        &self,
        function_name: &str,
        statement_id: &StatementId,
    ) -> Result<(), RemoteError>;
}

// ============================================================================
// SECTION: Cloud Provider
// ============================================================================

/// Full capability set of a deployment target.
pub trait CloudProvider:
    CodeStorage + RoleManager + FunctionManager + GatewayManager + PermissionManager
{
    /// Returns the provider region used in URIs and ARNs.
    fn region(&self) -> &str;
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Receiver of deployment progress events.
pub trait DeployEventSink: Send + Sync {
    /// Records a single event.
    fn record(&self, event: &DeployEvent);
}

impl<T> DeployEventSink for Box<T>
where
    T: DeployEventSink + ?Sized,
{
    fn record(&self, event: &DeployEvent) {
        (**self).record(event);
    }
}

impl<T> DeployEventSink for std::sync::Arc<T>
where
    T: DeployEventSink + ?Sized,
{
    fn record(&self, event: &DeployEvent) {
        (**self).record(event);
    }
}
