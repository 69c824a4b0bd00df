// crates/hexaville-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Cloud
// Description: Deterministic cloud provider fake for tests and dry runs.
// Purpose: Exercise the deployment engine without network access.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryCloud`] implements every provider interface over a single
//! mutex-protected state. It mirrors the remote behaviors the engine relies
//! on: not-found on missing objects, conflicts on duplicate creates, a root
//! resource per REST API, and version-qualified function ARNs. Every call is
//! logged by operation name and any operation can be made to fail.
//! Clones share state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::CodeLocation;
use crate::core::DeploymentStage;
use crate::core::FunctionConfiguration;
use crate::core::FunctionSpec;
use crate::core::PatchOp;
use crate::core::PatchOperation;
use crate::core::PolicyStatement;
use crate::core::RemoteResource;
use crate::core::ResourceId;
use crate::core::RestApi;
use crate::core::RestApiId;
use crate::core::StatementId;
use crate::core::manifest::ROOT_PATH;
use crate::core::resources::child_path;
use crate::interfaces::CloudProvider;
use crate::interfaces::CodeStorage;
use crate::interfaces::FunctionManager;
use crate::interfaces::GatewayManager;
use crate::interfaces::PermissionManager;
use crate::interfaces::RemoteError;
use crate::interfaces::RoleManager;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Account id embedded in every ARN issued by the fake.
pub const IN_MEMORY_ACCOUNT_ID: &str = "123456789012";

/// Region used by [`InMemoryCloud::default`].
pub const IN_MEMORY_DEFAULT_REGION: &str = "us-east-1";

// ============================================================================
// SECTION: State
// ============================================================================

/// Stored function.
#[derive(Debug, Clone)]
struct StoredFunction {
    /// Latest configuration.
    spec: FunctionSpec,
    /// Latest published version number.
    version: u64,
    /// True from a create or update until the next wait settles it.
    pending: bool,
}

/// Stored resource with its method wiring.
#[derive(Debug, Clone)]
struct StoredResource {
    /// Resource as reported by listings.
    resource: RemoteResource,
    /// Integration URI per method.
    integrations: BTreeMap<String, String>,
    /// Integration responses as (method, status).
    integration_responses: BTreeSet<(String, String)>,
    /// Method responses as (method, status).
    method_responses: BTreeSet<(String, String)>,
}

/// Stored REST API.
#[derive(Debug, Clone)]
struct StoredApi {
    /// API metadata.
    api: RestApi,
    /// Resources in creation order, root first.
    resources: Vec<StoredResource>,
    /// Stages published, in order.
    deployments: Vec<String>,
}

/// Complete fake cloud state.
#[derive(Debug, Default)]
struct CloudState {
    /// Existing buckets.
    buckets: BTreeSet<String>,
    /// Uploaded objects by (bucket, key).
    objects: BTreeMap<(String, String), Vec<u8>>,
    /// Role ARNs by role name.
    roles: BTreeMap<String, String>,
    /// Inline role policies by (role, policy name).
    role_policies: BTreeMap<(String, String), String>,
    /// Functions by name.
    functions: BTreeMap<String, StoredFunction>,
    /// REST APIs in creation order.
    apis: Vec<StoredApi>,
    /// Policy statements by function name.
    policies: BTreeMap<String, Vec<PolicyStatement>>,
    /// Operation log.
    calls: Vec<String>,
    /// Operations forced to fail.
    failures: BTreeSet<String>,
    /// Id counter.
    next_id: u64,
}

impl CloudState {
    /// Issues a fresh identifier.
    fn issue_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:06}", self.next_id)
    }

    /// Returns a function that has no update in progress.
    fn settled_function_mut(
        &mut self,
        function_name: &str,
    ) -> Result<&mut StoredFunction, RemoteError> {
        let stored = self
            .functions
            .get_mut(function_name)
            .ok_or_else(|| RemoteError::NotFound(format!("function {function_name}")))?;
        if stored.pending {
            return Err(RemoteError::Failed(format!(
                "function {function_name} has an update in progress"
            )));
        }
        Ok(stored)
    }

    /// Marks the last create or update of a function as finished.
    fn settle_function(&mut self, function_name: &str) -> Result<(), RemoteError> {
        let stored = self
            .functions
            .get_mut(function_name)
            .ok_or_else(|| RemoteError::NotFound(format!("function {function_name}")))?;
        stored.pending = false;
        Ok(())
    }

    /// Returns a REST API by id.
    fn api(&self, rest_api_id: &RestApiId) -> Result<&StoredApi, RemoteError> {
        self.apis
            .iter()
            .find(|stored| stored.api.id == *rest_api_id)
            .ok_or_else(|| RemoteError::NotFound(format!("rest api {rest_api_id}")))
    }

    /// Returns a REST API by id, mutably.
    fn api_mut(&mut self, rest_api_id: &RestApiId) -> Result<&mut StoredApi, RemoteError> {
        self.apis
            .iter_mut()
            .find(|stored| stored.api.id == *rest_api_id)
            .ok_or_else(|| RemoteError::NotFound(format!("rest api {rest_api_id}")))
    }

    /// Returns a resource by id.
    fn resource(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
    ) -> Result<&StoredResource, RemoteError> {
        self.api(rest_api_id)?
            .resources
            .iter()
            .find(|stored| stored.resource.id == *resource_id)
            .ok_or_else(|| RemoteError::NotFound(format!("resource {resource_id}")))
    }

    /// Returns a resource by id, mutably.
    fn resource_mut(
        &mut self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
    ) -> Result<&mut StoredResource, RemoteError> {
        self.api_mut(rest_api_id)?
            .resources
            .iter_mut()
            .find(|stored| stored.resource.id == *resource_id)
            .ok_or_else(|| RemoteError::NotFound(format!("resource {resource_id}")))
    }

    /// Returns a resource that must carry `method`.
    fn method_owner_mut(
        &mut self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<&mut StoredResource, RemoteError> {
        let stored = self.resource_mut(rest_api_id, resource_id)?;
        if stored.resource.has_method(method) {
            Ok(stored)
        } else {
            Err(RemoteError::NotFound(format!("method {method} on {resource_id}")))
        }
    }
}

// ============================================================================
// SECTION: In-Memory Cloud
// ============================================================================

/// Gateway state captured for assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewaySnapshot {
    /// Resources in creation order.
    pub resources: Vec<RemoteResource>,
    /// Integration URIs keyed by (path, method).
    pub integrations: BTreeMap<(String, String), String>,
    /// Number of integration responses.
    pub integration_responses: usize,
    /// Number of method responses.
    pub method_responses: usize,
    /// Binary media types enabled on the API.
    pub binary_media_types: Vec<String>,
    /// Stages published, in order.
    pub deployments: Vec<String>,
}

/// In-memory implementation of every provider interface.
#[derive(Debug, Clone)]
pub struct InMemoryCloud {
    /// Region reported to the engine.
    region: String,
    /// Shared state.
    state: Arc<Mutex<CloudState>>,
}

impl Default for InMemoryCloud {
    fn default() -> Self {
        Self::new(IN_MEMORY_DEFAULT_REGION)
    }
}

impl InMemoryCloud {
    /// Creates an empty cloud in `region`.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Arc::new(Mutex::new(CloudState::default())),
        }
    }

    /// Makes every later call of `operation` fail.
    pub fn fail_on(&self, operation: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(operation.to_string());
        }
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.clear();
        }
    }

    /// Returns the operation log.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    /// Counts logged calls of one operation.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .map(|state| state.calls.iter().filter(|call| *call == operation).count())
            .unwrap_or_default()
    }

    /// Clears the operation log.
    pub fn reset_calls(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.clear();
        }
    }

    /// Returns the id of the REST API named `name`.
    #[must_use]
    pub fn rest_api_id(&self, name: &str) -> Option<RestApiId> {
        let state = self.state.lock().ok()?;
        state.apis.iter().find(|stored| stored.api.name == name).map(|stored| stored.api.id.clone())
    }

    /// Captures the gateway state of one REST API.
    #[must_use]
    pub fn gateway_snapshot(&self, rest_api_id: &RestApiId) -> Option<GatewaySnapshot> {
        let state = self.state.lock().ok()?;
        let stored = state.api(rest_api_id).ok()?;
        let mut snapshot = GatewaySnapshot {
            resources: stored.resources.iter().map(|entry| entry.resource.clone()).collect(),
            binary_media_types: stored.api.binary_media_types.clone(),
            deployments: stored.deployments.clone(),
            ..GatewaySnapshot::default()
        };
        for entry in &stored.resources {
            for (method, uri) in &entry.integrations {
                snapshot
                    .integrations
                    .insert((entry.resource.path.clone(), method.clone()), uri.clone());
            }
            snapshot.integration_responses += entry.integration_responses.len();
            snapshot.method_responses += entry.method_responses.len();
        }
        Some(snapshot)
    }

    /// Returns the policy statements of a function.
    #[must_use]
    pub fn policy_statements(&self, function_name: &str) -> Vec<PolicyStatement> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.policies.get(function_name).cloned())
            .unwrap_or_default()
    }

    /// Inserts a statement directly, bypassing the call log.
    pub fn seed_policy_statement(&self, function_name: &str, statement: PolicyStatement) {
        if let Ok(mut state) = self.state.lock() {
            state.policies.entry(function_name.to_string()).or_default().push(statement);
        }
    }

    /// Returns the stored configuration of a function.
    #[must_use]
    pub fn function_spec(&self, function_name: &str) -> Option<FunctionSpec> {
        let state = self.state.lock().ok()?;
        state.functions.get(function_name).map(|stored| stored.spec.clone())
    }

    /// Returns the latest published version of a function.
    #[must_use]
    pub fn function_version(&self, function_name: &str) -> Option<u64> {
        let state = self.state.lock().ok()?;
        state.functions.get(function_name).map(|stored| stored.version)
    }

    /// Returns true while a function create or update has not been waited on.
    #[must_use]
    pub fn function_update_pending(&self, function_name: &str) -> Option<bool> {
        let state = self.state.lock().ok()?;
        state.functions.get(function_name).map(|stored| stored.pending)
    }

    /// Returns true when the bucket exists.
    #[must_use]
    pub fn bucket_exists(&self, bucket: &str) -> bool {
        self.state.lock().is_ok_and(|state| state.buckets.contains(bucket))
    }

    /// Returns the bytes stored under a bucket and key.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().ok()?;
        state.objects.get(&(bucket.to_string(), key.to_string())).cloned()
    }

    /// Returns the inline policy document attached to a role.
    #[must_use]
    pub fn role_policy(&self, role_name: &str, policy_name: &str) -> Option<String> {
        let state = self.state.lock().ok()?;
        state.role_policies.get(&(role_name.to_string(), policy_name.to_string())).cloned()
    }

    /// Logs the call, applies failure injection, then runs `action`.
    fn call<T>(
        &self,
        operation: &str,
        action: impl FnOnce(&mut CloudState) -> Result<T, RemoteError>,
    ) -> Result<T, RemoteError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| RemoteError::Failed("in-memory cloud mutex poisoned".to_string()))?;
        state.calls.push(operation.to_string());
        if state.failures.contains(operation) {
            return Err(RemoteError::Failed(format!("injected failure: {operation}")));
        }
        action(&mut state)
    }

    /// Builds a function ARN, version-qualified when `version` is set.
    fn function_arn(&self, name: &str, version: Option<u64>) -> String {
        let base = format!("arn:aws:lambda:{}:{IN_MEMORY_ACCOUNT_ID}:function:{name}", self.region);
        match version {
            Some(version) => format!("{base}:{version}"),
            None => base,
        }
    }
}

// ============================================================================
// SECTION: Code Storage
// ============================================================================

impl CodeStorage for InMemoryCloud {
    fn create_bucket(&self, bucket: &str) -> Result<(), RemoteError> {
        self.call("create_bucket", |state| {
            if state.buckets.insert(bucket.to_string()) {
                Ok(())
            } else {
                Err(RemoteError::AlreadyExists(format!("bucket {bucket}")))
            }
        })
    }

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<Option<String>, RemoteError> {
        self.call("put_object", |state| {
            if !state.buckets.contains(bucket) {
                return Err(RemoteError::NotFound(format!("bucket {bucket}")));
            }
            state.objects.insert((bucket.to_string(), key.to_string()), bytes);
            Ok(Some(state.issue_id("v")))
        })
    }
}

// ============================================================================
// SECTION: Roles
// ============================================================================

impl RoleManager for InMemoryCloud {
    fn get_role_arn(&self, role_name: &str) -> Result<String, RemoteError> {
        self.call("get_role_arn", |state| {
            state
                .roles
                .get(role_name)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound(format!("role {role_name}")))
        })
    }

    fn create_role(
        &self,
        role_name: &str,
        _assume_role_policy: &str,
    ) -> Result<String, RemoteError> {
        self.call("create_role", |state| {
            if state.roles.contains_key(role_name) {
                return Err(RemoteError::AlreadyExists(format!("role {role_name}")));
            }
            let arn = format!("arn:aws:iam::{IN_MEMORY_ACCOUNT_ID}:role/{role_name}");
            state.roles.insert(role_name.to_string(), arn.clone());
            Ok(arn)
        })
    }

    fn role_policy_exists(&self, role_name: &str, policy_name: &str) -> Result<bool, RemoteError> {
        self.call("role_policy_exists", |state| {
            Ok(state.role_policies.contains_key(&(role_name.to_string(), policy_name.to_string())))
        })
    }

    fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<(), RemoteError> {
        self.call("put_role_policy", |state| {
            if !state.roles.contains_key(role_name) {
                return Err(RemoteError::NotFound(format!("role {role_name}")));
            }
            state.role_policies.insert(
                (role_name.to_string(), policy_name.to_string()),
                policy_document.to_string(),
            );
            Ok(())
        })
    }
}

// ============================================================================
// SECTION: Functions
// ============================================================================

impl FunctionManager for InMemoryCloud {
    fn get_function(&self, function_name: &str) -> Result<FunctionConfiguration, RemoteError> {
        let exists = self.call("get_function", |state| {
            Ok(state.functions.contains_key(function_name))
        })?;
        if !exists {
            return Err(RemoteError::NotFound(format!("function {function_name}")));
        }
        Ok(FunctionConfiguration {
            function_arn: self.function_arn(function_name, None),
        })
    }

    fn create_function(
        &self,
        spec: &FunctionSpec,
        _code: &CodeLocation,
    ) -> Result<FunctionConfiguration, RemoteError> {
        self.call("create_function", |state| {
            if state.functions.contains_key(&spec.name) {
                return Err(RemoteError::AlreadyExists(format!("function {}", spec.name)));
            }
            state.functions.insert(
                spec.name.clone(),
                StoredFunction {
                    spec: spec.clone(),
                    version: 1,
                    pending: true,
                },
            );
            Ok(())
        })?;
        Ok(FunctionConfiguration {
            function_arn: self.function_arn(&spec.name, Some(1)),
        })
    }

    fn update_function_code(
        &self,
        function_name: &str,
        _code: &CodeLocation,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let version = self.call("update_function_code", |state| {
            let stored = state.settled_function_mut(function_name)?;
            stored.pending = true;
            stored.version += 1;
            Ok(stored.version)
        })?;
        Ok(FunctionConfiguration {
            function_arn: self.function_arn(function_name, Some(version)),
        })
    }

    fn update_function_configuration(
        &self,
        spec: &FunctionSpec,
    ) -> Result<FunctionConfiguration, RemoteError> {
        self.call("update_function_configuration", |state| {
            let stored = state.settled_function_mut(&spec.name)?;
            stored.pending = true;
            stored.spec = spec.clone();
            Ok(())
        })?;
        Ok(FunctionConfiguration {
            function_arn: self.function_arn(&spec.name, None),
        })
    }

    fn wait_until_function_active(&self, function_name: &str) -> Result<(), RemoteError> {
        self.call("wait_until_function_active", |state| state.settle_function(function_name))
    }

    fn wait_until_function_updated(&self, function_name: &str) -> Result<(), RemoteError> {
        self.call("wait_until_function_updated", |state| state.settle_function(function_name))
    }
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

impl GatewayManager for InMemoryCloud {
    fn list_rest_apis(&self) -> Result<Vec<RestApi>, RemoteError> {
        self.call("list_rest_apis", |state| {
            Ok(state.apis.iter().map(|stored| stored.api.clone()).collect())
        })
    }

    fn create_rest_api(&self, name: &str) -> Result<RestApi, RemoteError> {
        self.call("create_rest_api", |state| {
            let api = RestApi {
                id: RestApiId::new(state.issue_id("api")),
                name: name.to_string(),
                binary_media_types: Vec::new(),
            };
            let root = RemoteResource {
                id: ResourceId::new(state.issue_id("res")),
                path: ROOT_PATH.to_string(),
                path_part: ROOT_PATH.to_string(),
                parent_id: None,
                methods: BTreeSet::new(),
            };
            state.apis.push(StoredApi {
                api: api.clone(),
                resources: vec![StoredResource::new(root)],
                deployments: Vec::new(),
            });
            Ok(api)
        })
    }

    fn update_rest_api(
        &self,
        rest_api_id: &RestApiId,
        patches: &[PatchOperation],
    ) -> Result<(), RemoteError> {
        self.call("update_rest_api", |state| {
            let stored = state.api_mut(rest_api_id)?;
            for patch in patches {
                let Some(encoded) = patch.path.strip_prefix("/binaryMediaTypes/") else {
                    let message = format!("unsupported patch path {}", patch.path);
                    return Err(RemoteError::Failed(message));
                };
                let media_type = encoded.replace("~1", "/");
                let types = &mut stored.api.binary_media_types;
                match patch.op {
                    PatchOp::Add | PatchOp::Replace => {
                        if !types.contains(&media_type) {
                            types.push(media_type);
                        }
                    }
                    PatchOp::Remove => types.retain(|present| *present != media_type),
                }
            }
            Ok(())
        })
    }

    fn get_resources(&self, rest_api_id: &RestApiId) -> Result<Vec<RemoteResource>, RemoteError> {
        self.call("get_resources", |state| {
            let stored = state.api(rest_api_id)?;
            Ok(stored.resources.iter().map(|entry| entry.resource.clone()).collect())
        })
    }

    fn create_resource(
        &self,
        rest_api_id: &RestApiId,
        parent_id: &ResourceId,
        path_part: &str,
    ) -> Result<RemoteResource, RemoteError> {
        self.call("create_resource", |state| {
            let parent_path = state.resource(rest_api_id, parent_id)?.resource.path.clone();
            let path = child_path(&parent_path, path_part);
            let id = ResourceId::new(state.issue_id("res"));
            let stored = state.api_mut(rest_api_id)?;
            if stored.resources.iter().any(|entry| entry.resource.path == path) {
                return Err(RemoteError::AlreadyExists(format!("resource {path}")));
            }
            let resource = RemoteResource {
                id,
                path,
                path_part: path_part.to_string(),
                parent_id: Some(parent_id.clone()),
                methods: BTreeSet::new(),
            };
            stored.resources.push(StoredResource::new(resource.clone()));
            Ok(resource)
        })
    }

    fn delete_resource(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
    ) -> Result<(), RemoteError> {
        self.call("delete_resource", |state| {
            let target = state.resource(rest_api_id, resource_id)?.resource.clone();
            if target.is_root() {
                return Err(RemoteError::Failed("the root resource cannot be deleted".to_string()));
            }
            let prefix = format!("{}/", target.path);
            let stored = state.api_mut(rest_api_id)?;
            stored.resources.retain(|entry| {
                entry.resource.id != target.id && !entry.resource.path.starts_with(&prefix)
            });
            Ok(())
        })
    }

    fn method_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<bool, RemoteError> {
        self.call("method_exists", |state| {
            Ok(state.resource(rest_api_id, resource_id)?.resource.has_method(method))
        })
    }

    fn put_method(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<(), RemoteError> {
        self.call("put_method", |state| {
            let stored = state.resource_mut(rest_api_id, resource_id)?;
            if stored.resource.methods.insert(method.to_ascii_uppercase()) {
                Ok(())
            } else {
                Err(RemoteError::AlreadyExists(format!("method {method} on {resource_id}")))
            }
        })
    }

    fn delete_method(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<(), RemoteError> {
        self.call("delete_method", |state| {
            let stored = state.method_owner_mut(rest_api_id, resource_id, method)?;
            let method = method.to_ascii_uppercase();
            stored.resource.methods.remove(&method);
            stored.integrations.remove(&method);
            stored.integration_responses.retain(|(owner, _)| *owner != method);
            stored.method_responses.retain(|(owner, _)| *owner != method);
            Ok(())
        })
    }

    fn integration_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
    ) -> Result<bool, RemoteError> {
        self.call("integration_exists", |state| {
            let stored = state.resource(rest_api_id, resource_id)?;
            Ok(stored.integrations.contains_key(&method.to_ascii_uppercase()))
        })
    }

    fn put_integration(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        uri: &str,
    ) -> Result<(), RemoteError> {
        self.call("put_integration", |state| {
            let stored = state.method_owner_mut(rest_api_id, resource_id, method)?;
            stored.integrations.insert(method.to_ascii_uppercase(), uri.to_string());
            Ok(())
        })
    }

    fn update_integration(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        patches: &[PatchOperation],
    ) -> Result<(), RemoteError> {
        self.call("update_integration", |state| {
            let stored = state.method_owner_mut(rest_api_id, resource_id, method)?;
            let uri = stored
                .integrations
                .get_mut(&method.to_ascii_uppercase())
                .ok_or_else(|| RemoteError::NotFound(format!("integration {method}")))?;
            for patch in patches {
                if patch.path == "/uri"
                    && let Some(value) = &patch.value
                {
                    value.clone_into(uri);
                }
            }
            Ok(())
        })
    }

    fn integration_response_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<bool, RemoteError> {
        self.call("integration_response_exists", |state| {
            let stored = state.resource(rest_api_id, resource_id)?;
            Ok(stored
                .integration_responses
                .contains(&(method.to_ascii_uppercase(), status_code.to_string())))
        })
    }

    fn put_integration_response(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<(), RemoteError> {
        self.call("put_integration_response", |state| {
            let stored = state.method_owner_mut(rest_api_id, resource_id, method)?;
            let key = (method.to_ascii_uppercase(), status_code.to_string());
            stored.integration_responses.insert(key);
            Ok(())
        })
    }

    fn method_response_exists(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<bool, RemoteError> {
        self.call("method_response_exists", |state| {
            let stored = state.resource(rest_api_id, resource_id)?;
            Ok(stored
                .method_responses
                .contains(&(method.to_ascii_uppercase(), status_code.to_string())))
        })
    }

    fn put_method_response(
        &self,
        rest_api_id: &RestApiId,
        resource_id: &ResourceId,
        method: &str,
        status_code: &str,
    ) -> Result<(), RemoteError> {
        self.call("put_method_response", |state| {
            let stored = state.method_owner_mut(rest_api_id, resource_id, method)?;
            stored.method_responses.insert((method.to_ascii_uppercase(), status_code.to_string()));
            Ok(())
        })
    }

    fn create_deployment(
        &self,
        rest_api_id: &RestApiId,
        stage: &DeploymentStage,
    ) -> Result<(), RemoteError> {
        self.call("create_deployment", |state| {
            state.api_mut(rest_api_id)?.deployments.push(stage.to_string());
            Ok(())
        })
    }
}

// ============================================================================
// SECTION: Permissions
// ============================================================================

impl PermissionManager for InMemoryCloud {
    fn get_policy(&self, function_name: &str) -> Result<Vec<PolicyStatement>, RemoteError> {
        self.call("get_policy", |state| {
            match state.policies.get(function_name) {
                Some(statements) if !statements.is_empty() => Ok(statements.clone()),
                _ => Err(RemoteError::NotFound(format!("policy of {function_name}"))),
            }
        })
    }

    fn add_permission(
        &self,
        function_name: &str,
        statement: &PolicyStatement,
    ) -> Result<(), RemoteError> {
        self.call("add_permission", |state| {
            if !state.functions.contains_key(function_name) {
                return Err(RemoteError::NotFound(format!("function {function_name}")));
            }
            let statements = state.policies.entry(function_name.to_string()).or_default();
            if statements.iter().any(|present| present.statement_id == statement.statement_id) {
                return Err(RemoteError::AlreadyExists(format!(
                    "statement {}",
                    statement.statement_id
                )));
            }
            statements.push(statement.clone());
            Ok(())
        })
    }

    fn remove_permission(
        &self,
        function_name: &str,
        statement_id: &StatementId,
    ) -> Result<(), RemoteError> {
        self.call("remove_permission", |state| {
            let statements = state
                .policies
                .get_mut(function_name)
                .ok_or_else(|| RemoteError::NotFound(format!("policy of {function_name}")))?;
            let before = statements.len();
            statements.retain(|present| present.statement_id != *statement_id);
            if statements.len() == before {
                return Err(RemoteError::NotFound(format!("statement {statement_id}")));
            }
            Ok(())
        })
    }
}

impl CloudProvider for InMemoryCloud {
    fn region(&self) -> &str {
        &self.region
    }
}

impl StoredResource {
    /// Wraps a bare resource.
    const fn new(resource: RemoteResource) -> Self {
        Self {
            resource,
            integrations: BTreeMap::new(),
            integration_responses: BTreeSet::new(),
            method_responses: BTreeSet::new(),
        }
    }
}
