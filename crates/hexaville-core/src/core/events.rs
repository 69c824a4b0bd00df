// crates/hexaville-core/src/core/events.rs
// ============================================================================
// Module: Deploy Events
// Description: Structured progress events emitted during a deployment run.
// Purpose: Report every remote mutation without tying core to an output format.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The orchestrator emits one [`DeployEvent`] per phase transition and per
//! remote mutation. Sinks decide how to render them (console text, JSON
//! lines, files). Events carry no secrets: only names, paths, and ARNs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Phases
// ============================================================================

/// Sequential deployment phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployPhase {
    /// Ensure the bucket exists and upload the package.
    UploadCode,
    /// Resolve the role, then create or update the function.
    UpdateFunction,
    /// Locate the REST API and enable binary media types.
    EnableBinaryMediaTypes,
    /// Resolve resources and reconcile integrations per route.
    ReconcileRoutes,
    /// Delete methods no longer declared.
    PruneMethods,
    /// Grant and revoke invoke permissions.
    SyncPermissions,
    /// Delete resources no longer used.
    PruneResources,
    /// Publish a deployment to the stage.
    PublishDeployment,
    /// Run finished.
    Done,
}

impl DeployPhase {
    /// Phases in execution order.
    pub const ORDER: [Self; 9] = [
        Self::UploadCode,
        Self::UpdateFunction,
        Self::EnableBinaryMediaTypes,
        Self::ReconcileRoutes,
        Self::PruneMethods,
        Self::SyncPermissions,
        Self::PruneResources,
        Self::PublishDeployment,
        Self::Done,
    ];

    /// Returns the snake-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UploadCode => "upload_code",
            Self::UpdateFunction => "update_function",
            Self::EnableBinaryMediaTypes => "enable_binary_media_types",
            Self::ReconcileRoutes => "reconcile_routes",
            Self::PruneMethods => "prune_methods",
            Self::SyncPermissions => "sync_permissions",
            Self::PruneResources => "prune_resources",
            Self::PublishDeployment => "publish_deployment",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Event Kinds
// ============================================================================

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployEventKind {
    /// A phase began.
    PhaseStarted,
    /// Bucket was created.
    BucketCreated,
    /// Bucket already existed.
    BucketExists,
    /// Package uploaded.
    PackageUploaded,
    /// Managed role created.
    RoleCreated,
    /// Logging policy attached to the managed role.
    RolePolicyAttached,
    /// Function created (first deploy).
    FunctionCreated,
    /// Function code and configuration updated.
    FunctionUpdated,
    /// REST API created.
    RestApiCreated,
    /// Binary media types patched.
    BinaryMediaTypesPatched,
    /// Gateway resource created.
    ResourceCreated,
    /// Method created.
    MethodCreated,
    /// Integration created.
    IntegrationCreated,
    /// Integration URI re-asserted.
    IntegrationUriPatched,
    /// Integration response created.
    IntegrationResponseCreated,
    /// Method response created.
    MethodResponseCreated,
    /// Deletion plan computed.
    DeletionPlanned,
    /// Method deleted.
    MethodDeleted,
    /// Invoke permission added.
    PermissionAdded,
    /// Invoke permission removed.
    PermissionRemoved,
    /// Resource deleted.
    ResourceDeleted,
    /// Deployment published.
    DeploymentPublished,
    /// Run completed.
    DeployCompleted,
}

impl DeployEventKind {
    /// Returns the snake-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PhaseStarted => "phase_started",
            Self::BucketCreated => "bucket_created",
            Self::BucketExists => "bucket_exists",
            Self::PackageUploaded => "package_uploaded",
            Self::RoleCreated => "role_created",
            Self::RolePolicyAttached => "role_policy_attached",
            Self::FunctionCreated => "function_created",
            Self::FunctionUpdated => "function_updated",
            Self::RestApiCreated => "rest_api_created",
            Self::BinaryMediaTypesPatched => "binary_media_types_patched",
            Self::ResourceCreated => "resource_created",
            Self::MethodCreated => "method_created",
            Self::IntegrationCreated => "integration_created",
            Self::IntegrationUriPatched => "integration_uri_patched",
            Self::IntegrationResponseCreated => "integration_response_created",
            Self::MethodResponseCreated => "method_response_created",
            Self::DeletionPlanned => "deletion_planned",
            Self::MethodDeleted => "method_deleted",
            Self::PermissionAdded => "permission_added",
            Self::PermissionRemoved => "permission_removed",
            Self::ResourceDeleted => "resource_deleted",
            Self::DeploymentPublished => "deployment_published",
            Self::DeployCompleted => "deploy_completed",
        }
    }
}

// ============================================================================
// SECTION: Event Payload
// ============================================================================

/// One structured deployment event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployEvent {
    /// Event kind.
    pub event: DeployEventKind,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Phase the event belongs to.
    pub phase: DeployPhase,
    /// Subject of the event: a bucket, path, ARN, or stage.
    pub subject: Option<String>,
    /// HTTP method, for route-level events.
    pub method: Option<String>,
    /// Free-form detail line.
    pub detail: Option<String>,
}

impl DeployEvent {
    /// Builds an event stamped with the current time.
    #[must_use]
    pub fn new(event: DeployEventKind, phase: DeployPhase) -> Self {
        Self {
            event,
            timestamp_ms: now_millis(),
            phase,
            subject: None,
            method: None,
            detail: None,
        }
    }

    /// Sets the event subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the detail line.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}
