// crates/hexaville-core/src/runtime/orchestrator.rs
// ============================================================================
// Module: Deployment Orchestrator
// Description: Sequences one deployment run against a cloud provider.
// Purpose: Converge function, gateway, and permissions onto a route manifest.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! A run walks the phases of [`DeployPhase`] strictly in order:
//! upload code, update the function, enable binary media types, reconcile
//! routes, prune stale methods, synchronize permissions, prune stale
//! resources, and publish the stage. Remote state is read fresh at the start
//! of each phase that needs it and nothing is cached between runs.
//!
//! ## Invariants
//! - The first failure ends the run; earlier phases are not rolled back.
//! - Re-running after a failure converges because every create is guarded by
//!   an existence check.
//! - Whole-resource pruning happens after permission sync and before publish.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;

use crate::core::AppNaming;
use crate::core::ArnContext;
use crate::core::CodeLocation;
use crate::core::DeletionSummary;
use crate::core::DeployEvent;
use crate::core::DeployEventKind;
use crate::core::DeployPhase;
use crate::core::DeploymentStage;
use crate::core::FunctionConfiguration;
use crate::core::FunctionSettings;
use crate::core::FunctionSpec;
use crate::core::LambdaPackage;
use crate::core::ResourceIndex;
use crate::core::RestApi;
use crate::core::RestApiId;
use crate::core::RouteListing;
use crate::core::RouteManifest;
use crate::core::RoutesReport;
use crate::core::arn::endpoint;
use crate::core::arn::invocation_uri;
use crate::core::function::PACKAGE_CONTENT_TYPE;
use crate::core::gateway::binary_media_type_patches;
use crate::core::naming::ASSUME_ROLE_POLICY_DOCUMENT;
use crate::core::naming::DEFAULT_FUNCTION_RUNTIME;
use crate::core::naming::FUNCTION_DESCRIPTION;
use crate::core::naming::FUNCTION_HANDLER;
use crate::core::naming::LOGS_POLICY_DOCUMENT;
use crate::core::naming::ROLE_POLICY_NAME;
use crate::interfaces::CloudProvider;
use crate::interfaces::DeployEventSink;
use crate::interfaces::RemoteError;
use crate::runtime::error::DeployError;
use crate::runtime::permissions::active_arns;
use crate::runtime::permissions::sync_permissions;
use crate::runtime::planner::PrunePlan;
use crate::runtime::planner::plan_deletions;
use crate::runtime::planner::prune_plan;
use crate::runtime::reconciler::reconcile_integration;
use crate::runtime::resolver::resolve_path;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Wait after creating the execution role before the function may use it.
pub const DEFAULT_ROLE_PROPAGATION_DELAY: Duration = Duration::from_secs(10);

/// Deployer tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployerConfig {
    /// Delay after creating the managed role.
    pub role_propagation_delay: Duration,
    /// Function runtime identifier.
    pub function_runtime: String,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            role_propagation_delay: DEFAULT_ROLE_PROPAGATION_DELAY,
            function_runtime: DEFAULT_FUNCTION_RUNTIME.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Requests & Results
// ============================================================================

/// Inputs of one deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Application naming scheme.
    pub naming: AppNaming,
    /// Stage to publish.
    pub stage: DeploymentStage,
    /// Bucket receiving the package.
    pub bucket: String,
    /// Packaged function code.
    pub package: LambdaPackage,
    /// Function configuration.
    pub function: FunctionSettings,
    /// Declared routes.
    pub manifest: RouteManifest,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    /// Public endpoint of the published stage.
    pub endpoint: String,
    /// REST API that was deployed.
    pub rest_api_id: RestApiId,
    /// Function ARN returned by the last create or update.
    pub function_arn: String,
    /// Number of gateway resources created.
    pub resources_created: usize,
    /// Stale resources and methods found before pruning.
    pub deletions: DeletionSummary,
}

// ============================================================================
// SECTION: Deployer
// ============================================================================

/// Deployment orchestrator over a cloud provider and an event sink.
pub struct Deployer<C, S> {
    /// Remote capability set.
    cloud: C,
    /// Progress sink.
    sink: S,
    /// Tuning knobs.
    config: DeployerConfig,
}

impl<C, S> Deployer<C, S>
where
    C: CloudProvider,
    S: DeployEventSink,
{
    /// Creates a deployer.
    pub const fn new(cloud: C, sink: S, config: DeployerConfig) -> Self {
        Self {
            cloud,
            sink,
            config,
        }
    }

    /// Returns the cloud provider.
    pub const fn cloud(&self) -> &C {
        &self.cloud
    }

    /// Runs a full deployment.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError`] for the first failing phase.
    pub fn deploy(&self, request: &DeployRequest) -> Result<DeployResult, DeployError> {
        let code = self.upload_code(&request.bucket, &request.package)?;
        let function = self.update_function(&request.naming, &request.function, &code)?;
        let uri = invocation_uri(self.cloud.region(), &function.function_arn)?;

        let api = self.enable_binary_media_types(&request.naming)?;

        self.phase_started(DeployPhase::ReconcileRoutes);
        let mut index = self.fetch_index(&api, DeployPhase::ReconcileRoutes)?;
        let resources_created =
            self.reconcile_routes(&api.id, &mut index, &request.manifest, &uri)?;

        let candidates = plan_deletions(&request.manifest, index.as_slice());
        let deletions = DeletionSummary::from_candidates(&candidates);
        self.record(
            DeployEvent::new(DeployEventKind::DeletionPlanned, DeployPhase::PruneMethods)
                .with_detail(deletions.headline()),
        );
        let prune = prune_plan(&request.manifest, &candidates);
        self.prune_methods(&api.id, &prune)?;

        self.phase_started(DeployPhase::SyncPermissions);
        let context = ArnContext::from_invocation_uri(self.cloud.region(), &uri, api.id.clone())?;
        let active = active_arns(&context, &request.manifest)?;
        sync_permissions(&self.cloud, &request.naming.function_name(), &active, &self.sink)?;

        self.prune_resources(&api.id, &prune)?;
        self.publish(&api.id, &request.stage)?;

        let endpoint = endpoint(&api.id, self.cloud.region(), &request.stage);
        self.record(
            DeployEvent::new(DeployEventKind::DeployCompleted, DeployPhase::Done)
                .with_subject(endpoint.clone()),
        );
        Ok(DeployResult {
            endpoint,
            rest_api_id: api.id,
            function_arn: function.function_arn,
            resources_created,
            deletions,
        })
    }

    /// Lists the deployed routes and the stage endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::MissingRestApi`] when nothing was deployed yet
    /// and [`DeployError::Remote`] when listing fails.
    pub fn routes(
        &self,
        naming: &AppNaming,
        stage: &DeploymentStage,
    ) -> Result<RoutesReport, DeployError> {
        let on_error = DeployError::remote(DeployPhase::Done);
        let api_name = naming.api_name();
        let api = self
            .cloud
            .list_rest_apis()
            .map_err(&on_error)?
            .into_iter()
            .find(|api| api.name == api_name)
            .ok_or(DeployError::MissingRestApi(api_name))?;
        let mut resources = self.cloud.get_resources(&api.id).map_err(&on_error)?;
        resources.sort_by(|left, right| left.path.cmp(&right.path));
        let routes = resources
            .into_iter()
            .filter(|resource| !resource.methods.is_empty())
            .map(|resource| RouteListing {
                path: resource.path,
                methods: resource.methods.into_iter().collect(),
            })
            .collect();
        Ok(RoutesReport {
            endpoint: endpoint(&api.id, self.cloud.region(), stage),
            routes,
        })
    }

    // ------------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------------

    /// Ensures the bucket exists and uploads the package.
    fn upload_code(
        &self,
        bucket: &str,
        package: &LambdaPackage,
    ) -> Result<CodeLocation, DeployError> {
        let phase = DeployPhase::UploadCode;
        let on_error = DeployError::remote(phase);
        self.phase_started(phase);
        match self.cloud.create_bucket(bucket) {
            Ok(()) => self.record(
                DeployEvent::new(DeployEventKind::BucketCreated, phase).with_subject(bucket),
            ),
            Err(RemoteError::AlreadyExists(_)) => self.record(
                DeployEvent::new(DeployEventKind::BucketExists, phase).with_subject(bucket),
            ),
            Err(error) => return Err(on_error(error)),
        }
        let object_version = self
            .cloud
            .put_object(bucket, &package.key, package.bytes.clone(), PACKAGE_CONTENT_TYPE)
            .map_err(&on_error)?;
        self.record(
            DeployEvent::new(DeployEventKind::PackageUploaded, phase)
                .with_subject(package.key.clone())
                .with_detail(bucket),
        );
        Ok(CodeLocation {
            bucket: bucket.to_string(),
            key: package.key.clone(),
            object_version,
        })
    }

    /// Creates the function on first deploy, otherwise updates it.
    fn update_function(
        &self,
        naming: &AppNaming,
        settings: &FunctionSettings,
        code: &CodeLocation,
    ) -> Result<FunctionConfiguration, DeployError> {
        let phase = DeployPhase::UpdateFunction;
        let on_error = DeployError::remote(phase);
        self.phase_started(phase);
        let role_arn = self.resolve_role(naming, settings)?;
        let spec = FunctionSpec {
            name: naming.function_name(),
            role_arn,
            handler: FUNCTION_HANDLER.to_string(),
            runtime: self.config.function_runtime.clone(),
            description: FUNCTION_DESCRIPTION.to_string(),
            timeout: settings.timeout,
            memory: settings.memory,
            vpc: settings.vpc.clone(),
            environment: settings.environment.clone(),
        };
        match self.cloud.get_function(&spec.name) {
            Ok(_) => {
                self.cloud.update_function_configuration(&spec).map_err(&on_error)?;
                self.cloud.wait_until_function_updated(&spec.name).map_err(&on_error)?;
                let configuration =
                    self.cloud.update_function_code(&spec.name, code).map_err(&on_error)?;
                self.cloud.wait_until_function_updated(&spec.name).map_err(&on_error)?;
                self.record(
                    DeployEvent::new(DeployEventKind::FunctionUpdated, phase)
                        .with_subject(configuration.function_arn.clone()),
                );
                Ok(configuration)
            }
            Err(RemoteError::NotFound(_)) => {
                let configuration = self.cloud.create_function(&spec, code).map_err(&on_error)?;
                self.cloud.wait_until_function_active(&spec.name).map_err(&on_error)?;
                self.record(
                    DeployEvent::new(DeployEventKind::FunctionCreated, phase)
                        .with_subject(configuration.function_arn.clone()),
                );
                Ok(configuration)
            }
            Err(error) => Err(on_error(error)),
        }
    }

    /// Returns the configured role, or gets or creates the managed role.
    fn resolve_role(
        &self,
        naming: &AppNaming,
        settings: &FunctionSettings,
    ) -> Result<String, DeployError> {
        if let Some(role) = &settings.role {
            return Ok(role.clone());
        }
        let phase = DeployPhase::UpdateFunction;
        let on_error = DeployError::remote(phase);
        let role_name = naming.role_name();
        let role_arn = match self.cloud.get_role_arn(&role_name) {
            Ok(arn) => arn,
            Err(RemoteError::NotFound(_)) => {
                let arn = self
                    .cloud
                    .create_role(&role_name, ASSUME_ROLE_POLICY_DOCUMENT)
                    .map_err(&on_error)?;
                self.record(
                    DeployEvent::new(DeployEventKind::RoleCreated, phase).with_subject(arn.clone()),
                );
                if !self.config.role_propagation_delay.is_zero() {
                    thread::sleep(self.config.role_propagation_delay);
                }
                arn
            }
            Err(error) => return Err(on_error(error)),
        };
        if !self.cloud.role_policy_exists(&role_name, ROLE_POLICY_NAME).map_err(&on_error)? {
            self.cloud
                .put_role_policy(&role_name, ROLE_POLICY_NAME, LOGS_POLICY_DOCUMENT)
                .map_err(&on_error)?;
            self.record(
                DeployEvent::new(DeployEventKind::RolePolicyAttached, phase)
                    .with_subject(role_name)
                    .with_detail(ROLE_POLICY_NAME),
            );
        }
        Ok(role_arn)
    }

    /// Locates or creates the REST API and adds missing binary media types.
    fn enable_binary_media_types(&self, naming: &AppNaming) -> Result<RestApi, DeployError> {
        let phase = DeployPhase::EnableBinaryMediaTypes;
        let on_error = DeployError::remote(phase);
        self.phase_started(phase);
        let api_name = naming.api_name();
        let existing = self
            .cloud
            .list_rest_apis()
            .map_err(&on_error)?
            .into_iter()
            .find(|api| api.name == api_name);
        let api = match existing {
            Some(api) => api,
            None => {
                let api = self.cloud.create_rest_api(&api_name).map_err(&on_error)?;
                self.record(
                    DeployEvent::new(DeployEventKind::RestApiCreated, phase)
                        .with_subject(api.id.to_string()),
                );
                api
            }
        };
        let patches = binary_media_type_patches(&api.binary_media_types);
        if !patches.is_empty() {
            self.cloud.update_rest_api(&api.id, &patches).map_err(&on_error)?;
            self.record(
                DeployEvent::new(DeployEventKind::BinaryMediaTypesPatched, phase)
                    .with_subject(api.id.to_string())
                    .with_detail(patches.len().to_string()),
            );
        }
        Ok(api)
    }

    /// Fetches the resource index and checks for the root resource.
    fn fetch_index(
        &self,
        api: &RestApi,
        phase: DeployPhase,
    ) -> Result<ResourceIndex, DeployError> {
        let resources = self.cloud.get_resources(&api.id).map_err(DeployError::remote(phase))?;
        let index = ResourceIndex::new(resources);
        if index.root().is_none() {
            return Err(DeployError::MissingRootResource(api.id.to_string()));
        }
        Ok(index)
    }

    /// Resolves and wires every manifest entry; returns the resources created.
    fn reconcile_routes(
        &self,
        rest_api_id: &RestApiId,
        index: &mut ResourceIndex,
        manifest: &RouteManifest,
        uri: &str,
    ) -> Result<usize, DeployError> {
        let mut created = 0;
        for route in manifest.routes() {
            let method = route.normalized_method();
            let resolved = resolve_path(
                &self.cloud,
                rest_api_id,
                index,
                &route.path,
                Some(&method),
                &self.sink,
            )?;
            created += resolved.created;
            reconcile_integration(
                &self.cloud,
                rest_api_id,
                &resolved.resource,
                &method,
                uri,
                &self.sink,
            )?;
            index.record_method(&resolved.resource.id, &method);
        }
        Ok(created)
    }

    /// Deletes individually flagged methods.
    fn prune_methods(&self, rest_api_id: &RestApiId, plan: &PrunePlan) -> Result<(), DeployError> {
        let phase = DeployPhase::PruneMethods;
        self.phase_started(phase);
        for (resource, method) in &plan.methods {
            ignore_not_found(self.cloud.delete_method(rest_api_id, &resource.id, method))
                .map_err(DeployError::remote(phase))?;
            self.record(
                DeployEvent::new(DeployEventKind::MethodDeleted, phase)
                    .with_subject(resource.path.clone())
                    .with_method(method.clone()),
            );
        }
        Ok(())
    }

    /// Deletes whole resources flagged for removal.
    fn prune_resources(
        &self,
        rest_api_id: &RestApiId,
        plan: &PrunePlan,
    ) -> Result<(), DeployError> {
        let phase = DeployPhase::PruneResources;
        self.phase_started(phase);
        for resource in &plan.resources {
            ignore_not_found(self.cloud.delete_resource(rest_api_id, &resource.id))
                .map_err(DeployError::remote(phase))?;
            self.record(
                DeployEvent::new(DeployEventKind::ResourceDeleted, phase)
                    .with_subject(resource.path.clone()),
            );
        }
        Ok(())
    }

    /// Publishes a new deployment to the stage.
    fn publish(&self, rest_api_id: &RestApiId, stage: &DeploymentStage) -> Result<(), DeployError> {
        let phase = DeployPhase::PublishDeployment;
        self.phase_started(phase);
        self.cloud.create_deployment(rest_api_id, stage).map_err(DeployError::remote(phase))?;
        self.record(
            DeployEvent::new(DeployEventKind::DeploymentPublished, phase)
                .with_subject(stage.to_string()),
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Records a phase start.
    fn phase_started(&self, phase: DeployPhase) {
        self.record(DeployEvent::new(DeployEventKind::PhaseStarted, phase));
    }

    /// Forwards an event to the sink.
    fn record(&self, event: DeployEvent) {
        self.sink.record(&event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Treats a not-found delete as already done.
fn ignore_not_found(result: Result<(), RemoteError>) -> Result<(), RemoteError> {
    match result {
        Err(RemoteError::NotFound(_)) => Ok(()),
        other => other,
    }
}
