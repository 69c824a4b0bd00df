// crates/hexaville-core/src/runtime/mod.rs
// ============================================================================
// Module: Hexaville Runtime
// Description: Reconciliation engine and in-memory provider.
// Purpose: Converge remote gateway and function state onto a route manifest.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement path resolution, integration reconciliation,
//! deletion planning, permission synchronization, and the orchestrator that
//! sequences them. All calls are synchronous and strictly sequential.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod permissions;
pub mod planner;
pub mod reconciler;
pub mod resolver;
pub mod sinks;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::DeployError;
pub use memory::GatewaySnapshot;
pub use memory::IN_MEMORY_ACCOUNT_ID;
pub use memory::InMemoryCloud;
pub use orchestrator::DEFAULT_ROLE_PROPAGATION_DELAY;
pub use orchestrator::DeployRequest;
pub use orchestrator::DeployResult;
pub use orchestrator::Deployer;
pub use orchestrator::DeployerConfig;
pub use permissions::PermissionPlan;
pub use permissions::active_arns;
pub use permissions::plan_permissions;
pub use permissions::sync_permissions;
pub use planner::PrunePlan;
pub use planner::plan_deletions;
pub use planner::prune_plan;
pub use reconciler::ReconcileOutcome;
pub use reconciler::reconcile_integration;
pub use resolver::ResolvedPath;
pub use resolver::resolve_path;
pub use sinks::NoopDeploySink;
pub use sinks::RecordingDeploySink;
