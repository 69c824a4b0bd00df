// crates/hexaville-core/src/core/mod.rs
// ============================================================================
// Module: Hexaville Core Types
// Description: Data model for routes, remote resources, and deploy events.
// Purpose: Provide stable, serializable types shared by every crate.
// Dependencies: serde, regex, time, uuid
// ============================================================================

//! ## Overview
//! Core types describe the desired state (route manifest), the observed
//! remote state (resource index, policy statements), and the derived strings
//! (invocation URIs, source ARNs, endpoints) that connect them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod arn;
pub mod artifact;
pub mod deletion;
pub mod events;
pub mod function;
pub mod gateway;
pub mod identifiers;
pub mod manifest;
pub mod naming;
pub mod policy;
pub mod resources;
pub mod stage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use arn::ArnContext;
pub use arn::ArnError;
pub use artifact::BuildArtifact;
pub use deletion::DeletionCandidate;
pub use deletion::DeletionSummary;
pub use events::DeployEvent;
pub use events::DeployEventKind;
pub use events::DeployPhase;
pub use function::CodeLocation;
pub use function::FunctionConfiguration;
pub use function::FunctionSettings;
pub use function::FunctionSpec;
pub use function::LambdaPackage;
pub use function::VpcSettings;
pub use gateway::PatchOp;
pub use gateway::PatchOperation;
pub use gateway::RestApi;
pub use gateway::RouteListing;
pub use gateway::RoutesReport;
pub use identifiers::ResourceId;
pub use identifiers::RestApiId;
pub use identifiers::StatementId;
pub use manifest::ManifestError;
pub use manifest::RouteEntry;
pub use manifest::RouteManifest;
pub use naming::AppNaming;
pub use policy::PolicyError;
pub use policy::PolicyStatement;
pub use resources::RemoteResource;
pub use resources::ResolvedPathSegment;
pub use resources::ResourceIndex;
pub use stage::DeploymentStage;
