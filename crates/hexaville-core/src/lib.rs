// crates/hexaville-core/src/lib.rs
// ============================================================================
// Module: Hexaville Core Library
// Description: Public API surface for the Hexaville deployment engine.
// Purpose: Expose core types, provider interfaces, and the runtime engine.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Hexaville core converges a serverless HTTP deployment (one API gateway
//! proxying every route to one function) onto a declared route manifest. It
//! is vendor-agnostic: remote operations go through the traits in
//! [`interfaces`], with one in-memory implementation for tests and one AWS
//! implementation in a sibling crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CloudProvider;
pub use interfaces::CodeStorage;
pub use interfaces::DeployEventSink;
pub use interfaces::FunctionManager;
pub use interfaces::GatewayManager;
pub use interfaces::PermissionManager;
pub use interfaces::RemoteError;
pub use interfaces::RoleManager;
pub use runtime::DeployError;
pub use runtime::DeployRequest;
pub use runtime::DeployResult;
pub use runtime::Deployer;
pub use runtime::DeployerConfig;
pub use runtime::InMemoryCloud;
pub use runtime::NoopDeploySink;
pub use runtime::RecordingDeploySink;
