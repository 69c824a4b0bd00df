// crates/hexaville-core/src/runtime/reconciler.rs
// ============================================================================
// Module: Integration Reconciler
// Description: Wires a resource method to the function invocation URI.
// Purpose: Converge method, integration, and responses with existence checks.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Four idempotent steps run per resource and method. Each step checks for
//! existence first and only creates what is missing. The integration URI is
//! the one field that is always re-asserted, so a new function version is
//! picked up on every deploy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DeployEvent;
use crate::core::DeployEventKind;
use crate::core::DeployPhase;
use crate::core::PatchOperation;
use crate::core::RemoteResource;
use crate::core::RestApiId;
use crate::core::gateway::RESPONSE_STATUS_CODE;
use crate::interfaces::DeployEventSink;
use crate::interfaces::GatewayManager;
use crate::runtime::error::DeployError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The method was created.
    pub method_created: bool,
    /// The integration was created.
    pub integration_created: bool,
    /// An existing integration had its URI re-asserted.
    pub uri_patched: bool,
    /// The 200 integration response was created.
    pub integration_response_created: bool,
    /// The 200 method response was created.
    pub method_response_created: bool,
}

// ============================================================================
// SECTION: Reconciliation
// ============================================================================

/// Ensures `method` on `resource` is fully wired to `invocation_uri`.
///
/// # Errors
///
/// Returns [`DeployError::Remote`] on the first failing remote call.
pub fn reconcile_integration<G>(
    gateway: &G,
    rest_api_id: &RestApiId,
    resource: &RemoteResource,
    method: &str,
    invocation_uri: &str,
    sink: &dyn DeployEventSink,
) -> Result<ReconcileOutcome, DeployError>
where
    G: GatewayManager + ?Sized,
{
    let phase = DeployPhase::ReconcileRoutes;
    let on_error = DeployError::remote(phase);
    let method = method.to_ascii_uppercase();
    let resource_id = &resource.id;
    let event = |kind: DeployEventKind| {
        sink.record(
            &DeployEvent::new(kind, phase)
                .with_subject(resource.path.clone())
                .with_method(method.clone()),
        );
    };
    let mut outcome = ReconcileOutcome::default();

    if !gateway.method_exists(rest_api_id, resource_id, &method).map_err(&on_error)? {
        gateway.put_method(rest_api_id, resource_id, &method).map_err(&on_error)?;
        outcome.method_created = true;
        event(DeployEventKind::MethodCreated);
    }

    if gateway.integration_exists(rest_api_id, resource_id, &method).map_err(&on_error)? {
        gateway
            .update_integration(
                rest_api_id,
                resource_id,
                &method,
                &[PatchOperation::replace_uri(invocation_uri)],
            )
            .map_err(&on_error)?;
        outcome.uri_patched = true;
        event(DeployEventKind::IntegrationUriPatched);
    } else {
        gateway
            .put_integration(rest_api_id, resource_id, &method, invocation_uri)
            .map_err(&on_error)?;
        outcome.integration_created = true;
        event(DeployEventKind::IntegrationCreated);
    }

    if !gateway
        .integration_response_exists(rest_api_id, resource_id, &method, RESPONSE_STATUS_CODE)
        .map_err(&on_error)?
    {
        gateway
            .put_integration_response(rest_api_id, resource_id, &method, RESPONSE_STATUS_CODE)
            .map_err(&on_error)?;
        outcome.integration_response_created = true;
        event(DeployEventKind::IntegrationResponseCreated);
    }

    if !gateway
        .method_response_exists(rest_api_id, resource_id, &method, RESPONSE_STATUS_CODE)
        .map_err(&on_error)?
    {
        gateway
            .put_method_response(rest_api_id, resource_id, &method, RESPONSE_STATUS_CODE)
            .map_err(&on_error)?;
        outcome.method_response_created = true;
        event(DeployEventKind::MethodResponseCreated);
    }

    Ok(outcome)
}
