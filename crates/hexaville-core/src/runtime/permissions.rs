// crates/hexaville-core/src/runtime/permissions.rs
// ============================================================================
// Module: Permission Synchronizer
// Description: Converges function invoke grants onto the active route ARNs.
// Purpose: Authorize exactly the declared routes to invoke the function.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The synchronizer compares the `sourceArn` of each existing policy
//! statement against the active ARN set using exact string equality. Missing
//! ARNs gain a statement with a fresh random id; statements whose ARN is no
//! longer active are removed. Statements without a source ARN are not ours
//! and are left alone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::ArnContext;
use crate::core::DeployEvent;
use crate::core::DeployEventKind;
use crate::core::DeployPhase;
use crate::core::PolicyStatement;
use crate::core::RouteManifest;
use crate::core::StatementId;
use crate::interfaces::DeployEventSink;
use crate::interfaces::PermissionManager;
use crate::interfaces::RemoteError;
use crate::runtime::error::DeployError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Grants to add and statements to remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionPlan {
    /// Active ARNs with no statement yet.
    pub to_add: Vec<String>,
    /// Statements whose ARN is no longer active.
    pub to_remove: Vec<PolicyStatement>,
}

impl PermissionPlan {
    /// Returns true when the policy already matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

// ============================================================================
// SECTION: Planning
// ============================================================================

/// Derives the active ARN of every manifest entry, deduplicated in order.
///
/// # Errors
///
/// Returns [`DeployError::Arn`] if a path cannot be wildcarded.
pub fn active_arns(
    context: &ArnContext,
    manifest: &RouteManifest,
) -> Result<Vec<String>, DeployError> {
    let mut seen = BTreeSet::new();
    let mut arns = Vec::new();
    for route in manifest.routes() {
        let arn = context.source_arn(route)?;
        if seen.insert(arn.clone()) {
            arns.push(arn);
        }
    }
    Ok(arns)
}

/// Compares existing statements against the active ARNs.
#[must_use]
pub fn plan_permissions(existing: &[PolicyStatement], active: &[String]) -> PermissionPlan {
    let granted: BTreeSet<&str> =
        existing.iter().filter_map(|statement| statement.source_arn.as_deref()).collect();
    let wanted: BTreeSet<&str> = active.iter().map(String::as_str).collect();
    let to_add = active.iter().filter(|arn| !granted.contains(arn.as_str())).cloned().collect();
    let to_remove = existing
        .iter()
        .filter(|statement| {
            statement.source_arn.as_deref().is_some_and(|arn| !wanted.contains(arn))
        })
        .cloned()
        .collect();
    PermissionPlan {
        to_add,
        to_remove,
    }
}

// ============================================================================
// SECTION: Synchronization
// ============================================================================

/// Fetches the function policy and applies the plan against it.
///
/// A function without a policy is treated as having no statements.
///
/// # Errors
///
/// Returns [`DeployError::Remote`] on the first failing remote call.
pub fn sync_permissions<P>(
    permissions: &P,
    function_name: &str,
    active: &[String],
    sink: &dyn DeployEventSink,
) -> Result<PermissionPlan, DeployError>
where
    P: PermissionManager + ?Sized,
{
    let phase = DeployPhase::SyncPermissions;
    let on_error = DeployError::remote(phase);
    let existing = match permissions.get_policy(function_name) {
        Ok(statements) => statements,
        Err(error) if error.is_not_found() => Vec::new(),
        Err(error) => return Err(on_error(error)),
    };
    let plan = plan_permissions(&existing, active);

    for arn in &plan.to_add {
        let statement = PolicyStatement::gateway_invoke(arn.clone());
        permissions.add_permission(function_name, &statement).map_err(&on_error)?;
        sink.record(
            &DeployEvent::new(DeployEventKind::PermissionAdded, phase)
                .with_subject(arn.clone())
                .with_detail(statement.statement_id.to_string()),
        );
    }
    for statement in &plan.to_remove {
        remove_statement(permissions, function_name, &statement.statement_id)
            .map_err(&on_error)?;
        let mut event = DeployEvent::new(DeployEventKind::PermissionRemoved, phase)
            .with_detail(statement.statement_id.to_string());
        if let Some(arn) = &statement.source_arn {
            event = event.with_subject(arn.clone());
        }
        sink.record(&event);
    }
    Ok(plan)
}

/// Removes a statement, treating an already-missing one as removed.
fn remove_statement<P>(
    permissions: &P,
    function_name: &str,
    statement_id: &StatementId,
) -> Result<(), RemoteError>
where
    P: PermissionManager + ?Sized,
{
    match permissions.remove_permission(function_name, statement_id) {
        Err(error) if error.is_not_found() => Ok(()),
        other => other,
    }
}
