// crates/hexaville-core/src/core/policy.rs
// ============================================================================
// Module: Function Policy Statements
// Description: Typed view over a function's resource-based invoke policy.
// Purpose: Parse provider policy documents into comparable permission grants.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The provider returns the function policy as a JSON document. Only the
//! statement id, principal, action, and the `ArnLike` `AWS:SourceArn`
//! condition matter for permission synchronization; everything else is
//! ignored. Statements without a source ARN condition are parsed with
//! `source_arn: None` and are never touched by synchronization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::StatementId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Action granted to the gateway.
pub const INVOKE_ACTION: &str = "lambda:InvokeFunction";
/// Service principal of the gateway.
pub const GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";

// ============================================================================
// SECTION: Types
// ============================================================================

/// One statement of a function's invoke policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// Statement id (`Sid`).
    pub statement_id: StatementId,
    /// Source ARN condition, when present.
    pub source_arn: Option<String>,
    /// Principal the statement grants to.
    pub principal: String,
    /// Granted action.
    pub action: String,
}

impl PolicyStatement {
    /// Builds a gateway invoke grant for `source_arn` with a fresh statement id.
    #[must_use]
    pub fn gateway_invoke(source_arn: impl Into<String>) -> Self {
        Self {
            statement_id: StatementId::generate(),
            source_arn: Some(source_arn.into()),
            principal: GATEWAY_PRINCIPAL.to_string(),
            action: INVOKE_ACTION.to_string(),
        }
    }
}

/// Policy document parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The document is not valid policy JSON.
    #[error("policy document malformed: {0}")]
    Malformed(String),
}

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Raw policy document.
#[derive(Debug, Deserialize)]
struct RawPolicyDocument {
    /// Statements; absent means none.
    #[serde(rename = "Statement", default)]
    statement: Vec<RawStatement>,
}

/// Raw policy statement.
#[derive(Debug, Deserialize)]
struct RawStatement {
    /// Statement id.
    #[serde(rename = "Sid")]
    sid: String,
    /// Principal, either a string or an object keyed by principal type.
    #[serde(rename = "Principal", default)]
    principal: Option<Value>,
    /// Action, either a string or a list.
    #[serde(rename = "Action", default)]
    action: Option<Value>,
    /// Statement conditions.
    #[serde(rename = "Condition", default)]
    condition: Option<RawCondition>,
}

/// Raw condition block.
#[derive(Debug, Deserialize)]
struct RawCondition {
    /// `ArnLike` operator.
    #[serde(rename = "ArnLike", default)]
    arn_like: Option<RawArnLike>,
}

/// Raw `ArnLike` operator body.
#[derive(Debug, Deserialize)]
struct RawArnLike {
    /// Source ARN pattern.
    #[serde(rename = "AWS:SourceArn", default)]
    source_arn: Option<String>,
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a provider policy document into statements.
///
/// # Errors
///
/// Returns [`PolicyError::Malformed`] when the document is not valid JSON or
/// a statement lacks a `Sid`.
pub fn parse_policy_document(document: &str) -> Result<Vec<PolicyStatement>, PolicyError> {
    let raw: RawPolicyDocument =
        serde_json::from_str(document).map_err(|err| PolicyError::Malformed(err.to_string()))?;
    Ok(raw
        .statement
        .into_iter()
        .map(|statement| PolicyStatement {
            statement_id: StatementId::new(statement.sid),
            source_arn: statement
                .condition
                .and_then(|condition| condition.arn_like)
                .and_then(|arn_like| arn_like.source_arn),
            principal: statement.principal.as_ref().map_or_else(String::new, principal_label),
            action: statement.action.as_ref().map_or_else(String::new, action_label),
        })
        .collect())
}

/// Flattens a principal value to a label.
fn principal_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("Service") {
            Some(Value::String(service)) => service.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// Flattens an action value to a label.
fn action_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
