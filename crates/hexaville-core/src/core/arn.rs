// crates/hexaville-core/src/core/arn.rs
// ============================================================================
// Module: ARN Derivation
// Description: Invocation URIs, execute-api source ARNs, and endpoint URLs.
// Purpose: Derive every provider-facing identifier string deterministically.
// Dependencies: regex, thiserror
// ============================================================================

//! ## Overview
//! Gateway integrations call the function through an invocation URI built
//! from the unqualified function ARN. Invoke permissions are scoped to
//! execute-api source ARNs in which every `{param}` path segment becomes a
//! `*` wildcard. All derivations are pure string transforms.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::core::identifiers::RestApiId;
use crate::core::manifest::RouteEntry;
use crate::core::stage::DeploymentStage;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Pattern matching a braced path parameter such as `{userId}`.
pub const PATH_PARAM_PATTERN: &str = r"\{[a-zA-Z_-]*\}";
/// Pattern matching a trailing numeric version qualifier on a function ARN.
const VERSION_QUALIFIER_PATTERN: &str = r":[0-9]*$";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// ARN derivation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArnError {
    /// Function ARN is not shaped like an ARN.
    #[error("invalid function arn: {0}")]
    InvalidFunctionArn(String),
    /// Invocation URI does not carry an account id where expected.
    #[error("invalid invocation uri: {0}")]
    InvalidInvocationUri(String),
    /// Regex pattern failed to compile.
    #[error("arn pattern error: {0}")]
    Pattern(String),
}

// ============================================================================
// SECTION: Derivations
// ============================================================================

/// Builds the gateway invocation URI for a (possibly version-qualified) function ARN.
///
/// # Errors
///
/// Returns [`ArnError::InvalidFunctionArn`] when `function_arn` is not an ARN.
pub fn invocation_uri(region: &str, function_arn: &str) -> Result<String, ArnError> {
    if !function_arn.starts_with("arn:") {
        return Err(ArnError::InvalidFunctionArn(function_arn.to_string()));
    }
    let unqualified = version_qualifier_pattern()?.replace(function_arn, "");
    Ok(format!(
        "arn:aws:apigateway:{region}:lambda:path/2015-03-31/functions/{unqualified}/invocations"
    ))
}

/// Extracts the account id embedded in an invocation URI.
///
/// # Errors
///
/// Returns [`ArnError::InvalidInvocationUri`] when the URI lacks the
/// function ARN segment or the account field.
pub fn account_id_from_invocation_uri(uri: &str) -> Result<String, ArnError> {
    uri.split('/')
        .nth(3)
        .and_then(|function_arn| function_arn.split(':').nth(4))
        .filter(|account| !account.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ArnError::InvalidInvocationUri(uri.to_string()))
}

/// Replaces every braced path parameter with `*`.
///
/// # Errors
///
/// Returns [`ArnError::Pattern`] if the parameter pattern cannot compile.
pub fn path_for_arn(path: &str) -> Result<String, ArnError> {
    Ok(path_param_pattern()?.replace_all(path, "*").into_owned())
}

/// Returns the public endpoint URL of a deployed stage.
#[must_use]
pub fn endpoint(rest_api_id: &RestApiId, region: &str, stage: &DeploymentStage) -> String {
    format!("https://{rest_api_id}.execute-api.{region}.amazonaws.com/{stage}")
}

// ============================================================================
// SECTION: Source ARN Context
// ============================================================================

/// Inputs shared by every source ARN of one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnContext {
    /// Provider region.
    pub region: String,
    /// Account id owning the function.
    pub account_id: String,
    /// REST API id.
    pub rest_api_id: RestApiId,
}

impl ArnContext {
    /// Builds a context, extracting the account id from the invocation URI.
    ///
    /// # Errors
    ///
    /// Returns [`ArnError::InvalidInvocationUri`] when no account id is found.
    pub fn from_invocation_uri(
        region: impl Into<String>,
        invocation_uri: &str,
        rest_api_id: RestApiId,
    ) -> Result<Self, ArnError> {
        Ok(Self {
            region: region.into(),
            account_id: account_id_from_invocation_uri(invocation_uri)?,
            rest_api_id,
        })
    }

    /// Returns the execute-api source ARN for a route.
    ///
    /// # Errors
    ///
    /// Returns [`ArnError::Pattern`] if the parameter pattern cannot compile.
    pub fn source_arn(&self, route: &RouteEntry) -> Result<String, ArnError> {
        Ok(format!(
            "arn:aws:execute-api:{}:{}:{}/*/{}{}",
            self.region,
            self.account_id,
            self.rest_api_id,
            route.normalized_method(),
            path_for_arn(&route.path)?
        ))
    }
}

// ============================================================================
// SECTION: Pattern Cache
// ============================================================================

/// Returns the compiled path parameter pattern.
fn path_param_pattern() -> Result<&'static Regex, ArnError> {
    static PATTERN: OnceLock<Result<Regex, String>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(PATH_PARAM_PATTERN).map_err(|err| err.to_string()))
        .as_ref()
        .map_err(|err| ArnError::Pattern(err.clone()))
}

/// Returns the compiled version qualifier pattern.
fn version_qualifier_pattern() -> Result<&'static Regex, ArnError> {
    static PATTERN: OnceLock<Result<Regex, String>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(VERSION_QUALIFIER_PATTERN).map_err(|err| err.to_string()))
        .as_ref()
        .map_err(|err| ArnError::Pattern(err.clone()))
}
